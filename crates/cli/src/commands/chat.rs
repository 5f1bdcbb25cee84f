//! Canned chat reply, as the server answers without an LLM.

use nuvra_core::heuristics::chat;

/// Print the reply to `message`.
pub fn run(message: &str) {
    #[allow(clippy::print_stdout)]
    {
        println!("{}", chat::respond(message));
    }
}
