//! Offline heuristic analysis.
//!
//! Runs the same analyzer the server falls back to when no LLM is
//! configured. No database, no quota.
//!
//! ```bash
//! nuvra analyze "Descubra o segredo para vender mais"
//! nuvra analyze --file landing.txt
//! ```

use std::path::Path;

use nuvra_core::{AnalysisOutcome, heuristics};

use super::CommandError;

/// Analyze `text`, or the contents of `file` when given, and print JSON.
pub fn run(text: Option<&str>, file: Option<&Path>) -> Result<(), CommandError> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => text.unwrap_or_default().to_owned(),
    };

    let outcome = analyze_input(&input)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }
    Ok(())
}

fn analyze_input(input: &str) -> Result<AnalysisOutcome, CommandError> {
    if input.trim().is_empty() {
        return Err(CommandError::EmptyInput);
    }
    Ok(heuristics::analyze(input))
}
