//! Nuvra AI server library.
//!
//! JSON API for the marketing/code analysis assistant and the lead CRM,
//! exposed as a library so the CLI can reuse configuration and repositories.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - `PostgreSQL` repositories (schema `nuvra`)
//! - [`llm`] - Optional OpenAI-compatible completion client
//! - [`services`] - Registration, quota-gated analysis and chat, CRM views
//! - [`routes`] - Axum handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
