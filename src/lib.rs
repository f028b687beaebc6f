//! promptdesk - prompt-templated assistant over the Gemini API
//!
//! Picks a prompt template by function type and style, sends the composed
//! prompt to Gemini, and keeps query history and user feedback. Two front
//! ends share this library: an HTTP API backed by SQLite (`server`) and an
//! interactive terminal session backed by a JSON feedback file (`cli`).

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod records;
pub mod server;
pub mod stats;
pub mod store;
pub mod util;
