pub mod client;
pub mod factory;
pub mod gemini;
pub mod prompts;

pub use client::{generate, Generation, LlmClient, RemoteCallError};
