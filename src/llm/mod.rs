pub mod anthropic;
pub mod client;
pub mod ollama;
pub mod prompts;

#[cfg(test)]
pub(crate) mod testing;

pub use anthropic::*;
pub use client::*;
pub use ollama::*;
pub use prompts::*;
