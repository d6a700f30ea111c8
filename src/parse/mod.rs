//! Grammars for turning free-form completions into typed records.
//!
//! Each parser is independent of prompt construction and of the completion
//! service; stages decide what to do with an empty result.

pub mod delimited;
pub mod json_lines;
pub mod lines;

pub use delimited::*;
pub use json_lines::*;
pub use lines::*;

/// How malformed structured lines are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseStrictness {
    /// Skip malformed lines without a trace
    #[default]
    Lenient,
    /// Skip malformed lines but record how many were dropped
    Strict,
}
