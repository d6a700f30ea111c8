pub mod config;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod stages;
pub mod text;
pub mod validation;

pub use config::Settings;
pub use error::{CompletionError, PipelineError, StageError, TemplateError, ValidationError};
pub use io::{DocxRenderer, format_summary, load_state_file, read_transcript_file, resolve_request, write_state_json};
pub use llm::{
    AnthropicClient, AnthropicConfig, CompletionService, LazyCompletion, OllamaClient, OllamaConfig,
    PromptTemplates, build_provider, check_connection,
};
pub use models::{ActionItem, Discussion, MeetingState, StageKind, StateUpdate, Step};
pub use parse::ParseStrictness;
pub use pipeline::Pipeline;
pub use stages::{Stage, StageConfig, StageContext};
