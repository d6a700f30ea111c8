use thiserror::Error;

/// Failures of the text completion service
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Provider missing, unknown or lacking credentials
    #[error("completion service not configured: {0}")]
    NotConfigured(String),

    #[error("completion service failed to initialize: {0}")]
    Initialization(String),

    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    /// Service reachable but not able to answer (model not ready, overloaded)
    #[error("completion service unavailable: {0}")]
    Unavailable(String),
}

/// Failures while rendering a prompt template
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template references unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),
}

/// Input rejected before the pipeline is started
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("transcript is empty")]
    EmptyTranscript,

    #[error("transcript is too short ({0} characters, minimum 10)")]
    TranscriptTooShort(usize),

    #[error("transcript is too long ({0} characters, maximum 100000)")]
    TranscriptTooLong(usize),

    #[error("date is empty")]
    EmptyDate,

    #[error("date '{0}' is not in YYYY-MM-DD format")]
    MalformedDate(String),

    #[error("date '{0}' is not a valid calendar date")]
    InvalidDate(String),

    #[error("title is empty")]
    EmptyTitle,

    #[error("title is too short (minimum 2 characters)")]
    TitleTooShort,

    #[error("title is too long ({0} characters, maximum 200)")]
    TitleTooLong(usize),

    #[error("output path is empty")]
    EmptyOutputPath,

    #[error("output file must have a .docx extension")]
    NotDocx,

    #[error("output file name contains forbidden character '{0}'")]
    ForbiddenCharacter(char),

    #[error("required field '{0}' is empty")]
    MissingField(&'static str),
}

/// Failure that escapes a stage and aborts the run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Failure inside a stage, absorbed into that stage's fallback value
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}
