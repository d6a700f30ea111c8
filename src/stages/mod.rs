pub mod action_items;
pub mod agenda;
pub mod decisions;
pub mod discussions;
pub mod participants;
pub mod preprocess;
pub mod summarize;

pub use action_items::*;
pub use agenda::*;
pub use decisions::*;
pub use discussions::*;
pub use participants::*;
pub use preprocess::*;
pub use summarize::*;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::error::StageError;
use crate::llm::{CompletionService, PromptTemplates, PromptVars};
use crate::models::{MeetingState, StageKind, StateUpdate};
use crate::parse::ParseStrictness;

/// Configuration shared by all stages
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Reporting of malformed JSON lines
    pub strictness: ParseStrictness,
    /// Line prefixes dropped from agenda output
    pub agenda_meta_words: Vec<String>,
    /// Line prefixes dropped from decision output
    pub decision_meta_words: Vec<String>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            strictness: ParseStrictness::Lenient,
            agenda_meta_words: vec![
                "Agenda".to_string(),
                "Format".to_string(),
                "Example".to_string(),
            ],
            decision_meta_words: vec![
                "Decision".to_string(),
                "Guideline".to_string(),
                "Example".to_string(),
            ],
        }
    }
}

/// Everything a stage needs besides the state
pub struct StageContext<'a> {
    pub llm: &'a dyn CompletionService,
    pub templates: &'a PromptTemplates,
    pub config: &'a StageConfig,
}

/// One pipeline step: prompt, complete, parse, return owned fields
///
/// Built-in stages absorb every failure into their fallback value and
/// always return `Ok`. An `Err` aborts the whole run.
#[async_trait]
pub trait Stage: Send + Sync {
    fn kind(&self) -> StageKind;

    async fn run(&self, state: &MeetingState, ctx: &StageContext<'_>) -> Result<StateUpdate>;
}

/// The seven stages in execution order
pub fn standard_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(Preprocess),
        Box::new(ExtractParticipants),
        Box::new(Summarize),
        Box::new(ExtractAgenda),
        Box::new(ExtractDiscussions),
        Box::new(ExtractDecisions),
        Box::new(ExtractActionItems),
    ]
}

/// Render the stage's prompt from the current state and call the model
pub(crate) async fn complete(
    kind: StageKind,
    state: &MeetingState,
    ctx: &StageContext<'_>,
) -> Result<String, StageError> {
    let prompt = ctx.templates.render(kind, &PromptVars::from_state(state))?;
    let response = ctx.llm.generate(&prompt, None).await?;
    Ok(response)
}

/// Log a stage failure and append it to the update's errors
pub(crate) fn record_failure(update: StateUpdate, kind: StageKind, err: &StageError) -> StateUpdate {
    warn!("{} failed, using fallback: {}", kind, err);
    update.with_error(format!("{}: {}", kind.name(), err))
}

/// In strict mode, note how many structured lines were dropped
pub(crate) fn record_skipped(
    update: StateUpdate,
    kind: StageKind,
    skipped: usize,
    strictness: ParseStrictness,
) -> StateUpdate {
    if strictness == ParseStrictness::Strict && skipped > 0 {
        update.with_error(format!(
            "{}: skipped {} malformed JSON line(s)",
            kind.name(),
            skipped
        ))
    } else {
        update
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn state() -> MeetingState {
        let mut state = MeetingState::new(
            "Kim: Let's start. Lee: Agreed, budget is 5M.",
            "Status Meeting",
            Some("2025-01-01".to_string()),
        );
        state.processed_text = "Kim: Let's start.\nLee: Agreed, budget is 5M.".to_string();
        state
    }

    pub async fn run_stage(
        stage: &dyn Stage,
        state: &MeetingState,
        llm: &dyn CompletionService,
        config: &StageConfig,
    ) -> StateUpdate {
        let templates = PromptTemplates::default();
        let ctx = StageContext {
            llm,
            templates: &templates,
            config,
        };
        stage.run(state, &ctx).await.unwrap()
    }
}
