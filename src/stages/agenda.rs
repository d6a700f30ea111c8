use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{Stage, StageContext, complete, record_failure};
use crate::models::sentinel::{AGENDA_FAILED, NO_AGENDA};
use crate::models::{MeetingState, StageKind, StateUpdate};
use crate::parse::parse_filtered_lines;

/// Extract agenda items, one per line
pub struct ExtractAgenda;

#[async_trait]
impl Stage for ExtractAgenda {
    fn kind(&self) -> StageKind {
        StageKind::ExtractAgenda
    }

    async fn run(&self, state: &MeetingState, ctx: &StageContext<'_>) -> Result<StateUpdate> {
        let mut update = StateUpdate::new(self.kind().step());

        match complete(self.kind(), state, ctx).await {
            Ok(response) => {
                let mut items = parse_filtered_lines(&response, &ctx.config.agenda_meta_words);
                if items.is_empty() {
                    items = vec![NO_AGENDA.to_string()];
                }
                info!("Agenda: {} item(s)", items.len());
                for (idx, item) in items.iter().enumerate() {
                    info!("  {}. {}", idx + 1, item);
                }
                update.agenda_items = items;
                Ok(update)
            }
            Err(e) => {
                update.agenda_items = vec![AGENDA_FAILED.to_string()];
                Ok(record_failure(update, self.kind(), &e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedCompletion;
    use crate::stages::StageConfig;
    use crate::stages::test_support::{run_stage, state};

    #[tokio::test]
    async fn test_meta_lines_are_filtered() {
        let llm = ScriptedCompletion::reply("Agenda:\nBudget review\n\nExample: x\nHiring plan");
        let update = run_stage(&ExtractAgenda, &state(), &llm, &StageConfig::default()).await;

        assert_eq!(update.agenda_items, vec!["Budget review", "Hiring plan"]);
    }

    #[tokio::test]
    async fn test_noise_only_gives_sentinel() {
        let llm = ScriptedCompletion::reply("Format: one per line\n");
        let update = run_stage(&ExtractAgenda, &state(), &llm, &StageConfig::default()).await;

        assert_eq!(update.agenda_items, vec![NO_AGENDA]);
        assert!(update.errors.is_empty());
    }

    #[tokio::test]
    async fn test_custom_meta_words() {
        let config = StageConfig {
            agenda_meta_words: vec!["Topic".to_string()],
            ..Default::default()
        };
        let llm = ScriptedCompletion::reply("Topics:\nAgenda cleanup");
        let update = run_stage(&ExtractAgenda, &state(), &llm, &config).await;

        assert_eq!(update.agenda_items, vec!["Agenda cleanup"]);
    }

    #[tokio::test]
    async fn test_failure_gives_failure_sentinel() {
        let llm = ScriptedCompletion::failing("503");
        let update = run_stage(&ExtractAgenda, &state(), &llm, &StageConfig::default()).await;

        assert_eq!(update.agenda_items, vec![AGENDA_FAILED]);
        assert_eq!(update.errors.len(), 1);
    }
}
