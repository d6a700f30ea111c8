use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{Stage, StageContext, complete, record_failure};
use crate::models::sentinel::{DECISIONS_FAILED, NO_DECISIONS};
use crate::models::{MeetingState, StageKind, StateUpdate};
use crate::parse::parse_filtered_lines;

/// Extract decisions, one per line
pub struct ExtractDecisions;

#[async_trait]
impl Stage for ExtractDecisions {
    fn kind(&self) -> StageKind {
        StageKind::ExtractDecisions
    }

    async fn run(&self, state: &MeetingState, ctx: &StageContext<'_>) -> Result<StateUpdate> {
        let mut update = StateUpdate::new(self.kind().step());

        match complete(self.kind(), state, ctx).await {
            Ok(response) => {
                let mut decisions =
                    parse_filtered_lines(&response, &ctx.config.decision_meta_words);
                if decisions.is_empty() {
                    decisions = vec![NO_DECISIONS.to_string()];
                }
                info!("Decisions: {}", decisions.len());
                for (idx, decision) in decisions.iter().enumerate() {
                    info!("  {}. {}", idx + 1, decision);
                }
                update.decisions = decisions;
                Ok(update)
            }
            Err(e) => {
                update.decisions = vec![DECISIONS_FAILED.to_string()];
                Ok(record_failure(update, self.kind(), &e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedCompletion;
    use crate::models::Step;
    use crate::stages::StageConfig;
    use crate::stages::test_support::{run_stage, state};

    #[tokio::test]
    async fn test_decisions_filtered() {
        let llm = ScriptedCompletion::reply(
            "Decisions made:\nBudget approved at 5M\nGuideline: none\nKickoff moved to Tuesday",
        );
        let update = run_stage(&ExtractDecisions, &state(), &llm, &StageConfig::default()).await;

        assert_eq!(
            update.decisions,
            vec!["Budget approved at 5M", "Kickoff moved to Tuesday"]
        );
        assert_eq!(update.current_step, Step::DecisionsExtracted);
    }

    #[tokio::test]
    async fn test_empty_gives_sentinel() {
        let llm = ScriptedCompletion::reply("   \n");
        let update = run_stage(&ExtractDecisions, &state(), &llm, &StageConfig::default()).await;
        assert_eq!(update.decisions, vec![NO_DECISIONS]);
    }

    #[tokio::test]
    async fn test_failure_gives_failure_sentinel() {
        let llm = ScriptedCompletion::failing("overloaded");
        let update = run_stage(&ExtractDecisions, &state(), &llm, &StageConfig::default()).await;

        assert_eq!(update.decisions, vec![DECISIONS_FAILED]);
        assert_eq!(update.errors.len(), 1);
    }
}
