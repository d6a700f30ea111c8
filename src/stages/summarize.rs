use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{Stage, StageContext, complete, record_failure};
use crate::models::sentinel::SUMMARY_FAILED;
use crate::models::{MeetingState, StageKind, StateUpdate};

/// Summarize the processed text in a few sentences
pub struct Summarize;

#[async_trait]
impl Stage for Summarize {
    fn kind(&self) -> StageKind {
        StageKind::Summarize
    }

    async fn run(&self, state: &MeetingState, ctx: &StageContext<'_>) -> Result<StateUpdate> {
        let mut update = StateUpdate::new(self.kind().step());

        match complete(self.kind(), state, ctx).await {
            Ok(response) => {
                let summary = response.trim().to_string();
                info!("Summary: {} characters", summary.chars().count());
                update.summary = Some(summary);
                Ok(update)
            }
            Err(e) => {
                update.summary = Some(SUMMARY_FAILED.to_string());
                Ok(record_failure(update, self.kind(), &e))
            }
        }
    }
}
