use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{Stage, StageContext, complete, record_failure};
use crate::models::{MeetingState, StageKind, StateUpdate};

/// Clean up the raw transcript
///
/// The whole completion becomes `processed_text`. On failure the raw
/// transcript is passed through unchanged.
pub struct Preprocess;

#[async_trait]
impl Stage for Preprocess {
    fn kind(&self) -> StageKind {
        StageKind::Preprocess
    }

    async fn run(&self, state: &MeetingState, ctx: &StageContext<'_>) -> Result<StateUpdate> {
        let mut update = StateUpdate::new(self.kind().step());

        match complete(self.kind(), state, ctx).await {
            Ok(response) => {
                let processed = response.trim().to_string();
                info!("Preprocessed text: {} characters", processed.chars().count());
                update.processed_text = Some(processed);
                Ok(update)
            }
            Err(e) => {
                update.processed_text = Some(state.raw_transcript.clone());
                Ok(record_failure(update, self.kind(), &e))
            }
        }
    }
}
