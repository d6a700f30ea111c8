use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{Stage, StageContext, complete, record_failure};
use crate::models::sentinel::PARTICIPANTS_UNKNOWN;
use crate::models::{MeetingState, StageKind, StateUpdate};
use crate::parse::parse_delimited;

/// Extract participant names from a comma-separated completion
pub struct ExtractParticipants;

#[async_trait]
impl Stage for ExtractParticipants {
    fn kind(&self) -> StageKind {
        StageKind::ExtractParticipants
    }

    async fn run(&self, state: &MeetingState, ctx: &StageContext<'_>) -> Result<StateUpdate> {
        let mut update = StateUpdate::new(self.kind().step());

        match complete(self.kind(), state, ctx).await {
            Ok(response) => {
                let mut participants = parse_delimited(&response, ',');
                if participants.is_empty() {
                    participants = vec![PARTICIPANTS_UNKNOWN.to_string()];
                }
                info!("Participants: {}", participants.join(", "));
                update.participants = Some(participants);
                Ok(update)
            }
            Err(e) => {
                update.participants = Some(vec![PARTICIPANTS_UNKNOWN.to_string()]);
                Ok(record_failure(update, self.kind(), &e))
            }
        }
    }
}
