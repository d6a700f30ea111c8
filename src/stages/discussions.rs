use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{Stage, StageContext, complete, record_failure, record_skipped};
use crate::models::sentinel::{failed_discussion, general_discussion};
use crate::models::{Discussion, MeetingState, StageKind, StateUpdate};
use crate::parse::{field, parse_json_lines};

/// Extract discussion topics from one-JSON-object-per-line output
///
/// When no line yields a `{topic, content}` object the stage falls back to a
/// single general discussion carrying the current summary.
pub struct ExtractDiscussions;

#[async_trait]
impl Stage for ExtractDiscussions {
    fn kind(&self) -> StageKind {
        StageKind::ExtractDiscussions
    }

    async fn run(&self, state: &MeetingState, ctx: &StageContext<'_>) -> Result<StateUpdate> {
        let mut update = StateUpdate::new(self.kind().step());

        let response = match complete(self.kind(), state, ctx).await {
            Ok(response) => response,
            Err(e) => {
                update.discussions = vec![failed_discussion()];
                return Ok(record_failure(update, self.kind(), &e));
            }
        };

        let parsed = parse_json_lines(&response, &["topic", "content"]);
        let mut discussions: Vec<Discussion> = parsed
            .records
            .iter()
            .filter_map(|record| {
                Some(Discussion::new(field(record, "topic")?, field(record, "content")?))
            })
            .collect();

        if discussions.is_empty() {
            discussions = vec![general_discussion(&state.summary)];
        }

        info!("Discussions: {}", discussions.len());
        for (idx, discussion) in discussions.iter().enumerate() {
            info!("  {}. {}", idx + 1, discussion.topic);
        }

        update.discussions = discussions;
        Ok(record_skipped(
            update,
            self.kind(),
            parsed.skipped,
            ctx.config.strictness,
        ))
    }
}
