use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{Stage, StageContext, complete, record_failure, record_skipped};
use crate::models::sentinel::{UNASSIGNED, UNSPECIFIED, failed_action_item, no_follow_up};
use crate::models::{ActionItem, MeetingState, StageKind, StateUpdate};
use crate::parse::{field, parse_json_lines};

/// Extract follow-up tasks from one-JSON-object-per-line output
///
/// Only `task` is required; a missing assignee or deadline gets a
/// placeholder.
pub struct ExtractActionItems;

#[async_trait]
impl Stage for ExtractActionItems {
    fn kind(&self) -> StageKind {
        StageKind::ExtractActionItems
    }

    async fn run(&self, state: &MeetingState, ctx: &StageContext<'_>) -> Result<StateUpdate> {
        let mut update = StateUpdate::new(self.kind().step());

        let response = match complete(self.kind(), state, ctx).await {
            Ok(response) => response,
            Err(e) => {
                update.action_items = vec![failed_action_item()];
                return Ok(record_failure(update, self.kind(), &e));
            }
        };

        let parsed = parse_json_lines(&response, &["task"]);
        let mut items: Vec<ActionItem> = parsed
            .records
            .iter()
            .filter_map(|record| {
                Some(ActionItem::new(
                    field(record, "task")?,
                    field(record, "assignee").unwrap_or_else(|| UNASSIGNED.to_string()),
                    field(record, "deadline").unwrap_or_else(|| UNSPECIFIED.to_string()),
                ))
            })
            .collect();

        if items.is_empty() {
            items = vec![no_follow_up()];
        }

        info!("Action items: {}", items.len());
        for (idx, item) in items.iter().enumerate() {
            info!(
                "  {}. {} (assignee: {}, deadline: {})",
                idx + 1,
                item.task,
                item.assignee,
                item.deadline
            );
        }

        update.action_items = items;
        Ok(record_skipped(
            update,
            self.kind(),
            parsed.skipped,
            ctx.config.strictness,
        ))
    }
}
