//! Placeholder values substituted when extraction yields nothing or fails.
//!
//! Renderers treat every value here as "nothing to show".

use super::{ActionItem, Discussion};

pub const PARTICIPANTS_UNKNOWN: &str = "participants unknown";

pub const SUMMARY_FAILED: &str = "summary generation failed";

pub const NO_AGENDA: &str = "no agenda content";
pub const AGENDA_FAILED: &str = "agenda extraction failed";

pub const NO_DECISIONS: &str = "no notable decisions";
pub const DECISIONS_FAILED: &str = "decision extraction failed";

pub const GENERAL_DISCUSSION: &str = "general discussion";
pub const DISCUSSION_UNAVAILABLE: &str = "discussion extraction failed";
pub const DISCUSSION_FAILED_TOPIC: &str = "discussion content";
pub const EXTRACTION_FAILED: &str = "extraction failed";

pub const NO_FOLLOW_UP: &str = "no follow-up";
pub const UNASSIGNED: &str = "unassigned";
pub const UNSPECIFIED: &str = "unspecified";
pub const PLACEHOLDER: &str = "-";

/// Discussion used when no JSON line could be extracted
pub fn general_discussion(summary: &str) -> Discussion {
    let content = if summary.trim().is_empty() {
        DISCUSSION_UNAVAILABLE
    } else {
        summary
    };
    Discussion::new(GENERAL_DISCUSSION, content)
}

pub fn failed_discussion() -> Discussion {
    Discussion::new(DISCUSSION_FAILED_TOPIC, EXTRACTION_FAILED)
}

pub fn no_follow_up() -> ActionItem {
    ActionItem::new(NO_FOLLOW_UP, PLACEHOLDER, PLACEHOLDER)
}

pub fn failed_action_item() -> ActionItem {
    ActionItem::new(EXTRACTION_FAILED, PLACEHOLDER, PLACEHOLDER)
}

pub fn is_sentinel_participant(name: &str) -> bool {
    name == PARTICIPANTS_UNKNOWN
}

pub fn is_sentinel_summary(summary: &str) -> bool {
    summary.trim().is_empty() || summary == SUMMARY_FAILED
}

pub fn is_sentinel_agenda(item: &str) -> bool {
    item == NO_AGENDA || item == AGENDA_FAILED
}

pub fn is_sentinel_decision(item: &str) -> bool {
    item == NO_DECISIONS || item == DECISIONS_FAILED
}

pub fn is_sentinel_discussion(discussion: &Discussion) -> bool {
    discussion.topic == GENERAL_DISCUSSION || discussion.topic == DISCUSSION_FAILED_TOPIC
}

pub fn is_sentinel_action_item(item: &ActionItem) -> bool {
    item.assignee == PLACEHOLDER
        && item.deadline == PLACEHOLDER
        && (item.task == NO_FOLLOW_UP || item.task == EXTRACTION_FAILED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_discussion_uses_summary() {
        let discussion = general_discussion("Budget approved.");
        assert_eq!(discussion.topic, GENERAL_DISCUSSION);
        assert_eq!(discussion.content, "Budget approved.");
    }

    #[test]
    fn test_general_discussion_without_summary() {
        let discussion = general_discussion("  ");
        assert_eq!(discussion.content, DISCUSSION_UNAVAILABLE);
    }

    #[test]
    fn test_real_action_item_is_not_sentinel() {
        let item = ActionItem::new(NO_FOLLOW_UP, "Kim", "2025-02-01");
        assert!(!is_sentinel_action_item(&item));
        assert!(is_sentinel_action_item(&no_follow_up()));
        assert!(is_sentinel_action_item(&failed_action_item()));
    }
}
