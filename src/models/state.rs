use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Meeting Minutes";

/// Tag of the last completed pipeline stage
///
/// The tag is set whether the stage succeeded or fell back to a sentinel;
/// inspect `errors` to tell the two apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Initialized,
    Preprocessed,
    ParticipantsExtracted,
    Summarized,
    AgendaExtracted,
    DiscussionsExtracted,
    DecisionsExtracted,
    ActionItemsExtracted,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Initialized => "initialized",
            Step::Preprocessed => "preprocessed",
            Step::ParticipantsExtracted => "participants_extracted",
            Step::Summarized => "summarized",
            Step::AgendaExtracted => "agenda_extracted",
            Step::DiscussionsExtracted => "discussions_extracted",
            Step::DecisionsExtracted => "decisions_extracted",
            Step::ActionItemsExtracted => "action_items_extracted",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discussed topic and what was said about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    pub topic: String,
    pub content: String,
}

impl Discussion {
    pub fn new(topic: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            content: content.into(),
        }
    }
}

/// A follow-up task agreed in the meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: String,
    pub assignee: String,
    pub deadline: String,
}

impl ActionItem {
    pub fn new(
        task: impl Into<String>,
        assignee: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            task: task.into(),
            assignee: assignee.into(),
            deadline: deadline.into(),
        }
    }
}

/// State threaded through the pipeline
///
/// Created once per generation request and discarded after rendering.
/// `raw_transcript`, `meeting_title` and `meeting_date` are never touched by
/// a stage: `StateUpdate` has no fields for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingState {
    #[serde(default)]
    pub raw_transcript: String,
    #[serde(default = "default_title", alias = "title")]
    pub meeting_title: String,
    #[serde(default = "today", alias = "date")]
    pub meeting_date: String,

    #[serde(default)]
    pub processed_text: String,
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub agenda_items: Vec<String>,
    #[serde(default)]
    pub discussions: Vec<Discussion>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,

    #[serde(default)]
    pub current_step: Step,
    #[serde(default)]
    pub errors: Vec<String>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

impl MeetingState {
    /// Create the initial state for a request; `date` defaults to today
    pub fn new(
        transcript: impl Into<String>,
        title: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            raw_transcript: transcript.into(),
            meeting_title: title.into(),
            meeting_date: date.unwrap_or_else(today),
            processed_text: String::new(),
            summary: String::new(),
            participants: Vec::new(),
            agenda_items: Vec::new(),
            discussions: Vec::new(),
            decisions: Vec::new(),
            action_items: Vec::new(),
            current_step: Step::Initialized,
            errors: Vec::new(),
        }
    }

    /// Parse a state from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Merge a stage's partial update into this state
    ///
    /// Scalar fields and `participants` are replaced when present in the
    /// update. `agenda_items`, `discussions`, `decisions`, `action_items` and
    /// `errors` are extended, never overwritten.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            processed_text,
            summary,
            participants,
            agenda_items,
            discussions,
            decisions,
            action_items,
            current_step,
            errors,
        } = update;

        if let Some(text) = processed_text {
            self.processed_text = text;
        }
        if let Some(summary) = summary {
            self.summary = summary;
        }
        if let Some(participants) = participants {
            self.participants = participants;
        }

        self.agenda_items.extend(agenda_items);
        self.discussions.extend(discussions);
        self.decisions.extend(decisions);
        self.action_items.extend(action_items);
        self.errors.extend(errors);

        self.current_step = current_step;
    }
}

/// Partial state returned by a stage
///
/// Only carries the fields a stage owns. Replace-merge fields are `Option`,
/// append-merge fields are plain vectors that get concatenated.
#[derive(Debug, Clone, PartialEq)]
pub struct StateUpdate {
    pub processed_text: Option<String>,
    pub summary: Option<String>,
    pub participants: Option<Vec<String>>,
    pub agenda_items: Vec<String>,
    pub discussions: Vec<Discussion>,
    pub decisions: Vec<String>,
    pub action_items: Vec<ActionItem>,
    pub current_step: Step,
    pub errors: Vec<String>,
}

impl StateUpdate {
    pub fn new(step: Step) -> Self {
        Self {
            processed_text: None,
            summary: None,
            participants: None,
            agenda_items: Vec::new(),
            discussions: Vec::new(),
            decisions: Vec::new(),
            action_items: Vec::new(),
            current_step: step,
            errors: Vec::new(),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }
}
