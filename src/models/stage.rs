use std::fmt;

use super::Step;

/// The seven pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Preprocess,
    ExtractParticipants,
    Summarize,
    ExtractAgenda,
    ExtractDiscussions,
    ExtractDecisions,
    ExtractActionItems,
}

impl StageKind {
    pub const ALL: [StageKind; 7] = [
        StageKind::Preprocess,
        StageKind::ExtractParticipants,
        StageKind::Summarize,
        StageKind::ExtractAgenda,
        StageKind::ExtractDiscussions,
        StageKind::ExtractDecisions,
        StageKind::ExtractActionItems,
    ];

    /// Stable name used in error entries and prompt override files
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Preprocess => "preprocess",
            StageKind::ExtractParticipants => "extract_participants",
            StageKind::Summarize => "summarize",
            StageKind::ExtractAgenda => "extract_agenda",
            StageKind::ExtractDiscussions => "extract_discussions",
            StageKind::ExtractDecisions => "extract_decisions",
            StageKind::ExtractActionItems => "extract_action_items",
        }
    }

    /// Tag recorded in `current_step` once this stage has run
    pub fn step(&self) -> Step {
        match self {
            StageKind::Preprocess => Step::Preprocessed,
            StageKind::ExtractParticipants => Step::ParticipantsExtracted,
            StageKind::Summarize => Step::Summarized,
            StageKind::ExtractAgenda => Step::AgendaExtracted,
            StageKind::ExtractDiscussions => Step::DiscussionsExtracted,
            StageKind::ExtractDecisions => Step::DecisionsExtracted,
            StageKind::ExtractActionItems => Step::ActionItemsExtracted,
        }
    }

    /// Human-readable progress label
    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Preprocess => "Preprocessing transcript",
            StageKind::ExtractParticipants => "Extracting participants",
            StageKind::Summarize => "Summarizing meeting",
            StageKind::ExtractAgenda => "Extracting agenda",
            StageKind::ExtractDiscussions => "Extracting discussions",
            StageKind::ExtractDecisions => "Extracting decisions",
            StageKind::ExtractActionItems => "Extracting action items",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
