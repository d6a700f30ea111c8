use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::MeetingState;

/// Write the final state as pretty JSON
pub fn write_state_json(state: &MeetingState, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, state).context("Failed to write JSON")?;
    Ok(())
}

/// Human-readable summary of a finished run
pub fn format_summary(state: &MeetingState) -> String {
    let mut output = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(output, "Meeting: {} ({})", state.meeting_title, state.meeting_date);
    let _ = writeln!(output, "Last step: {}", state.current_step);
    let _ = writeln!(output, "Participants: {}", state.participants.join(", "));
    let _ = writeln!(output, "Agenda items: {}", state.agenda_items.len());
    let _ = writeln!(output, "Discussions: {}", state.discussions.len());
    let _ = writeln!(output, "Decisions: {}", state.decisions.len());
    let _ = writeln!(output, "Action items: {}", state.action_items.len());

    if state.errors.is_empty() {
        output.push_str("Errors: none\n");
    } else {
        let _ = writeln!(output, "Errors ({}):", state.errors.len());
        for error in &state.errors {
            let _ = writeln!(output, "  - {}", error);
        }
    }

    output
}
