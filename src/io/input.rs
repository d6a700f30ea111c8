use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::OutputSettings;
use crate::error::ValidationError;
use crate::models::MeetingState;
use crate::validation::{validate_date, validate_state, validate_title, validate_transcript};

pub const SAMPLE_TITLE: &str = "Project Kickoff Meeting (Sample)";

/// Transcript used when no usable input is given
pub const SAMPLE_TRANSCRIPT: &str = "\
Kim: Good morning everyone. Let's kick off the new customer portal project.
Lee: Thanks. I prepared a draft timeline. Design runs until the end of March, development through June.
Park: The backend team needs the API spec before development starts. Can we have it by mid-March?
Kim: That works. Lee, please own the API spec and share it by March 15.
Lee: Will do.
Park: On budget, we estimated 50 million won. That covers two contractors.
Kim: Agreed, let's lock the budget at 50 million. Park, please send the contractor requests to procurement this week.
Park: Okay, I'll send them by Friday.
Kim: Last item is the weekly sync. Let's meet every Monday at 10.
Lee: Sounds good. I'll set up the calendar invite today.";

/// Read a transcript text file
pub fn read_transcript_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read transcript: {:?}", path))
}

/// Load a previously saved state from JSON
pub fn load_state_file(path: &Path) -> Result<MeetingState> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    MeetingState::from_json(&content).context("Failed to parse state JSON")
}

/// Load an initial state file, apply title and date overrides, and
/// validate it like any other request
///
/// No sample fallback here: a state file with an unusable transcript is
/// rejected.
pub fn resolve_state_file(
    path: &Path,
    title: Option<String>,
    date: Option<String>,
) -> Result<MeetingState> {
    info!("Loading state from {:?}", path);
    let mut state = load_state_file(path)?;

    if let Some(title) = title {
        state.meeting_title = title;
    }
    if let Some(date) = date {
        state.meeting_date = date;
    }

    validate_state(&state).context("Invalid state file")?;
    validate_transcript(&state.raw_transcript).context("Invalid transcript")?;
    validate_title(&state.meeting_title).context("Invalid title")?;
    validate_date(&state.meeting_date).context("Invalid date")?;
    Ok(state)
}

/// Validate the caller's inputs and build the initial state
///
/// A missing or too-short transcript falls back to the bundled sample when
/// `use_sample_on_error` is set; the sample keeps a caller-given title but
/// otherwise carries its own.
pub fn resolve_request(
    transcript: Option<String>,
    title: Option<String>,
    date: Option<String>,
    settings: &OutputSettings,
) -> Result<MeetingState> {
    let checked = match &transcript {
        Some(text) => validate_transcript(text),
        None => Err(ValidationError::EmptyTranscript),
    };

    let (transcript, fallback_title) = match (checked, transcript) {
        (Ok(()), Some(text)) => (text, settings.default_title.clone()),
        (Err(err @ (ValidationError::EmptyTranscript | ValidationError::TranscriptTooShort(_))), _)
            if settings.use_sample_on_error =>
        {
            warn!("{}; using the sample transcript", err);
            (SAMPLE_TRANSCRIPT.to_string(), SAMPLE_TITLE.to_string())
        }
        (Err(err), _) => return Err(err).context("Invalid transcript"),
        (Ok(()), None) => return Err(ValidationError::EmptyTranscript.into()),
    };

    let title = title.unwrap_or(fallback_title);
    validate_title(&title).context("Invalid title")?;
    if let Some(date) = &date {
        validate_date(date).context("Invalid date")?;
    }

    Ok(MeetingState::new(transcript, title, date))
}
