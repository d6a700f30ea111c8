//! Input checks performed by the caller before a pipeline run

use std::path::Path;

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::MeetingState;

pub const MIN_TRANSCRIPT_CHARS: usize = 10;
pub const MAX_TRANSCRIPT_CHARS: usize = 100_000;
pub const MIN_TITLE_CHARS: usize = 2;
pub const MAX_TITLE_CHARS: usize = 200;

const FORBIDDEN_FILE_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

pub fn validate_transcript(transcript: &str) -> Result<(), ValidationError> {
    if transcript.is_empty() {
        return Err(ValidationError::EmptyTranscript);
    }

    let trimmed = transcript.trim().chars().count();
    if trimmed < MIN_TRANSCRIPT_CHARS {
        return Err(ValidationError::TranscriptTooShort(trimmed));
    }

    let total = transcript.chars().count();
    if total > MAX_TRANSCRIPT_CHARS {
        return Err(ValidationError::TranscriptTooLong(total));
    }

    Ok(())
}

/// Require `YYYY-MM-DD` naming a real calendar day
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    if date.is_empty() {
        return Err(ValidationError::EmptyDate);
    }

    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(ValidationError::MalformedDate(date.to_string()));
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.trim().chars().count() < MIN_TITLE_CHARS {
        return Err(ValidationError::TitleTooShort);
    }

    let total = title.trim().chars().count();
    if total > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong(total));
    }

    Ok(())
}

/// Check the file name of a `.docx` output path
///
/// Only the final path component is inspected, so drive prefixes and
/// directories are accepted as they are.
pub fn validate_output_path(path: &Path) -> Result<(), ValidationError> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Err(ValidationError::EmptyOutputPath);
    };

    if !file_name.to_lowercase().ends_with(".docx") {
        return Err(ValidationError::NotDocx);
    }

    if let Some(c) = file_name.chars().find(|c| FORBIDDEN_FILE_CHARS.contains(c)) {
        return Err(ValidationError::ForbiddenCharacter(c));
    }

    Ok(())
}

/// Require the caller-provided fields of an initial state
pub fn validate_state(state: &MeetingState) -> Result<(), ValidationError> {
    if state.raw_transcript.trim().is_empty() {
        return Err(ValidationError::MissingField("raw_transcript"));
    }
    if state.meeting_title.trim().is_empty() {
        return Err(ValidationError::MissingField("meeting_title"));
    }
    if state.meeting_date.trim().is_empty() {
        return Err(ValidationError::MissingField("meeting_date"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_bounds() {
        assert_eq!(validate_transcript(""), Err(ValidationError::EmptyTranscript));
        assert_eq!(
            validate_transcript("   hi    "),
            Err(ValidationError::TranscriptTooShort(2))
        );
        assert!(validate_transcript("Kim: Let's start.").is_ok());

        let long = "a".repeat(MAX_TRANSCRIPT_CHARS + 1);
        assert!(matches!(
            validate_transcript(&long),
            Err(ValidationError::TranscriptTooLong(_))
        ));
    }

    #[test]
    fn test_date_formats() {
        assert!(validate_date("2025-01-01").is_ok());
        assert_eq!(validate_date(""), Err(ValidationError::EmptyDate));
        assert!(matches!(validate_date("2025/01/01"), Err(ValidationError::MalformedDate(_))));
        assert!(matches!(validate_date("25-01-01"), Err(ValidationError::MalformedDate(_))));
        assert!(matches!(validate_date("2025-02-30"), Err(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("Status Meeting").is_ok());
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title(" x "), Err(ValidationError::TitleTooShort));
        assert!(matches!(
            validate_title(&"t".repeat(201)),
            Err(ValidationError::TitleTooLong(201))
        ));
    }

    #[test]
    fn test_output_path() {
        assert!(validate_output_path(Path::new("out/minutes.docx")).is_ok());
        assert_eq!(
            validate_output_path(Path::new("minutes.pdf")),
            Err(ValidationError::NotDocx)
        );
        assert_eq!(
            validate_output_path(Path::new("what?.docx")),
            Err(ValidationError::ForbiddenCharacter('?'))
        );
        assert_eq!(
            validate_output_path(Path::new("")),
            Err(ValidationError::EmptyOutputPath)
        );
    }

    #[test]
    fn test_state_requires_inputs() {
        let state = MeetingState::new("Kim: hello everyone", "Sync", Some("2025-01-01".into()));
        assert!(validate_state(&state).is_ok());

        let mut missing = state.clone();
        missing.meeting_title.clear();
        assert_eq!(
            validate_state(&missing),
            Err(ValidationError::MissingField("meeting_title"))
        );
    }
}
