use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use crate::error::TemplateError;
use crate::models::{MeetingState, StageKind};

const PREPROCESS_PROMPT: &str = r#"Clean up the following raw meeting transcript.

Rules:
- Keep every speaker label and what each speaker said.
- Remove filler words, false starts and obvious transcription noise.
- Do not summarize and do not add information that is not in the transcript.
- Output one utterance per line in the form "Speaker: text".

Transcript:
{transcript}"#;

const SUMMARY_PROMPT: &str = r#"Summarize the following meeting in 3 to 5 sentences.
Cover the purpose of the meeting, the main points discussed and the outcome.
Output only the summary text.

Meeting:
{text}"#;

const PARTICIPANTS_PROMPT: &str = r#"List the names of everyone who took part in the following meeting.
Output only the names, separated by commas, with no other text.

Meeting:
{text}"#;

const AGENDA_PROMPT: &str = r#"Extract the agenda items of the following meeting.
Output one agenda item per line, with no numbering, headings or extra text.

Format:
Example: Review of the project schedule

Meeting:
{text}"#;

const DISCUSSIONS_PROMPT: &str = r#"Extract the main discussion points of the following meeting.
Output one JSON object per line with the keys "topic" and "content".

Example:
{"topic": "Budget", "content": "The team reviewed the budget and agreed on 5M."}

Meeting:
{text}"#;

const DECISIONS_PROMPT: &str = r#"Extract the decisions made in the following meeting.
Output one decision per line, with no numbering, headings or extra text.

Guideline: only include items that were explicitly agreed.
Example: Budget approved at 5M

Meeting:
{text}"#;

const ACTION_ITEMS_PROMPT: &str = r#"Extract the action items of the following meeting.
Output one JSON object per line with the keys "task", "assignee" and "deadline".
Leave out "assignee" or "deadline" when the meeting does not state them.

Example:
{"task": "Write test scenarios", "assignee": "Lee", "deadline": "2025-11-15"}

Meeting:
{text}"#;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_RE.get_or_init(|| {
        Regex::new(r"\{([a-z_]+)\}").expect("placeholder regex should compile")
    })
}

/// Values that templates may reference
#[derive(Debug, Clone, Copy)]
pub struct PromptVars<'a> {
    pub transcript: &'a str,
    pub text: &'a str,
    pub summary: &'a str,
    pub title: &'a str,
    pub date: &'a str,
}

impl<'a> PromptVars<'a> {
    pub fn from_state(state: &'a MeetingState) -> Self {
        Self {
            transcript: &state.raw_transcript,
            text: &state.processed_text,
            summary: &state.summary,
            title: &state.meeting_title,
            date: &state.meeting_date,
        }
    }

    fn get(&self, name: &str) -> Option<&'a str> {
        match name {
            "transcript" => Some(self.transcript),
            "text" => Some(self.text),
            "summary" => Some(self.summary),
            "title" => Some(self.title),
            "date" => Some(self.date),
            _ => None,
        }
    }
}

/// Substitute `{name}` placeholders in a template
///
/// Braces that do not enclose a bare lowercase identifier (JSON examples,
/// for instance) are left untouched. Substituted values are not rescanned.
pub fn render_template(template: &str, vars: &PromptVars<'_>) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;

    for caps in placeholder_regex().captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = vars
            .get(name.as_str())
            .ok_or_else(|| TemplateError::UnknownPlaceholder(name.as_str().to_string()))?;

        output.push_str(&template[last..whole.start()]);
        output.push_str(value);
        last = whole.end();
    }

    output.push_str(&template[last..]);
    Ok(output)
}

/// Prompt template for every stage
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    templates: HashMap<StageKind, String>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        let templates = StageKind::ALL
            .iter()
            .map(|&kind| (kind, default_template(kind).to_string()))
            .collect();
        Self { templates }
    }
}

fn default_template(kind: StageKind) -> &'static str {
    match kind {
        StageKind::Preprocess => PREPROCESS_PROMPT,
        StageKind::ExtractParticipants => PARTICIPANTS_PROMPT,
        StageKind::Summarize => SUMMARY_PROMPT,
        StageKind::ExtractAgenda => AGENDA_PROMPT,
        StageKind::ExtractDiscussions => DISCUSSIONS_PROMPT,
        StageKind::ExtractDecisions => DECISIONS_PROMPT,
        StageKind::ExtractActionItems => ACTION_ITEMS_PROMPT,
    }
}

impl PromptTemplates {
    pub fn get(&self, kind: StageKind) -> &str {
        self.templates
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| default_template(kind))
    }

    pub fn set(&mut self, kind: StageKind, template: impl Into<String>) {
        self.templates.insert(kind, template.into());
    }

    pub fn render(&self, kind: StageKind, vars: &PromptVars<'_>) -> Result<String, TemplateError> {
        render_template(self.get(kind), vars)
    }

    /// Replace templates with `<dir>/<stage_name>.txt` where such a file exists
    pub fn load_overrides(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;

        for kind in StageKind::ALL {
            let path = dir.join(format!("{}.txt", kind.name()));
            if !path.is_file() {
                continue;
            }

            let template = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt template: {:?}", path))?;
            info!("Using prompt override for {} from {:?}", kind, path);
            self.set(kind, template);
            loaded += 1;
        }

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> PromptVars<'static> {
        PromptVars {
            transcript: "Kim: hi",
            text: "Kim: hello",
            summary: "",
            title: "Weekly",
            date: "2025-01-01",
        }
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let rendered = render_template("{title} on {date}: {text}", &vars()).unwrap();
        assert_eq!(rendered, "Weekly on 2025-01-01: Kim: hello");
    }

    #[test]
    fn test_render_leaves_json_examples_alone() {
        let template = r#"{"topic": "Budget"} {text}"#;
        let rendered = render_template(template, &vars()).unwrap();
        assert_eq!(rendered, r#"{"topic": "Budget"} Kim: hello"#);
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let v = PromptVars {
            text: "{transcript}",
            ..vars()
        };
        assert_eq!(render_template("{text}", &v).unwrap(), "{transcript}");
    }

    #[test]
    fn test_render_rejects_unknown_placeholder() {
        let err = render_template("{speaker_list}", &vars()).unwrap_err();
        assert_eq!(err, TemplateError::UnknownPlaceholder("speaker_list".into()));
    }

    #[test]
    fn test_default_templates_render() {
        let templates = PromptTemplates::default();
        for kind in StageKind::ALL {
            let rendered = templates.render(kind, &vars()).unwrap();
            assert!(rendered.contains("Kim: h"), "{} lost its input", kind);
        }
    }

    #[test]
    fn test_preprocess_uses_raw_transcript() {
        let rendered = PromptTemplates::default()
            .render(StageKind::Preprocess, &vars())
            .unwrap();
        assert!(rendered.contains("Kim: hi"));
        assert!(!rendered.contains("Kim: hello"));
    }

    #[test]
    fn test_load_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("summarize.txt"), "Summarize: {text}").unwrap();

        let mut templates = PromptTemplates::default();
        let loaded = templates.load_overrides(dir.path()).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(templates.get(StageKind::Summarize), "Summarize: {text}");
        assert_eq!(templates.get(StageKind::Preprocess), PREPROCESS_PROMPT);
    }
}
