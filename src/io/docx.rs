//! Minimal WordprocessingML writer for finished minutes
//!
//! The package parts are fixed; `word/document.xml` is streamed with
//! `quick_xml::Writer` and everything is zipped.
//! Sentinel values from failed or empty stages are never printed: a section
//! whose entries are all sentinels is left out entirely.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::models::sentinel::{
    is_sentinel_action_item, is_sentinel_agenda, is_sentinel_decision, is_sentinel_discussion,
    is_sentinel_participant, is_sentinel_summary,
};
use crate::models::MeetingState;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:rPr><w:sz w:val="22"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:jc w:val="center"/><w:spacing w:after="240"/></w:pPr><w:rPr><w:b/><w:sz w:val="40"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="240" w:after="120"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:style>
<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4"/><w:left w:val="single" w:sz="4"/><w:bottom w:val="single" w:sz="4"/><w:right w:val="single" w:sz="4"/><w:insideH w:val="single" w:sz="4"/><w:insideV w:val="single" w:sz="4"/></w:tblBorders></w:tblPr></w:style>
</w:styles>"#;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Renders a finished `MeetingState` as a `.docx` file
#[derive(Debug, Clone, Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Write the document to `path`, creating parent directories
    pub fn render(&self, state: &MeetingState, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let file =
            File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", ROOT_RELS_XML.to_string()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
            ("word/styles.xml", STYLES_XML.to_string()),
            ("word/document.xml", self.document_xml(state)?),
        ];
        for (name, content) in parts {
            zip.start_file(name, options)
                .with_context(|| format!("Failed to add {} to document", name))?;
            zip.write_all(content.as_bytes())?;
        }
        zip.finish().context("Failed to finish document archive")?;

        info!("Document written to {:?}", path);
        Ok(path.to_path_buf())
    }

    /// Build `word/document.xml` for a state
    pub fn document_xml(&self, state: &MeetingState) -> Result<String> {
        let mut body = Body::new()?;

        body.paragraph(Some("Title"), &[Run::plain(&state.meeting_title)])?;

        body.heading("Meeting Information")?;
        body.paragraph(None, &[Run::bold("Date: "), Run::plain(&state.meeting_date)])?;
        let participants: Vec<&str> = state
            .participants
            .iter()
            .map(String::as_str)
            .filter(|p| !is_sentinel_participant(p))
            .collect();
        if !participants.is_empty() {
            body.paragraph(
                None,
                &[Run::bold("Participants: "), Run::plain(&participants.join(", "))],
            )?;
        }

        if !is_sentinel_summary(&state.summary) {
            body.heading("Summary")?;
            body.paragraph(None, &[Run::plain(&state.summary)])?;
        }

        let agenda: Vec<&String> = state
            .agenda_items
            .iter()
            .filter(|item| !is_sentinel_agenda(item))
            .collect();
        if !agenda.is_empty() {
            body.heading("Agenda")?;
            for item in agenda {
                body.bullet(item)?;
            }
        }

        let discussions: Vec<_> = state
            .discussions
            .iter()
            .filter(|d| !is_sentinel_discussion(d))
            .collect();
        if !discussions.is_empty() {
            body.heading("Discussions")?;
            for discussion in discussions {
                body.paragraph(None, &[Run::bold(&discussion.topic)])?;
                body.paragraph(None, &[Run::plain(&discussion.content)])?;
            }
        }

        let decisions: Vec<&String> = state
            .decisions
            .iter()
            .filter(|item| !is_sentinel_decision(item))
            .collect();
        if !decisions.is_empty() {
            body.heading("Decisions")?;
            for item in decisions {
                body.bullet(item)?;
            }
        }

        let actions: Vec<[&str; 3]> = state
            .action_items
            .iter()
            .filter(|item| !is_sentinel_action_item(item))
            .map(|item| [item.task.as_str(), item.assignee.as_str(), item.deadline.as_str()])
            .collect();
        if !actions.is_empty() {
            body.heading("Action Items")?;
            body.table(["Task", "Assignee", "Deadline"], &actions)?;
        }

        body.finish()
    }
}

struct Run<'a> {
    text: &'a str,
    bold: bool,
}

impl<'a> Run<'a> {
    fn plain(text: &'a str) -> Self {
        Self { text, bold: false }
    }

    fn bold(text: &'a str) -> Self {
        Self { text, bold: true }
    }
}

/// Streams `word/document.xml`; text is escaped by `BytesText`
struct Body {
    writer: Writer<Vec<u8>>,
}

impl Body {
    fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        writer.write_event(Event::Start(
            BytesStart::new("w:document").with_attributes([("xmlns:w", WORDML_NS)]),
        ))?;
        writer.write_event(Event::Start(BytesStart::new("w:body")))?;
        Ok(Self { writer })
    }

    fn finish(mut self) -> Result<String> {
        self.empty(BytesStart::new("w:sectPr"))?;
        self.end("w:body")?;
        self.end("w:document")?;
        String::from_utf8(self.writer.into_inner()).context("Document XML is not UTF-8")
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, element: BytesStart<'_>) -> Result<()> {
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn run(&mut self, run: &Run<'_>) -> Result<()> {
        self.start("w:r")?;
        if run.bold {
            self.start("w:rPr")?;
            self.empty(BytesStart::new("w:b"))?;
            self.end("w:rPr")?;
        }
        for (i, line) in run.text.split('\n').enumerate() {
            if i > 0 {
                self.empty(BytesStart::new("w:br"))?;
            }
            self.writer.write_event(Event::Start(
                BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
            ))?;
            self.writer
                .write_event(Event::Text(BytesText::new(&strip_control(line))))?;
            self.end("w:t")?;
        }
        self.end("w:r")
    }

    fn paragraph(&mut self, style: Option<&str>, runs: &[Run<'_>]) -> Result<()> {
        self.start("w:p")?;
        if let Some(style) = style {
            self.start("w:pPr")?;
            self.empty(BytesStart::new("w:pStyle").with_attributes([("w:val", style)]))?;
            self.end("w:pPr")?;
        }
        for run in runs {
            self.run(run)?;
        }
        self.end("w:p")
    }

    fn heading(&mut self, text: &str) -> Result<()> {
        self.paragraph(Some("Heading1"), &[Run::plain(text)])
    }

    fn bullet(&mut self, text: &str) -> Result<()> {
        self.paragraph(Some("ListBullet"), &[Run::plain("\u{2022} "), Run::plain(text)])
    }

    fn table(&mut self, headers: [&str; 3], rows: &[[&str; 3]]) -> Result<()> {
        self.start("w:tbl")?;
        self.start("w:tblPr")?;
        self.empty(BytesStart::new("w:tblStyle").with_attributes([("w:val", "TableGrid")]))?;
        self.empty(BytesStart::new("w:tblW").with_attributes([("w:w", "0"), ("w:type", "auto")]))?;
        self.end("w:tblPr")?;

        self.row(&headers.map(Run::bold))?;
        for row in rows {
            self.row(&row.map(Run::plain))?;
        }
        self.end("w:tbl")
    }

    fn row(&mut self, cells: &[Run<'_>]) -> Result<()> {
        self.start("w:tr")?;
        for cell in cells {
            self.start("w:tc")?;
            self.start("w:p")?;
            self.run(cell)?;
            self.end("w:p")?;
            self.end("w:tc")?;
        }
        self.end("w:tr")
    }
}

/// Drop control characters XML 1.0 does not allow in text
fn strip_control(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\r'))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::models::sentinel::{
        AGENDA_FAILED, DECISIONS_FAILED, PARTICIPANTS_UNKNOWN, SUMMARY_FAILED,
        failed_action_item, general_discussion,
    };
    use crate::models::{ActionItem, Discussion};

    fn complete_state() -> MeetingState {
        let mut state = MeetingState::new(
            "Kim: Let's start. Lee: Agreed.",
            "R&D <Sync>",
            Some("2025-01-01".to_string()),
        );
        state.summary = "Budget approved.".to_string();
        state.participants = vec!["Kim".to_string(), "Lee".to_string()];
        state.agenda_items = vec!["Budget".to_string()];
        state.discussions = vec![Discussion::new("Budget", "Approved 5M")];
        state.decisions = vec!["Budget set at 5M".to_string()];
        state.action_items = vec![ActionItem::new("Track spend", "Lee", "unspecified")];
        state
    }

    fn failed_state() -> MeetingState {
        let mut state = MeetingState::new(
            "Kim: Let's start. Lee: Agreed.",
            "Sync",
            Some("2025-01-01".to_string()),
        );
        state.summary = SUMMARY_FAILED.to_string();
        state.participants = vec![PARTICIPANTS_UNKNOWN.to_string()];
        state.agenda_items = vec![AGENDA_FAILED.to_string()];
        state.discussions = vec![general_discussion("Budget approved.")];
        state.decisions = vec![DECISIONS_FAILED.to_string()];
        state.action_items = vec![failed_action_item()];
        state
    }

    #[test]
    fn test_document_contains_all_sections() {
        let xml = DocxRenderer::new().document_xml(&complete_state()).unwrap();

        assert!(xml.contains("R&amp;D &lt;Sync&gt;"));
        for heading in ["Meeting Information", "Summary", "Agenda", "Discussions", "Decisions", "Action Items"] {
            assert!(xml.contains(heading), "missing {}", heading);
        }
        assert!(xml.contains("Kim, Lee"));
        assert!(xml.contains("Track spend"));
        assert!(xml.contains("<w:tbl>"));
    }

    #[test]
    fn test_sentinels_are_not_rendered() {
        let xml = DocxRenderer::new().document_xml(&failed_state()).unwrap();

        for hidden in [
            SUMMARY_FAILED,
            PARTICIPANTS_UNKNOWN,
            AGENDA_FAILED,
            DECISIONS_FAILED,
            "general discussion",
            "extraction failed",
        ] {
            assert!(!xml.contains(hidden), "rendered sentinel {}", hidden);
        }
        assert!(!xml.contains(">Summary<"));
        assert!(!xml.contains(">Agenda<"));
        assert!(!xml.contains("<w:tbl>"));
        // Title and date are always present
        assert!(xml.contains("Sync"));
        assert!(xml.contains("2025-01-01"));
    }

    #[test]
    fn test_document_is_well_formed() {
        let mut state = complete_state();
        state.summary = "Budget <approved> & signed\nNext review in May\u{7}".to_string();
        let xml = DocxRenderer::new().document_xml(&state).unwrap();

        assert!(xml.contains("Budget &lt;approved&gt; &amp; signed"));
        assert!(xml.contains("<w:br/>"));
        assert!(!xml.contains('\u{7}'));

        let mut reader = quick_xml::Reader::from_str(&xml);
        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("document.xml is not well formed: {}", e),
            }
        }
    }

    #[test]
    fn test_strip_control() {
        assert_eq!(strip_control("bell\u{7}\tok"), "bell\tok");
    }

    #[test]
    fn test_render_writes_zip_parts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("minutes.docx");

        let written = DocxRenderer::new().render(&complete_state(), &path).unwrap();
        assert_eq!(written, path);

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        for name in ["[Content_Types].xml", "_rels/.rels", "word/styles.xml"] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }

        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();
        assert!(document.contains("Budget set at 5M"));
    }
}
