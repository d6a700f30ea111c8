pub mod docx;
pub mod input;
pub mod output;

pub use docx::DocxRenderer;
pub use input::{
    SAMPLE_TITLE, SAMPLE_TRANSCRIPT, load_state_file, read_transcript_file, resolve_request,
    resolve_state_file,
};
pub use output::{format_summary, write_state_json};
