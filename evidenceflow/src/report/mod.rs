//! Report rendering.

mod console;
mod markdown;

pub use console::{format_console_summary, ABOUT_PREVIEW_CHARS, NOT_FOUND};
pub use markdown::{render_markdown, MarkdownReportGenerator};

use crate::core::PipelineState;
use crate::errors::ReportError;

/// Renders a human-readable report for a finished extraction.
///
/// Implementations must tolerate `extracted_data == None`; a report is
/// produced whether or not extraction succeeded.
pub trait ReportGenerator: Send + Sync {
    /// Renders the report and returns its location.
    fn render(&self, state: &PipelineState) -> Result<String, ReportError>;
}
