//! Markdown report files.

use super::console::NOT_FOUND;
use super::ReportGenerator;
use crate::audit::state_digests;
use crate::core::{CompanyInfo, PipelineState};
use crate::errors::ReportError;
use crate::utils::{create_unique, file_stamp, iso_format, now_utc, Timestamp};
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `report_YYYYMMDD_HHMMSS.md` files into a directory.
#[derive(Debug, Clone)]
pub struct MarkdownReportGenerator {
    dir: PathBuf,
}

impl MarkdownReportGenerator {
    /// Creates a generator writing into `dir`. The directory is created lazily.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The report directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReportGenerator for MarkdownReportGenerator {
    fn render(&self, state: &PipelineState) -> Result<String, ReportError> {
        let at = now_utc();
        let body = render_markdown(state, &at)?;

        fs::create_dir_all(&self.dir).map_err(|source| ReportError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let stamp = file_stamp(&at);
        let (path, mut file) =
            create_unique(&self.dir, &format!("report_{stamp}"), "md").map_err(|source| {
                ReportError::Write {
                    path: self.dir.clone(),
                    source,
                }
            })?;
        file.write_all(body.as_bytes())
            .map_err(|source| ReportError::Write {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "Report generated");
        Ok(path.display().to_string())
    }
}

fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Renders the Markdown report body.
pub fn render_markdown(state: &PipelineState, at: &Timestamp) -> Result<String, ReportError> {
    let (state_hash, data_hash) =
        state_digests(state).map_err(|e| ReportError::Render(e.to_string()))?;
    let status = if state.validated() { "PASSED" } else { "FAILED" };

    let mut out = String::new();
    let w = |e: std::fmt::Error| ReportError::Render(e.to_string());
    writeln!(out, "# Compliance Evidence Report\n").map_err(w)?;
    writeln!(out, "- **URL:** {}", state.url()).map_err(w)?;
    writeln!(out, "- **Generated:** {}", iso_format(at)).map_err(w)?;
    writeln!(out, "- **Validation:** {status}").map_err(w)?;
    writeln!(out, "- **Retry attempts:** {}", state.retry_count()).map_err(w)?;
    writeln!(out, "\n## Extracted Company Information\n").map_err(w)?;

    match state.company_info() {
        Some(info) => write_fields(&mut out, &info).map_err(w)?,
        None => writeln!(out, "No data could be extracted from this page.").map_err(w)?,
    }

    writeln!(out, "\n## Integrity\n").map_err(w)?;
    writeln!(out, "- **State digest:** `{state_hash}`").map_err(w)?;
    writeln!(out, "- **Data digest:** `{data_hash}`").map_err(w)?;
    Ok(out)
}

fn write_fields(out: &mut String, info: &CompanyInfo) -> std::fmt::Result {
    writeln!(out, "| Field | Value |")?;
    writeln!(out, "|-------|-------|")?;
    for (name, value) in info.fields() {
        let value = value.filter(|v| !v.is_empty()).unwrap_or(NOT_FOUND);
        writeln!(out, "| {name} | {} |", table_cell(value))?;
    }
    Ok(())
}
