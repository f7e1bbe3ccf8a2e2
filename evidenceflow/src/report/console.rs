//! Plain-text run summary for terminals.

use crate::core::PipelineState;
use std::fmt::Write as _;

/// Placeholder printed for absent fields.
pub const NOT_FOUND: &str = "Not found";

/// Characters of about-us text shown before it is cut.
pub const ABOUT_PREVIEW_CHARS: usize = 200;

const RULE_WIDTH: usize = 50;

/// Formats the end-of-run summary printed by the CLI.
#[must_use]
pub fn format_console_summary(state: &PipelineState) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "\n{rule}\nEXTRACTION RESULTS\n{rule}");

    match state.company_info() {
        Some(info) => {
            let show = |value: Option<&String>| {
                value
                    .map(String::as_str)
                    .filter(|v| !v.is_empty())
                    .unwrap_or(NOT_FOUND)
                    .to_string()
            };
            let _ = writeln!(out, "Company Name: {}", show(info.company_name.as_ref()));
            let _ = writeln!(out, "Contact Email: {}", show(info.contact_email.as_ref()));
            let _ = writeln!(out, "Phone Number: {}", show(info.phone_number.as_ref()));
            let _ = writeln!(out, "Address: {}", show(info.address.as_ref()));
            let _ = writeln!(out, "About Us: {}", about_preview(info.about_us_text.as_deref()));
        }
        None => {
            let _ = writeln!(out, "No data was extracted successfully.");
        }
    }

    let status = if state.validated() { "Success" } else { "Failed" };
    let _ = writeln!(out, "\nValidation Status: {status}");
    let _ = writeln!(out, "Retry Attempts: {}", state.retry_count());
    if let Some(report) = state.report() {
        let _ = writeln!(out, "\nReport saved to: {report}");
    }
    out
}

fn about_preview(text: Option<&str>) -> String {
    match text.filter(|t| !t.is_empty()) {
        None => NOT_FOUND.to_string(),
        Some(text) => match text.char_indices().nth(ABOUT_PREVIEW_CHARS) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.to_string(),
        },
    }
}
