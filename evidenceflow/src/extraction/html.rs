//! Markup cleaning and regex hints.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// Elements whose whole subtree is dropped before extraction.
///
/// `footer` is deliberately absent: it usually carries the contact block.
pub const SKIPPED_ELEMENTS: [&str; 6] = ["script", "style", "noscript", "nav", "header", "aside"];

/// Elements that break text flow; their content is separated from neighbours.
/// Inline elements (`a`, `b`, `span`, ...) join their text without a gap.
const BLOCK_ELEMENTS: [&str; 27] = [
    "address", "article", "blockquote", "body", "br", "dd", "div", "dl", "dt", "footer", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "section", "table", "td", "th",
    "title", "tr",
];

/// Maximum characters kept from a labelled company-name hint.
const TITLE_HINT_MAX_CHARS: usize = 80;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

lazy_static! {
    static ref WHITESPACE: Regex = compile(r"\s+");
    static ref EMAIL: Regex = compile(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b");
    static ref PHONES: [Regex; 3] = [
        // International
        compile(r"\+?[0-9]{1,3}[-.\s]?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}"),
        // US
        compile(r"\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}"),
        // German
        compile(r"\+49[-.\s]?[0-9]{3,4}[-.\s]?[0-9]{7,8}"),
    ];
    static ref TITLE_LABEL: Regex = compile(r"(?im)\b(?:company|firma|unternehmen)\b[:\s]*([^\n]+)");
    static ref SHORT_LINE: Regex = compile(r"(?m)^(.{1,50})$");
}

/// Reduces markup to its visible text.
///
/// Drops the [`SKIPPED_ELEMENTS`] subtrees and comments, concatenates text
/// nodes, separates block-level elements with a space, collapses whitespace
/// and trims the result. Empty input yields an empty
/// string.
#[must_use]
pub fn clean_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let document = Html::parse_document(html);
    let mut chunks = Vec::new();
    collect_text(document.root_element(), &mut chunks);

    let joined = chunks.concat();
    WHITESPACE.replace_all(&joined, " ").trim().to_string()
}

fn collect_text<'a>(element: ElementRef<'a>, chunks: &mut Vec<&'a str>) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }
    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        chunks.push(" ");
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => chunks.push(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, chunks);
                }
            }
            _ => {}
        }
    }
    if block {
        chunks.push(" ");
    }
}

/// Finds email-like strings, in order of first appearance, without duplicates.
#[must_use]
pub fn extract_potential_emails(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for m in EMAIL.find_iter(text) {
        push_unique(&mut found, m.as_str());
    }
    found
}

/// Finds phone-like strings using international, US and German patterns.
#[must_use]
pub fn extract_potential_phones(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for pattern in PHONES.iter() {
        for m in pattern.find_iter(text) {
            push_unique(&mut found, m.as_str().trim());
        }
    }
    found
}

/// Guesses a company name from a `company:`/`Firma:`/`Unternehmen:` label,
/// falling back to the first short line.
#[must_use]
pub fn extract_title(text: &str) -> Option<String> {
    if let Some(caps) = TITLE_LABEL.captures(text) {
        let label: String = caps[1].trim().chars().take(TITLE_HINT_MAX_CHARS).collect();
        let label = label.trim();
        if !label.is_empty() {
            return Some(label.to_string());
        }
    }
    SHORT_LINE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|line| !line.is_empty())
}

fn push_unique(found: &mut Vec<String>, candidate: &str) {
    if !candidate.is_empty() && !found.iter().any(|f| f == candidate) {
        found.push(candidate.to_string());
    }
}

/// Prompt hints derived from cleaned page text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageHints {
    /// Candidate emails.
    pub emails: Vec<String>,
    /// Candidate phone numbers.
    pub phones: Vec<String>,
    /// Candidate company name.
    pub title: Option<String>,
}

impl PageHints {
    /// Scans cleaned text for hints.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            emails: extract_potential_emails(text),
            phones: extract_potential_phones(text),
            title: extract_title(text),
        }
    }
}
