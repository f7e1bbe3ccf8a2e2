//! Prompt construction for first-pass and corrective extraction.

use super::html::PageHints;
use std::borrow::Cow;
use std::fmt::Write as _;

/// Maximum number of email and phone hints listed in a prompt.
pub const MAX_HINTS: usize = 3;

/// Marker appended to truncated content.
pub const TRUNCATION_MARKER: &str = "...";

/// Cuts `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Counts characters, not bytes, so multi-byte text never splits.
#[must_use]
pub fn truncate_content(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}{TRUNCATION_MARKER}", &text[..byte_idx])),
        None => Cow::Borrowed(text),
    }
}

fn context_block(hints: &PageHints) -> String {
    let mut context = String::new();
    if let Some(title) = &hints.title {
        let _ = write!(context, "\nPossible company name: {title}");
    }
    if !hints.emails.is_empty() {
        let emails: Vec<&str> = hints.emails.iter().take(MAX_HINTS).map(String::as_str).collect();
        let _ = write!(context, "\nFound potential emails: {}", emails.join(", "));
    }
    if !hints.phones.is_empty() {
        let phones: Vec<&str> = hints.phones.iter().take(MAX_HINTS).map(String::as_str).collect();
        let _ = write!(context, "\nFound potential phones: {}", phones.join(", "));
    }
    if context.is_empty() {
        context.push_str("\n(none)");
    }
    context
}

/// Builds the first-pass extraction prompt.
///
/// `content` must already be cleaned and truncated.
#[must_use]
pub fn build_extraction_prompt(content: &str, hints: &PageHints) -> String {
    format!(
        r#"
Extract the company information below from the web page content and return ONLY a valid JSON object.

The page may be written in English OR German. Handle both languages.

Fields:
1. company_name: the official company name (logos, headings, page title, footer copyright)
2. contact_email: a contact email address (mailto: links, anything shaped like name@domain.tld, "Kontakt" sections)
3. phone_number: a phone number ("Tel:", "Telefon:", international formats)
4. address: the postal address or location (street, postcode, city)
5. about_us_text: an about-us, mission or service description, kept in its original language

WHERE TO LOOK:
- Headers, footers, contact sections and legal notices
- English and German vocabulary:
  * Contact: "Contact", "Kontakt", "Reach us", "Kontaktieren Sie uns"
  * About: "About", "About us", "Über uns", "Wir sind"
  * Legal: "Impressum" (legal notice), "Datenschutz" (privacy policy)
- Company names often sit in the title, the first heading or the copyright line
- Keep German text German in about_us_text
- Use the hints below, but only when the content supports them

HINTS:{context}

Page content:
{content}

Return ONLY a JSON object with exactly these keys. Use null for any field you cannot find.

Example:
{{
    "company_name": "Beispiel GmbH",
    "contact_email": "kontakt@beispiel.de",
    "phone_number": "+49-30-1234567",
    "address": "Musterstraße 1, 10115 Berlin, Germany",
    "about_us_text": "German or English description here..."
}}
"#,
        context = context_block(hints),
    )
}

/// Builds the corrective prompt used for the single retry.
///
/// `content` must already be cleaned and truncated.
#[must_use]
pub fn build_retry_prompt(content: &str) -> String {
    format!(
        r#"
The previous extraction attempt failed. Try again with the content below and be very careful to return ONLY valid JSON.

IMPORTANT: the content may be GERMAN or English. Search in both languages.

Look specifically for:
- Company name (header, title, footer, about section)
- Email addresses (contact@, info@, support@, mailto: links)
- Phone numbers ((xxx) xxx-xxxx, +x-xxx-xxx-xxxx, Tel:, Telefon:)
- Address (street, city, postcode, German address formats)
- About-us text (paragraphs describing the company, original language)

GERMAN VOCABULARY:
- "Kontakt" = Contact
- "Über uns" = About us
- "Impressum" = Legal notice
- "Datenschutz" = Privacy policy
- "Sprechen Sie uns an" = Get in touch
- "Wir freuen uns" = We look forward to

Page content:
{content}

Return ONLY a valid JSON object with the keys company_name, contact_email, phone_number, address and about_us_text. No explanations, no markdown formatting, just the JSON.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_is_borrowed() {
        let out = truncate_content("short", 10);
        assert!(matches!(out, Cow::Borrowed("short")));
    }

    #[test]
    fn test_truncate_exact_length_is_unchanged() {
        assert_eq!(truncate_content("abcde", 5), "abcde");
    }

    #[test]
    fn test_truncate_appends_marker() {
        assert_eq!(truncate_content("abcdefgh", 3), "abc...");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "Über uns: Größe";
        let out = truncate_content(text, 2);
        assert_eq!(out, "Üb...");
    }

    #[test]
    fn test_extraction_prompt_lists_at_most_three_hints() {
        let hints = PageHints {
            emails: (1..=5).map(|i| format!("e{i}@acme.de")).collect(),
            phones: vec!["+49 30 1234567".to_string()],
            title: Some("Acme".to_string()),
        };

        let prompt = build_extraction_prompt("page text", &hints);

        assert!(prompt.contains("Found potential emails: e1@acme.de, e2@acme.de, e3@acme.de\n"));
        assert!(!prompt.contains("e4@acme.de"));
        assert!(prompt.contains("Found potential phones: +49 30 1234567"));
        assert!(prompt.contains("Possible company name: Acme"));
        assert!(prompt.contains("page text"));
    }

    #[test]
    fn test_extraction_prompt_names_every_field() {
        let prompt = build_extraction_prompt("x", &PageHints::default());

        for field in crate::core::CompanyInfo::FIELDS {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("Impressum"));
        assert!(prompt.contains("(none)"));
    }

    #[test]
    fn test_retry_prompt() {
        let prompt = build_retry_prompt("retry content");

        assert!(prompt.contains("previous extraction attempt failed"));
        assert!(prompt.contains("Sprechen Sie uns an"));
        assert!(prompt.contains("no markdown formatting"));
        assert!(prompt.contains("retry content"));
    }
}
