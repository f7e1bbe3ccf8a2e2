//! URL input handling for the command line.

/// Trims user input and prepends `https://` when no HTTP scheme is given.
///
/// Returns `None` for blank input.
#[must_use]
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_prepended() {
        assert_eq!(normalize_url("example.com"), Some("https://example.com".to_string()));
        assert_eq!(
            normalize_url("  leadlane.de/impressum \n"),
            Some("https://leadlane.de/impressum".to_string())
        );
    }

    #[test]
    fn test_existing_scheme_is_kept() {
        assert_eq!(normalize_url("http://example.com"), Some("http://example.com".to_string()));
        assert_eq!(normalize_url("https://example.com"), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize_url(""), None);
        assert_eq!(normalize_url("   "), None);
    }
}
