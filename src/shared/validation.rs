use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slug fields (categories, articles)
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "getting-started", "faq", "release-notes-2025"
    /// - Invalid: "Getting-Started", "faq!", "release_notes", ""
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("getting-started"));
        assert!(SLUG_REGEX.is_match("faq"));
        assert!(SLUG_REGEX.is_match("release-notes-2025"));
        assert!(SLUG_REGEX.is_match("a"));
        assert!(SLUG_REGEX.is_match("123"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("Getting-Started")); // uppercase
        assert!(!SLUG_REGEX.is_match("faq!")); // punctuation
        assert!(!SLUG_REGEX.is_match("release_notes")); // underscore
        assert!(!SLUG_REGEX.is_match("with space")); // space
        assert!(!SLUG_REGEX.is_match("")); // empty
    }
}
