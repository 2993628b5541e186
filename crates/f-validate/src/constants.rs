// File: src/constants.rs
// Purpose: Class names, marker attributes and patterns shared across the engine

use once_cell::sync::Lazy;
use regex::Regex;

/// Class added to an inline message element while it has no message
pub const IS_HIDDEN: &str = "is-hidden";

/// Class of an inline message element
pub const FORM_ERROR: &str = "form-error";

/// Class of the grouped message list
pub const FORM_ERRORS: &str = "form-errors";

/// Default error class for fields and the form
pub const HAS_ERROR: &str = "has-error";

/// Default success class for fields and the form
pub const HAS_SUCCESS: &str = "has-success";

/// Marks a container whose controls are validated as one field
pub const VALIDATION_GROUP: &str = "data-val-group";

/// Set on a group sub-element once it has fired an incremental trigger
pub const TOUCHED_ATTR: &str = "data-touched";

/// Set on a field after its first blur in hybrid mode
pub const BLURRED_ATTR: &str = "data-blurred";

/// Opts a control out of validation
pub const NO_VALIDATE_ATTR: &str = "data-novalidate";

/// Per-field locator for where the inline message goes
pub const ERROR_PLACEMENT_ATTR: &str = "data-val-error-placement";

/// Candidate fields under a form
pub const FIELD_CRITERIA: &str = "input, select, textarea, [data-val-group]";

/// Built-in email pattern
pub static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&’*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("built-in email pattern compiles")
});

/// Characters escaped in a value before it is tested against a `pattern`
pub static ESCAPE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[|\\{}()\[\]^$+*?.]").expect("escape set compiles"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL.is_match("valid@test.com"));
        assert!(EMAIL.is_match("first.last+tag@sub.example.co.uk"));
        assert!(!EMAIL.is_match("invalidEmailFormat"));
        assert!(!EMAIL.is_match("@test.com"));
        assert!(!EMAIL.is_match("`invalid@test`"));
    }

    #[test]
    fn test_escape_chars() {
        assert_eq!(ESCAPE_CHARS.replace_all("a.b(c)", r"\$0"), r"a\.b\(c\)");
        assert_eq!(ESCAPE_CHARS.replace_all("plain", r"\$0"), "plain");
    }
}
