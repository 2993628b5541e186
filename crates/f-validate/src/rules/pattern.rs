// File: src/rules/pattern.rs
// Purpose: `pattern` / `data-val-regex`

use regex::RegexBuilder;

use super::RuleContext;
use crate::constants::ESCAPE_CHARS;
use crate::dom::Dom;

pub(super) fn condition<D: Dom>(dom: &D, field: &D::Node) -> bool {
    dom.has_attribute(field, "pattern") || dom.has_attribute(field, "data-val-regex")
}

/// The escaped value must match the whole pattern, case-insensitively
pub(super) fn test<D: Dom>(cx: &RuleContext<'_, D>) -> bool {
    let value = cx.value();
    if value.is_empty() {
        return true;
    }

    let pattern = cx
        .attribute("pattern")
        .filter(|pattern| !pattern.is_empty())
        .or_else(|| cx.attribute("data-val-regex"))
        .unwrap_or_default();

    let regex = match RegexBuilder::new(&format!("^(?:{})$", pattern))
        .case_insensitive(true)
        .multi_line(true)
        .build()
    {
        Ok(regex) => regex,
        Err(e) => {
            tracing::warn!(pattern = %pattern, error = %e, "field pattern does not compile");
            return false;
        }
    };

    let escaped = ESCAPE_CHARS.replace_all(&value, r"\$0");
    regex.is_match(&escaped)
}
