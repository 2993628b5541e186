// File: src/rules/matches.rs
// Purpose: `data-val-equalto`

use super::RuleContext;
use crate::dom::Dom;

const ATTR: &str = "data-val-equalto";

pub(super) fn condition<D: Dom>(dom: &D, field: &D::Node) -> bool {
    dom.has_attribute(field, ATTR)
}

/// Target field name with any `*.` model prefix removed
pub(super) fn target_name<D: Dom>(dom: &D, field: &D::Node) -> Option<String> {
    dom.attribute(field, ATTR)
        .map(|name| name.replacen("*.", "", 1))
}

/// Fails when no target is named, the target is missing, or the values differ
pub(super) fn test<D: Dom>(cx: &RuleContext<'_, D>) -> bool {
    let Some(name) = target_name(cx.dom, cx.field).filter(|name| !name.is_empty()) else {
        return false;
    };

    match cx.named(Some("input"), &name) {
        Some(target) => cx.dom.value(&target).unwrap_or_default() == cx.value(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::{applies, run};
    use crate::rules::Rule;

    #[test]
    fn test_condition_with_empty_value() {
        assert!(applies(r#"<input data-val-equalto>"#, "input", Rule::Matches));
        assert!(!applies("<input>", "input", Rule::Matches));
    }

    #[test]
    fn test_values_differ() {
        let html = r#"<form>
            <input name="target" value="abc">
            <input id="confirm" data-val-equalto="target" value="abd">
        </form>"#;
        assert!(!run(html, "#confirm", Rule::Matches));
    }

    #[test]
    fn test_no_target_named() {
        let html = r#"<form><input name="target" value=""><input id="confirm" data-val-equalto="" value=""></form>"#;
        assert!(!run(html, "#confirm", Rule::Matches));
    }

    #[test]
    fn test_target_missing() {
        let html = r#"<form><input id="confirm" data-val-equalto="nowhere" value="x"></form>"#;
        assert!(!run(html, "#confirm", Rule::Matches));
    }

    #[test]
    fn test_values_match_with_model_prefix() {
        let html = r#"<form>
            <input name="Password" value="abc">
            <input id="confirm" data-val-equalto="*.Password" value="abc">
        </form>"#;
        assert!(run(html, "#confirm", Rule::Matches));
    }
}
