// File: src/rules/conditional_required.rs
// Purpose: `data-val-conditionalRequired`: required unless the named box is checked

use super::RuleContext;
use crate::dom::Dom;

const ATTR: &str = "data-val-conditionalrequired";

pub(super) fn condition<D: Dom>(dom: &D, field: &D::Node) -> bool {
    dom.has_attribute(field, ATTR)
}

/// A missing dependency counts as checked, so the field is not required
pub(super) fn test<D: Dom>(cx: &RuleContext<'_, D>) -> bool {
    let name = cx.attribute(ATTR).unwrap_or_default();
    let opted_out = cx
        .named(None, &name)
        .map_or(true, |dependency| cx.dom.is_checked(&dependency));

    opted_out || !cx.value().trim().is_empty()
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::{applies, run};
    use crate::rules::Rule;
    use rstest::rstest;

    #[test]
    fn test_condition_is_case_insensitive() {
        assert!(applies(
            r#"<input data-val-conditionalRequired="optOut">"#,
            "input",
            Rule::ConditionalRequired
        ));
    }

    #[rstest]
    #[case("", "", false)]
    #[case("", "value", true)]
    #[case("checked", "value", true)]
    #[case("checked", "", true)]
    #[case("", "   ", false)]
    fn test_dependency(#[case] checked: &str, #[case] value: &str, #[case] expected: bool) {
        let html = format!(
            r#"<form>
                <input type="checkbox" name="optOut" {}>
                <input id="field" data-val-conditionalRequired="optOut" value="{}">
            </form>"#,
            checked, value
        );
        assert_eq!(run(&html, "#field", Rule::ConditionalRequired), expected);
    }

    #[test]
    fn test_missing_dependency_is_not_required() {
        let html = r#"<form><input id="field" data-val-conditionalRequired="nope" value=""></form>"#;
        assert!(run(html, "#field", Rule::ConditionalRequired));
    }
}
