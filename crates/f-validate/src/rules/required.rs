// File: src/rules/required.rs
// Purpose: `required` / `data-val-required`

use super::RuleContext;
use crate::dom::Dom;

pub(super) fn condition<D: Dom>(dom: &D, field: &D::Node) -> bool {
    dom.has_attribute(field, "required") || dom.has_attribute(field, "data-val-required")
}

/// Radios pass when any radio sharing the name is checked, checkboxes when
/// checked, everything else when the trimmed value is non-empty
pub(super) fn test<D: Dom>(cx: &RuleContext<'_, D>) -> bool {
    match cx.attribute("type").as_deref() {
        Some("radio") => {
            let Some(name) = cx.attribute("name") else {
                return cx.dom.is_checked(cx.field);
            };
            cx.named_all(None, &name)
                .iter()
                .any(|radio| cx.dom.is_checked(radio))
        }
        Some("checkbox") => cx.dom.is_checked(cx.field),
        _ => !cx.value().trim().is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::{applies, run};
    use crate::rules::Rule;
    use rstest::rstest;

    #[rstest]
    #[case("<input required>")]
    #[case("<input data-val-required>")]
    #[case("<select required></select>")]
    #[case("<textarea data-val-required></textarea>")]
    fn test_condition(#[case] html: &str) {
        assert!(applies(html, "input, select, textarea", Rule::Required));
    }

    #[test]
    fn test_no_marker_no_rule() {
        assert!(!applies("<input>", "input", Rule::Required));
    }

    #[rstest]
    #[case("<input required>", false)]
    #[case("<input required value=\"   \">", false)]
    #[case("<input required value=\"x\">", true)]
    #[case("<textarea required></textarea>", false)]
    #[case("<textarea required>text</textarea>", true)]
    #[case("<select required><option value=\"\">-</option><option value=\"1\">1</option></select>", false)]
    #[case("<select required><option value=\"\">-</option><option value=\"1\" selected>1</option></select>", true)]
    fn test_value_controls(#[case] html: &str, #[case] expected: bool) {
        assert_eq!(run(html, "input, select, textarea", Rule::Required), expected);
    }

    #[test]
    fn test_checkbox() {
        assert!(!run(r#"<input type="checkbox" required>"#, "input", Rule::Required));
        assert!(run(r#"<input type="checkbox" required checked>"#, "input", Rule::Required));
    }

    #[test]
    fn test_radio_group_is_satisfied_by_any_member() {
        let html = r#"<form>
            <input type="radio" name="size" value="s" required>
            <input type="radio" name="size" value="m" checked>
            <input type="radio" name="other" value="x">
        </form>"#;
        assert!(run(html, "[required]", Rule::Required));

        let unchecked = r#"<form>
            <input type="radio" name="size" required>
            <input type="radio" name="size">
            <input type="radio" name="other" checked>
        </form>"#;
        assert!(!run(unchecked, "[required]", Rule::Required));
    }
}
