// File: src/fields.rs
// Purpose: Field discovery under a form

use crate::constants::{FIELD_CRITERIA, NO_VALIDATE_ATTR, VALIDATION_GROUP};
use crate::dom::{Dom, Locator};

fn criteria() -> Locator {
    Locator::parse(FIELD_CRITERIA).unwrap_or_else(|| Locator::attribute(VALIDATION_GROUP, None))
}

/// Fields to validate under `root`, in document order.
///
/// Hidden, disabled and `data-novalidate` controls are left out, as are the
/// direct children of a validation group, which is validated as one field.
pub fn select_fields<D: Dom>(dom: &D, root: &D::Node) -> Vec<D::Node> {
    dom.select(root, &criteria())
        .into_iter()
        .filter(|field| dom.attribute(field, "type").as_deref() != Some("hidden"))
        .filter(|field| !dom.has_attribute(field, "disabled"))
        .filter(|field| !dom.has_attribute(field, NO_VALIDATE_ATTR))
        .filter(|field| {
            !dom.parent(field)
                .map_or(false, |parent| dom.has_attribute(&parent, VALIDATION_GROUP))
        })
        .collect()
}

/// Controls inside a validation group that report interaction for it
pub fn group_children<D: Dom>(dom: &D, group: &D::Node) -> Vec<D::Node> {
    dom.select(group, &criteria())
}

pub fn is_group<D: Dom>(dom: &D, field: &D::Node) -> bool {
    dom.has_attribute(field, VALIDATION_GROUP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use pretty_assertions::assert_eq;

    fn names(doc: &MemoryDocument, fields: &[crate::dom::NodeId]) -> Vec<String> {
        fields
            .iter()
            .map(|field| {
                doc.attribute(field, "name")
                    .unwrap_or_else(|| doc.tag_name(field))
            })
            .collect()
    }

    #[test]
    fn test_select_fields_in_document_order() {
        let doc = MemoryDocument::parse(
            r#"<form>
                <textarea name="comments"></textarea>
                <input name="first">
                <select name="country"></select>
                <button name="go">Go</button>
            </form>"#,
        );
        let form = doc.query("form").unwrap();

        assert_eq!(
            names(&doc, &select_fields(&doc, &form)),
            vec!["comments", "first", "country"]
        );
    }

    #[test]
    fn test_excluded_fields() {
        let doc = MemoryDocument::parse(
            r#"<form>
                <input name="hidden" type="hidden">
                <input name="disabled" disabled>
                <input name="skipped" data-novalidate>
                <input name="kept">
            </form>"#,
        );
        let form = doc.query("form").unwrap();

        assert_eq!(names(&doc, &select_fields(&doc, &form)), vec!["kept"]);
    }

    #[test]
    fn test_group_replaces_its_children() {
        let doc = MemoryDocument::parse(
            r#"<form>
                <div data-val-group name="expiry">
                    <select name="month"></select>
                    <select name="year"></select>
                </div>
            </form>"#,
        );
        let form = doc.query("form").unwrap();
        let fields = select_fields(&doc, &form);

        assert_eq!(names(&doc, &fields), vec!["expiry"]);
        assert!(is_group(&doc, &fields[0]));
        assert_eq!(names(&doc, &group_children(&doc, &fields[0])), vec!["month", "year"]);
    }
}
