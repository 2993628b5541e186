// File: src/messages.rs
// Purpose: Inline and grouped message rendering

use crate::constants::{ERROR_PLACEMENT_ATTR, FORM_ERROR, FORM_ERRORS, IS_HIDDEN};
use crate::dom::{Dom, Locator};
use crate::options::GroupErrorPlacement;

/// Element named by the field's `data-val-error-placement` locator
pub fn placement_element<D: Dom>(dom: &D, field: &D::Node, form: &D::Node) -> Option<D::Node> {
    let source = dom.attribute(field, ERROR_PLACEMENT_ATTR)?;
    let locator = Locator::parse(&source)?;
    dom.select_first(form, &locator)
}

fn is_error_element<D: Dom>(dom: &D, node: &Option<D::Node>) -> bool {
    node.as_ref()
        .map_or(false, |node| dom.has_class(node, FORM_ERROR))
}

/// Existing inline message element for `field`: the `.form-error` right after
/// its placement element, else right after the field
pub fn inline_error_element<D: Dom>(dom: &D, field: &D::Node, form: &D::Node) -> Option<D::Node> {
    if let Some(anchor) = placement_element(dom, field, form) {
        let next = dom.next_element_sibling(&anchor);
        if is_error_element(dom, &next) {
            return next;
        }
    }

    let next = dom.next_element_sibling(field);
    if is_error_element(dom, &next) {
        return next;
    }

    None
}

/// Shows `message` in `existing`, or in a new `<p class="form-error">` placed
/// after the anchor
pub fn display_inline<D: Dom>(
    dom: &mut D,
    existing: Option<D::Node>,
    message: &str,
    field: &D::Node,
    form: &D::Node,
) {
    let element = match existing {
        Some(element) => element,
        None => {
            let anchor = placement_element(dom, field, form).unwrap_or_else(|| field.clone());
            let Some(parent) = dom.parent(&anchor) else {
                return;
            };

            let element = dom.create_element("p");
            dom.add_class(&element, FORM_ERROR);
            let reference = dom.next_element_sibling(&anchor);
            dom.insert_before(&parent, &element, reference.as_ref());
            element
        }
    };

    dom.set_text(&element, message);
    dom.remove_class(&element, IS_HIDDEN);
}

pub fn hide<D: Dom>(dom: &mut D, element: Option<&D::Node>) {
    if let Some(element) = element {
        dom.add_class(element, IS_HIDDEN);
        dom.clear(element);
    }
}

pub fn grouped_error_element<D: Dom>(dom: &D, form: &D::Node) -> Option<D::Node> {
    dom.select_first(form, &Locator::class(FORM_ERRORS))
}

/// Child of `form` the grouped list is inserted before; `None` appends
fn grouped_position<D: Dom>(dom: &D, form: &D::Node, placement: &GroupErrorPlacement) -> Option<D::Node> {
    match placement {
        GroupErrorPlacement::Bottom => None,
        GroupErrorPlacement::Locator(source) => Locator::parse(source)
            .and_then(|locator| dom.select_first(form, &locator))
            .or_else(|| dom.first_child(form)),
        GroupErrorPlacement::Top | GroupErrorPlacement::Disabled => dom.first_child(form),
    }
}

/// Renders every message as one `<li>` of the grouped list, creating the list
/// at the configured position on first use
pub fn display_grouped<D: Dom>(
    dom: &mut D,
    existing: Option<D::Node>,
    messages: &[String],
    form: &D::Node,
    placement: &GroupErrorPlacement,
) {
    let list = match existing {
        Some(list) => {
            dom.clear(&list);
            dom.remove_class(&list, IS_HIDDEN);
            list
        }
        None => {
            let list = dom.create_element("ul");
            dom.add_class(&list, FORM_ERRORS);

            let reference = grouped_position(dom, form, placement);
            match reference.as_ref().and_then(|node| dom.parent(node)) {
                Some(parent) => dom.insert_before(&parent, &list, reference.as_ref()),
                None => dom.insert_before(form, &list, None),
            }
            list
        }
    };

    for message in messages {
        let item = dom.create_element("li");
        dom.set_text(&item, message);
        dom.insert_before(&list, &item, None);
    }
}
