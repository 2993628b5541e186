// File: src/touch.rs
// Purpose: Touched-state tracking for the sub-elements of a validation group

use crate::constants::TOUCHED_ATTR;
use crate::dom::{Dom, Locator};

/// Marks a group sub-element as interacted with
pub fn mark_touched<D: Dom>(dom: &mut D, child: &D::Node) {
    if !dom.has_attribute(child, TOUCHED_ATTR) {
        dom.set_attribute(child, TOUCHED_ATTR, "true");
    }
}

pub fn is_touched<D: Dom>(dom: &D, child: &D::Node) -> bool {
    dom.has_attribute(child, TOUCHED_ATTR)
}

/// Whether a gated rule should wait: the group is not showing an error yet
/// and at least one located sub-element has not been touched.
///
/// Locators with no match in the group are ignored.
pub fn should_skip<D: Dom>(dom: &D, group: &D::Node, locators: &[Locator], error_class: &str) -> bool {
    if dom.has_class(group, error_class) {
        return false;
    }

    locators
        .iter()
        .filter_map(|locator| dom.select_first(group, locator))
        .any(|child| !is_touched(dom, &child))
}
