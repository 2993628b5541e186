// File: src/rules/email.rs
// Purpose: `type="email"`

use super::RuleContext;
use crate::constants::EMAIL;
use crate::dom::Dom;

pub(super) fn condition<D: Dom>(dom: &D, field: &D::Node) -> bool {
    dom.attribute(field, "type").as_deref() == Some("email")
}

pub(super) fn test<D: Dom>(cx: &RuleContext<'_, D>) -> bool {
    let value = cx.value();
    if value.is_empty() {
        return true;
    }

    let regex = cx.options.custom_email_regex.as_ref().unwrap_or(&*EMAIL);
    regex.is_match(&value)
}
