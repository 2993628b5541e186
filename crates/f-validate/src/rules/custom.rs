// File: src/rules/custom.rs
// Purpose: `data-val-custom`, resolved against registered handlers per call

use super::RuleContext;
use crate::dom::Dom;
use crate::error::{Error, Result};

const ATTR: &str = "data-val-custom";
const ERROR_ATTR: &str = "data-val-custom-error";

pub(super) fn condition<D: Dom>(dom: &D, field: &D::Node) -> Result<bool> {
    let has_custom = dom.has_attribute(field, ATTR);

    if !has_custom && dom.has_attribute(field, ERROR_ATTR) {
        return Err(Error::CustomErrorWithoutCustom);
    }

    Ok(has_custom)
}

pub(super) fn error_attribute<D: Dom>(dom: &D, field: &D::Node) -> Option<String> {
    dom.attribute(field, ERROR_ATTR).filter(|message| !message.is_empty())
}

pub(super) fn test<D: Dom>(cx: &RuleContext<'_, D>) -> Result<bool> {
    let name = cx.attribute(ATTR).unwrap_or_default();

    match cx.handlers.get(&name) {
        Some(handler) => Ok(handler(cx)),
        None => Err(Error::UnregisteredCustomHandler(name)),
    }
}
