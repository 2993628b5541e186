// File: src/rules/length.rs
// Purpose: `maxlength` / `minlength` and their data-attribute forms

use super::RuleContext;
use crate::dom::Dom;

/// Reads `native`, falling back to `data` when absent or empty
fn limit_attribute<D: Dom>(dom: &D, field: &D::Node, native: &str, data: &str) -> Option<String> {
    dom.attribute(field, native)
        .filter(|value| !value.is_empty())
        .or_else(|| dom.attribute(field, data))
}

pub(super) fn max_attribute<D: Dom>(dom: &D, field: &D::Node) -> Option<String> {
    limit_attribute(dom, field, "maxlength", "data-val-maxlength")
}

pub(super) fn min_attribute<D: Dom>(dom: &D, field: &D::Node) -> Option<String> {
    limit_attribute(dom, field, "minlength", "data-val-minlength")
}

pub(super) fn max_condition<D: Dom>(dom: &D, field: &D::Node) -> bool {
    dom.has_attribute(field, "maxlength") || dom.has_attribute(field, "data-val-maxlength")
}

pub(super) fn min_condition<D: Dom>(dom: &D, field: &D::Node) -> bool {
    dom.has_attribute(field, "minlength") || dom.has_attribute(field, "data-val-minlength")
}

pub(super) fn max_test<D: Dom>(cx: &RuleContext<'_, D>) -> bool {
    check(cx, max_attribute(cx.dom, cx.field), |length, limit| length <= limit)
}

pub(super) fn min_test<D: Dom>(cx: &RuleContext<'_, D>) -> bool {
    check(cx, min_attribute(cx.dom, cx.field), |length, limit| length >= limit)
}

/// Empty values and empty limits pass; an unreadable limit fails
fn check<D: Dom>(cx: &RuleContext<'_, D>, limit: Option<String>, within: fn(i64, i64) -> bool) -> bool {
    let value = cx.value();
    let limit = limit.unwrap_or_default();

    if value.is_empty() || limit.is_empty() {
        return true;
    }

    match parse_int(&limit) {
        Some(limit) => within(value.trim().chars().count() as i64, limit),
        None => false,
    }
}

/// Base-10 integer prefix, the way `parseInt(value, 10)` reads it
pub(crate) fn parse_int(source: &str) -> Option<i64> {
    let source = source.trim();
    let (sign, digits) = match source.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, source.strip_prefix('+').unwrap_or(source)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }

    // only overflow can fail here
    Some(sign * digits.parse::<i64>().unwrap_or(i64::MAX))
}
