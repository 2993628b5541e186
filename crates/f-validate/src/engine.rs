// File: src/engine.rs
// Purpose: Evaluates the rule registry against one field

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::dom::Dom;
use crate::error::Result;
use crate::options::Options;
use crate::rules::{CustomHandler, Rule, RuleContext};
use crate::touch;

/// The field an incremental (blur/keyup) pass is scoped to.
///
/// For a validation group, `field` is the group and `child` the control that
/// fired the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext<N> {
    pub field: N,
    pub child: Option<N>,
}

impl<N> ValidationContext<N> {
    pub fn field(field: N) -> Self {
        Self { field, child: None }
    }

    pub fn child(field: N, child: N) -> Self {
        Self {
            field,
            child: Some(child),
        }
    }
}

/// Result of evaluating one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    /// False once any rule failed
    pub valid: bool,
    /// At least one rule applied; fields with no rule get no class
    pub has_any_rule: bool,
    /// One message per failed rule, in registry order
    pub messages: Vec<String>,
    pub failed: Vec<Rule>,
}

impl Default for FieldOutcome {
    fn default() -> Self {
        Self {
            valid: true,
            has_any_rule: false,
            messages: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl FieldOutcome {
    /// Message shown inline next to the field
    pub fn first_message(&self) -> Option<&str> {
        self.messages.first().map(String::as_str)
    }
}

/// What the rules of one pass may consult besides the field itself
pub struct Environment<'a, D: Dom> {
    pub scope: &'a D::Node,
    pub current: Option<&'a ValidationContext<D::Node>>,
    pub options: &'a Options,
    pub handlers: &'a HashMap<String, CustomHandler<D>>,
    pub today: NaiveDate,
}

/// Runs every applicable rule on `field` in registry order.
///
/// During an incremental pass the firing group child is marked touched before
/// a gated rule is considered. Rule errors (misconfigured custom validation)
/// abort the evaluation.
pub fn evaluate<D: Dom>(dom: &mut D, field: &D::Node, env: &Environment<'_, D>) -> Result<FieldOutcome> {
    let mut outcome = FieldOutcome::default();

    for rule in Rule::ALL {
        if !rule.condition(&*dom, field)? {
            continue;
        }
        outcome.has_any_rule = true;

        let locators = rule.touched_locators();
        if !locators.is_empty() {
            if let Some(current) = env.current {
                if let Some(child) = &current.child {
                    touch::mark_touched(dom, child);
                }
                if touch::should_skip(&*dom, field, &locators, &env.options.error_class) {
                    tracing::trace!(rule = %rule, "group not fully touched, test skipped");
                    continue;
                }
            }
        }

        let cx = RuleContext {
            dom: &*dom,
            field,
            scope: env.scope,
            current: env.current,
            options: env.options,
            handlers: env.handlers,
            today: env.today,
        };

        if !rule.test(&cx)? {
            tracing::trace!(rule = %rule, "rule failed");
            outcome.valid = false;
            outcome.messages.push(rule.message(&*dom, field));
            outcome.failed.push(rule);
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, NodeId};
    use crate::rules::testing::today;
    use pretty_assertions::assert_eq;

    fn outcome(
        doc: &mut MemoryDocument,
        field: NodeId,
        current: Option<&ValidationContext<NodeId>>,
    ) -> FieldOutcome {
        let scope = doc.query("form").unwrap_or_else(|| doc.document_root());
        let options = Options::default();
        let handlers = HashMap::new();
        let env = Environment {
            scope: &scope,
            current,
            options: &options,
            handlers: &handlers,
            today: today(),
        };
        evaluate(doc, &field, &env).unwrap()
    }

    #[test]
    fn test_field_without_rules() {
        let mut doc = MemoryDocument::parse("<form><input name='plain'></form>");
        let field = doc.query("input").unwrap();

        assert_eq!(outcome(&mut doc, field, None), FieldOutcome::default());
    }

    #[test]
    fn test_failures_are_sticky_and_ordered() {
        let mut doc = MemoryDocument::parse(
            r#"<form><input type="email" minlength="10" pattern="[0-9]+" value="abc"></form>"#,
        );
        let field = doc.query("input").unwrap();
        let result = outcome(&mut doc, field, None);

        assert!(!result.valid);
        assert!(result.has_any_rule);
        assert_eq!(result.failed, vec![Rule::MinLength, Rule::Pattern, Rule::Email]);
        assert_eq!(
            result.first_message(),
            Some("This field must be at least 10 characters in length.")
        );
    }

    #[test]
    fn test_later_pass_does_not_clear_failure() {
        let mut doc = MemoryDocument::parse(r#"<form><input required maxlength="5" value=""></form>"#);
        let field = doc.query("input").unwrap();
        let result = outcome(&mut doc, field, None);

        assert!(!result.valid);
        assert_eq!(result.failed, vec![Rule::Required]);
    }

    #[test]
    fn test_incremental_group_waits_for_touch() {
        let mut doc = MemoryDocument::parse(
            r#"<form><div data-val-group data-val-dateinfuture>
                <select data-val-dateinfuture-type="month"><option value="01" selected>01</option></select>
                <select data-val-dateinfuture-type="year"><option value="2017" selected>2017</option></select>
            </div></form>"#,
        );
        let group = doc.query("div").unwrap();
        let selects = doc.query_all("select");

        let month = ValidationContext::child(group, selects[0]);
        let first = outcome(&mut doc, group, Some(&month));
        assert!(first.valid);
        assert!(first.has_any_rule);
        assert!(touch::is_touched(&doc, &selects[0]));

        let year = ValidationContext::child(group, selects[1]);
        let second = outcome(&mut doc, group, Some(&year));
        assert_eq!(second.failed, vec![Rule::DateInFuture]);
    }

    #[test]
    fn test_full_pass_never_waits_for_touch() {
        let mut doc = MemoryDocument::parse(
            r#"<form><div data-val-group data-val-dateinfuture>
                <select data-val-dateinfuture-type="month"></select>
                <select data-val-dateinfuture-type="year"></select>
            </div></form>"#,
        );
        let group = doc.query("div").unwrap();

        assert_eq!(outcome(&mut doc, group, None).failed, vec![Rule::DateInFuture]);
    }
}
