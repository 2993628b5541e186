// File: src/rules/mod.rs
// Purpose: Rule registry, the rule context, and message templates

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

use crate::dom::{Dom, Locator};
use crate::engine::ValidationContext;
use crate::error::Result;
use crate::options::Options;

mod conditional_required;
mod custom;
mod date_in_future;
mod email;
mod length;
mod matches;
mod pattern;
mod required;

/// Handler registered with [`crate::FormValidation::add_custom_validation`]
pub type CustomHandler<D> = Box<dyn Fn(&RuleContext<'_, D>) -> bool>;

/// Everything a rule test may look at.
///
/// Lookups by name (radio groups, `matches`, `conditionalRequired`) are scoped
/// to `scope`, the bound form.
pub struct RuleContext<'a, D: Dom> {
    pub dom: &'a D,
    pub field: &'a D::Node,
    pub scope: &'a D::Node,
    /// Present during blur/keyup validation
    pub current: Option<&'a ValidationContext<D::Node>>,
    pub options: &'a Options,
    pub handlers: &'a HashMap<String, CustomHandler<D>>,
    pub today: NaiveDate,
}

impl<'a, D: Dom> RuleContext<'a, D> {
    /// Field value, empty for elements that have none
    pub fn value(&self) -> String {
        self.dom.value(self.field).unwrap_or_default()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.dom.attribute(self.field, name)
    }

    /// First element under the scope whose `name` equals `name`
    pub fn named(&self, tag: Option<&str>, name: &str) -> Option<D::Node> {
        self.named_all(tag, name).into_iter().next()
    }

    pub fn named_all(&self, tag: Option<&str>, name: &str) -> Vec<D::Node> {
        self.dom
            .descendants(self.scope)
            .into_iter()
            .filter(|node| tag.map_or(true, |tag| self.dom.tag_name(node) == tag))
            .filter(|node| self.dom.attribute(node, "name").as_deref() == Some(name))
            .collect()
    }
}

/// Built-in rules.
///
/// Every pass walks [`Rule::ALL`] in this order, which is also the order of a
/// field's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Required,
    MaxLength,
    MinLength,
    Pattern,
    Email,
    Matches,
    Custom,
    ConditionalRequired,
    DateInFuture,
}

impl Rule {
    pub const ALL: [Rule; 9] = [
        Rule::Required,
        Rule::MaxLength,
        Rule::MinLength,
        Rule::Pattern,
        Rule::Email,
        Rule::Matches,
        Rule::Custom,
        Rule::ConditionalRequired,
        Rule::DateInFuture,
    ];

    /// Name used in `data-{name}-error` and in element error notifications
    pub fn name(self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MaxLength => "maxlength",
            Rule::MinLength => "minlength",
            Rule::Pattern => "pattern",
            Rule::Email => "email",
            Rule::Matches => "matches",
            Rule::Custom => "custom",
            Rule::ConditionalRequired => "conditionalRequired",
            Rule::DateInFuture => "dateInFuture",
        }
    }

    pub fn from_name(name: &str) -> Option<Rule> {
        Rule::ALL.into_iter().find(|rule| rule.name() == name)
    }

    /// Whether the rule applies to `field`
    pub fn condition<D: Dom>(self, dom: &D, field: &D::Node) -> Result<bool> {
        Ok(match self {
            Rule::Required => required::condition(dom, field),
            Rule::MaxLength => length::max_condition(dom, field),
            Rule::MinLength => length::min_condition(dom, field),
            Rule::Pattern => pattern::condition(dom, field),
            Rule::Email => email::condition(dom, field),
            Rule::Matches => matches::condition(dom, field),
            Rule::Custom => return custom::condition(dom, field),
            Rule::ConditionalRequired => conditional_required::condition(dom, field),
            Rule::DateInFuture => date_in_future::condition(dom, field),
        })
    }

    /// Whether the field currently satisfies the rule
    pub fn test<D: Dom>(self, cx: &RuleContext<'_, D>) -> Result<bool> {
        Ok(match self {
            Rule::Required => required::test(cx),
            Rule::MaxLength => length::max_test(cx),
            Rule::MinLength => length::min_test(cx),
            Rule::Pattern => pattern::test(cx),
            Rule::Email => email::test(cx),
            Rule::Matches => matches::test(cx),
            Rule::Custom => return custom::test(cx),
            Rule::ConditionalRequired => conditional_required::test(cx),
            Rule::DateInFuture => date_in_future::test(cx),
        })
    }

    /// Message template; `{0}` is replaced by [`Rule::default_message_value`]
    pub fn default_message(self) -> &'static str {
        match self {
            Rule::Required | Rule::ConditionalRequired => "This field is required.",
            Rule::MaxLength => "This field must not exceed {0} characters in length.",
            Rule::MinLength => "This field must be at least {0} characters in length.",
            Rule::Pattern => "This field contains a value that isn’t accepted.",
            Rule::Email => "This field must contain a valid email address.",
            Rule::Matches => "This field does not match the {0} field.",
            Rule::Custom => "Custom validation failed.",
            Rule::DateInFuture => "This date must be in the future.",
        }
    }

    pub fn default_message_value<D: Dom>(self, dom: &D, field: &D::Node) -> Option<String> {
        match self {
            Rule::MaxLength => length::max_attribute(dom, field),
            Rule::MinLength => length::min_attribute(dom, field),
            Rule::Matches => matches::target_name(dom, field),
            _ => None,
        }
    }

    /// Sub-elements that must all be touched before the test runs incrementally
    pub fn touched_locators(self) -> Vec<Locator> {
        match self {
            Rule::DateInFuture => date_in_future::touched_locators(),
            _ => Vec::new(),
        }
    }

    /// Message for a failure of this rule on `field`: the field's
    /// `data-{name}-error` attribute, else the filled-in default
    pub fn message<D: Dom>(self, dom: &D, field: &D::Node) -> String {
        let override_attr = format!("data-{}-error", self.name());
        let custom = dom
            .attribute(field, &override_attr)
            .filter(|message| !message.is_empty())
            .or_else(|| match self {
                Rule::Custom => custom::error_attribute(dom, field),
                _ => None,
            });

        if let Some(message) = custom {
            return message;
        }

        let template = self.default_message();
        match self.default_message_value(dom, field) {
            Some(value) => template.replacen("{0}", &value, 1),
            None => template.to_string(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::dom::{MemoryDocument, NodeId};

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 10, 16).unwrap()
    }

    /// Runs `rule` against the element matching `selector`, scoped to the
    /// first form (or the document)
    pub(crate) fn run_with(
        doc: &MemoryDocument,
        selector: &str,
        rule: Rule,
        options: &Options,
        handlers: &HashMap<String, CustomHandler<MemoryDocument>>,
    ) -> Result<bool> {
        let field: NodeId = doc.query(selector).expect("fixture has the field");
        let scope = doc.query("form").unwrap_or_else(|| doc.document_root());
        let cx = RuleContext {
            dom: doc,
            field: &field,
            scope: &scope,
            current: None,
            options,
            handlers,
            today: today(),
        };
        rule.test(&cx)
    }

    pub(crate) fn run(html: &str, selector: &str, rule: Rule) -> bool {
        let doc = MemoryDocument::parse(html);
        run_with(&doc, selector, rule, &Options::default(), &HashMap::new()).unwrap()
    }

    pub(crate) fn applies(html: &str, selector: &str, rule: Rule) -> bool {
        let doc = MemoryDocument::parse(html);
        let field = doc.query(selector).expect("fixture has the field");
        rule.condition(&doc, &field).unwrap()
    }
}
