// File: src/form.rs
// Purpose: Form controller: binds to a form, runs validation passes and wires events

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

use crate::callbacks::{Callback, CallbackRegistry, EventName, Notification};
use crate::constants::BLURRED_ATTR;
use crate::dom::Dom;
use crate::engine::{self, Environment, ValidationContext};
use crate::error::{Error, Result};
use crate::fields;
use crate::messages;
use crate::options::{Options, Trigger};
use crate::rules::{CustomHandler, Rule, RuleContext};

/// The form to bind to
#[derive(Debug, Clone, PartialEq)]
pub enum FormRef<N> {
    Node(N),
    /// `name` (or `id`) of a form in the document
    Name(String),
}

impl<N> From<&str> for FormRef<N> {
    fn from(name: &str) -> Self {
        FormRef::Name(name.to_string())
    }
}

impl<N> From<String> for FormRef<N> {
    fn from(name: String) -> Self {
        FormRef::Name(name)
    }
}

/// Callbacks supplied at construction
pub struct Hooks<N> {
    pub on_success: Option<Callback<N>>,
    pub on_error: Option<Callback<N>>,
    pub on_element_error: Option<Callback<N>>,
}

impl<N> Default for Hooks<N> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_error: None,
            on_element_error: None,
        }
    }
}

/// DOM events the controller listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    KeyDown,
    KeyUp,
    Blur,
}

impl EventKind {
    /// DOM event type
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Submit => "submit",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::Blur => "blur",
        }
    }
}

impl From<Trigger> for EventKind {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Blur => EventKind::Blur,
            Trigger::Keyup => EventKind::KeyUp,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event forwarded by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    /// `KeyboardEvent.key` for key events
    pub key: Option<String>,
}

impl DomEvent {
    pub fn submit() -> Self {
        Self {
            kind: EventKind::Submit,
            key: None,
        }
    }

    pub fn blur() -> Self {
        Self {
            kind: EventKind::Blur,
            key: None,
        }
    }

    pub fn key_down(key: &str) -> Self {
        Self {
            kind: EventKind::KeyDown,
            key: Some(key.to_string()),
        }
    }

    pub fn key_up(key: &str) -> Self {
        Self {
            kind: EventKind::KeyUp,
            key: Some(key.to_string()),
        }
    }
}

/// What a listener does when its event fires
#[derive(Debug, Clone, PartialEq)]
pub enum Action<N> {
    /// Full pass; the default action is prevented when the form is invalid
    Validate,
    /// Full pass when the key is Enter
    ValidateOnEnter,
    /// Pass scoped to one field
    ValidateField {
        current: ValidationContext<N>,
        trigger: Trigger,
    },
    /// Records the first blur of a field in hybrid mode
    MarkBlurred,
}

/// One event subscription recorded at construction
#[derive(Debug, Clone, PartialEq)]
pub struct Listener<N> {
    pub target: N,
    pub kind: EventKind,
    pub action: Action<N>,
}

/// Arguments of a validation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Pass<N> {
    /// Event that started the pass, if any
    pub event: Option<EventKind>,
    /// Field an incremental pass is scoped to
    pub current: Option<ValidationContext<N>>,
    pub trigger: Option<Trigger>,
}

impl<N> Default for Pass<N> {
    fn default() -> Self {
        Self {
            event: None,
            current: None,
            trigger: None,
        }
    }
}

impl<N> Pass<N> {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn from_event(event: EventKind) -> Self {
        Self {
            event: Some(event),
            ..Self::default()
        }
    }

    pub fn incremental(current: ValidationContext<N>, trigger: Trigger) -> Self {
        Self {
            event: None,
            current: Some(current),
            trigger: Some(trigger),
        }
    }
}

/// Validation bound to a single form.
///
/// The controller owns no document: every call receives the [`Dom`] the form
/// lives in.
pub struct FormValidation<D: Dom> {
    form: D::Node,
    fields: Vec<D::Node>,
    options: Options,
    callbacks: CallbackRegistry<D::Node>,
    handlers: HashMap<String, CustomHandler<D>>,
    error_messages: Vec<String>,
    listeners: Vec<Listener<D::Node>>,
    clock: Box<dyn Fn() -> NaiveDate>,
}

impl<D: Dom> FormValidation<D> {
    pub fn new(dom: &mut D, form: impl Into<FormRef<D::Node>>, options: Options) -> Result<Self> {
        Self::with_hooks(dom, form, options, Hooks::default())
    }

    /// Binds to `form`. Conflicting trigger options are rejected before
    /// anything is bound.
    pub fn with_hooks(
        dom: &mut D,
        form: impl Into<FormRef<D::Node>>,
        options: Options,
        hooks: Hooks<D::Node>,
    ) -> Result<Self> {
        options.check()?;

        let form = resolve_form(dom, form.into())?;
        let fields = fields::select_fields(dom, &form);

        let mut validation = Self {
            form,
            fields,
            options,
            callbacks: CallbackRegistry::new(),
            handlers: HashMap::new(),
            error_messages: Vec::new(),
            listeners: Vec::new(),
            clock: Box::new(|| chrono::Local::now().date_naive()),
        };

        if let Some(callback) = hooks.on_success {
            validation.callbacks.on(EventName::Success, callback);
        }
        if let Some(callback) = hooks.on_error {
            validation.callbacks.on(EventName::Error, callback);
        }
        if let Some(callback) = hooks.on_element_error {
            validation.callbacks.on(EventName::ElementError, callback);
        }

        validation.bind(dom);

        if !validation.options.enable_html5_validation {
            dom.set_attribute(&validation.form, "novalidate", "");
        }

        tracing::debug!(
            fields = validation.fields.len(),
            listeners = validation.listeners.len(),
            "form validation bound"
        );

        Ok(validation)
    }

    fn listen(&mut self, target: D::Node, kind: EventKind, action: Action<D::Node>) {
        self.listeners.push(Listener { target, kind, action });
    }

    fn bind(&mut self, dom: &D) {
        for field in self.fields.clone() {
            self.listen(field, EventKind::KeyDown, Action::ValidateOnEnter);
        }

        if let Some(trigger) = self.options.validate_on {
            for field in self.fields.clone() {
                if fields::is_group(dom, &field) {
                    for child in fields::group_children(dom, &field) {
                        let current = ValidationContext::child(field.clone(), child.clone());
                        self.listen(child, trigger.into(), Action::ValidateField { current, trigger });
                    }
                } else {
                    let current = ValidationContext::field(field.clone());
                    self.listen(field, trigger.into(), Action::ValidateField { current, trigger });
                }
            }
        }

        if self.options.hybrid_mode {
            for field in self.fields.clone() {
                let current = ValidationContext::field(field.clone());
                self.listen(
                    field.clone(),
                    EventKind::Blur,
                    Action::ValidateField {
                        current: current.clone(),
                        trigger: Trigger::Blur,
                    },
                );
                self.listen(field.clone(), EventKind::Blur, Action::MarkBlurred);
                self.listen(
                    field,
                    EventKind::KeyUp,
                    Action::ValidateField {
                        current,
                        trigger: Trigger::Keyup,
                    },
                );
            }
        }

        self.listen(self.form.clone(), EventKind::Submit, Action::Validate);
    }

    /// Appends a callback for `event`
    pub fn on(&mut self, event: impl Into<EventName>, callback: impl FnMut(&Notification<'_, D::Node>) + 'static) {
        self.callbacks.on(event, Box::new(callback));
    }

    /// Fires the callbacks registered under `name`; built-in names reach the
    /// same lists as the lifecycle events
    pub fn emit(&mut self, name: &str) {
        self.callbacks.run(&Notification::Custom { name });
    }

    /// Registers the handler fields name in `data-val-custom`, replacing any
    /// earlier handler of the same name
    pub fn add_custom_validation(
        &mut self,
        name: &str,
        handler: impl Fn(&RuleContext<'_, D>) -> bool + 'static,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::MissingHandlerName);
        }

        self.handlers.insert(name.to_string(), Box::new(handler));
        Ok(())
    }

    /// Replaces the source of "today" used by date rules
    pub fn set_clock(&mut self, clock: impl Fn() -> NaiveDate + 'static) {
        self.clock = Box::new(clock);
    }

    /// Full pass over every field
    pub fn is_valid(&mut self, dom: &mut D) -> Result<bool> {
        self.validate(dom, Pass::full())
    }

    /// Pass scoped to `field`, as a blur would run it
    pub fn validate_field(&mut self, dom: &mut D, field: &D::Node) -> Result<bool> {
        self.validate(
            dom,
            Pass {
                current: Some(ValidationContext::field(field.clone())),
                ..Pass::default()
            },
        )
    }

    /// Runs one validation pass and reports whether the form is valid.
    ///
    /// Classes, messages and callbacks are updated as a side effect. Errors are
    /// configuration mistakes, never failed validation.
    pub fn validate(&mut self, dom: &mut D, pass: Pass<D::Node>) -> Result<bool> {
        let mut form_valid = true;
        let mut first_invalid = None;
        self.error_messages.clear();

        let today = (self.clock)();
        let current = pass.current.as_ref();

        for field in self.fields.clone() {
            if let Some(current) = current {
                if current.field != field {
                    continue;
                }
                if dom.value(&field).as_deref() == Some("") && !Rule::Required.condition(&*dom, &field)? {
                    continue;
                }
                if self.options.hybrid_mode
                    && pass.trigger == Some(Trigger::Keyup)
                    && !dom.has_attribute(&field, BLURRED_ATTR)
                {
                    continue;
                }
            }

            let outcome = {
                let env = Environment {
                    scope: &self.form,
                    current,
                    options: &self.options,
                    handlers: &self.handlers,
                    today,
                };
                engine::evaluate(dom, &field, &env)?
            };

            for rule in &outcome.failed {
                self.callbacks.run(&Notification::ElementError { field: &field, rule: *rule });
            }
            self.error_messages.extend(outcome.messages.iter().cloned());

            if !outcome.has_any_rule {
                continue;
            }

            if outcome.valid {
                self.set_success(dom, &field);
            } else {
                form_valid = false;
                if first_invalid.is_none() {
                    first_invalid = Some(field.clone());
                }
                self.set_error(dom, &field);
            }

            if !self.options.group_error_placement.is_enabled() {
                let existing = messages::inline_error_element(&*dom, &field, &self.form);
                match outcome.first_message() {
                    Some(message) if !outcome.valid => {
                        messages::display_inline(dom, existing, message, &field, &self.form)
                    }
                    _ => messages::hide(dom, existing.as_ref()),
                }
            }
        }

        let form = self.form.clone();
        if form_valid {
            self.set_success(dom, &form);
            self.callbacks.run(&Notification::Success);
        } else {
            self.set_error(dom, &form);
            self.callbacks.run(&Notification::Error);
        }

        if self.options.group_error_placement.is_enabled() {
            let existing = messages::grouped_error_element(&*dom, &form);
            if form_valid {
                messages::hide(dom, existing.as_ref());
            } else {
                messages::display_grouped(
                    dom,
                    existing,
                    &self.error_messages,
                    &form,
                    &self.options.group_error_placement,
                );
            }
        }

        if self.options.focus && current.is_none() {
            if let Some(field) = &first_invalid {
                dom.focus(field);
            }
        }

        tracing::debug!(
            valid = form_valid,
            fields = self.fields.len(),
            messages = self.error_messages.len(),
            event = ?pass.event,
            incremental = current.is_some(),
            "validation pass"
        );

        Ok(form_valid)
    }

    /// Routes a DOM event to the listeners recorded for `target` and returns
    /// whether its default action must be prevented
    pub fn dispatch(&mut self, dom: &mut D, target: &D::Node, event: &DomEvent) -> Result<bool> {
        let actions: Vec<Action<D::Node>> = self
            .listeners
            .iter()
            .filter(|listener| &listener.target == target && listener.kind == event.kind)
            .map(|listener| listener.action.clone())
            .collect();

        let mut prevent_default = false;

        for action in actions {
            match action {
                Action::Validate => {
                    prevent_default |= !self.validate(dom, Pass::from_event(event.kind))?;
                }
                Action::ValidateOnEnter => {
                    if event.key.as_deref() == Some("Enter") {
                        prevent_default |= !self.validate(dom, Pass::from_event(event.kind))?;
                    }
                }
                Action::ValidateField { current, trigger } => {
                    self.validate(dom, Pass::incremental(current, trigger))?;
                }
                Action::MarkBlurred => {
                    if !dom.has_attribute(target, BLURRED_ATTR) {
                        dom.set_attribute(target, BLURRED_ATTR, "");
                    }
                }
            }
        }

        Ok(prevent_default)
    }

    fn set_success(&self, dom: &mut D, node: &D::Node) {
        dom.remove_class(node, &self.options.error_class);
        dom.add_class(node, &self.options.success_class);
    }

    fn set_error(&self, dom: &mut D, node: &D::Node) {
        dom.remove_class(node, &self.options.success_class);
        dom.add_class(node, &self.options.error_class);
    }

    /// Event subscriptions the host must forward through [`Self::dispatch`]
    pub fn listeners(&self) -> &[Listener<D::Node>] {
        &self.listeners
    }

    pub fn form(&self) -> &D::Node {
        &self.form
    }

    pub fn fields(&self) -> &[D::Node] {
        &self.fields
    }

    /// Messages of the last pass, in field then rule order
    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn callbacks(&self) -> &CallbackRegistry<D::Node> {
        &self.callbacks
    }

    pub fn has_custom_validation(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl<D: Dom> fmt::Debug for FormValidation<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValidation")
            .field("form", &self.form)
            .field("fields", &self.fields)
            .field("options", &self.options)
            .field("callbacks", &self.callbacks)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("error_messages", &self.error_messages)
            .finish()
    }
}

fn resolve_form<D: Dom>(dom: &D, form: FormRef<D::Node>) -> Result<D::Node> {
    match form {
        FormRef::Name(name) if name.is_empty() => Err(Error::MissingForm),
        FormRef::Name(name) => dom.form_named(&name).ok_or(Error::FormNotFound),
        FormRef::Node(node) if dom.tag_name(&node) == "form" => Ok(node),
        FormRef::Node(_) => Err(Error::FormNotFound),
    }
}
