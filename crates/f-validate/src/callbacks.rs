// File: src/callbacks.rs
// Purpose: Lifecycle callbacks keyed by event name

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::rules::Rule;

/// Event a callback is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventName {
    /// A full pass found the form valid
    Success,
    /// A pass found the form invalid
    Error,
    /// A rule failed on a field
    ElementError,
    /// Anything else, fired with [`crate::FormValidation::emit`]
    Custom(String),
}

impl EventName {
    pub fn as_str(&self) -> &str {
        match self {
            EventName::Success => "success",
            EventName::Error => "error",
            EventName::ElementError => "elementError",
            EventName::Custom(name) => name,
        }
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        match name {
            "success" => EventName::Success,
            "error" => EventName::Error,
            "elementError" => EventName::ElementError,
            other => EventName::Custom(other.to_string()),
        }
    }
}

impl FromStr for EventName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EventName::from(s))
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a callback is told about the event that fired it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification<'a, N> {
    Success,
    Error,
    ElementError { field: &'a N, rule: Rule },
    Custom { name: &'a str },
}

impl<N> Notification<'_, N> {
    pub fn event(&self) -> EventName {
        match self {
            Notification::Success => EventName::Success,
            Notification::Error => EventName::Error,
            Notification::ElementError { .. } => EventName::ElementError,
            Notification::Custom { name } => EventName::from(*name),
        }
    }
}

pub type Callback<N> = Box<dyn FnMut(&Notification<'_, N>)>;

/// Ordered callback lists per event
pub struct CallbackRegistry<N> {
    callbacks: HashMap<EventName, Vec<Callback<N>>>,
}

impl<N> Default for CallbackRegistry<N> {
    fn default() -> Self {
        Self {
            callbacks: HashMap::new(),
        }
    }
}

impl<N> CallbackRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `callback` to the list for `event`
    pub fn on(&mut self, event: impl Into<EventName>, callback: Callback<N>) {
        self.callbacks.entry(event.into()).or_default().push(callback);
    }

    /// Runs every callback registered for the notification's event, in
    /// registration order
    pub fn run(&mut self, notification: &Notification<'_, N>) {
        if let Some(callbacks) = self.callbacks.get_mut(&notification.event()) {
            for callback in callbacks.iter_mut() {
                callback(notification);
            }
        }
    }

    pub fn count(&self, event: &EventName) -> usize {
        self.callbacks.get(event).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.values().all(Vec::is_empty)
    }
}

impl<N> fmt::Debug for CallbackRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .callbacks
            .iter()
            .map(|(event, list)| (event.as_str(), list.len()))
            .collect();
        f.debug_struct("CallbackRegistry").field("callbacks", &counts).finish()
    }
}
