//! # f-validate
//!
//! Attribute-driven form validation. A [`FormValidation`] is bound to one form,
//! discovers its fields once, and on every trigger (submit, Enter, blur, keyup or
//! an explicit call) evaluates the built-in [`Rule`]s against them:
//!
//! - `required` / `data-val-required`
//! - `maxlength` / `data-val-maxlength`, `minlength` / `data-val-minlength`
//! - `pattern` / `data-val-regex`
//! - `type="email"`
//! - `data-val-equalto`, `data-val-custom`, `data-val-conditionalRequired`
//! - `data-val-dateInFuture` on a `data-val-group` container
//!
//! Results are reflected as success/error classes on fields and on the form, as
//! inline or grouped messages, and through lifecycle callbacks.
//!
//! The engine never touches a global document: every operation receives a
//! [`Dom`] implementation. [`MemoryDocument`] ships with the crate; the
//! `f-validate-wasm` crate provides the browser one.
//!
//! ## Example
//!
//! ```
//! use f_validate::{FormValidation, MemoryDocument, Options};
//!
//! let mut doc = MemoryDocument::parse(r#"<form name="signup"><input name="email" required></form>"#);
//! let mut validation = FormValidation::new(&mut doc, "signup", Options::default()).unwrap();
//!
//! assert_eq!(validation.is_valid(&mut doc), Ok(false));
//! assert_eq!(validation.error_messages(), ["This field is required."]);
//! ```

pub mod callbacks;
pub mod constants;
pub mod dom;
pub mod engine;
pub mod error;
pub mod fields;
pub mod form;
pub mod messages;
pub mod options;
pub mod rules;
pub mod touch;

pub use callbacks::{Callback, CallbackRegistry, EventName, Notification};
pub use dom::{Dom, Element, Locator, MemoryDocument, NodeId};
pub use engine::{FieldOutcome, ValidationContext};
pub use error::{Error, Result};
pub use form::{Action, DomEvent, EventKind, FormRef, FormValidation, Hooks, Listener, Pass};
pub use options::{GroupErrorPlacement, Options, Trigger};
pub use rules::{CustomHandler, Rule, RuleContext};
