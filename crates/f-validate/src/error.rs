// File: src/error.rs
// Purpose: Configuration errors raised by the engine

use thiserror::Error;

/// Result alias for fallible engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Integration mistakes surfaced to the developer.
///
/// A field or form failing validation is never an `Error`; that is reported
/// through classes, messages and callbacks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("f-validate: expected form name or form node parameter")]
    MissingForm,

    #[error("f-validate: form not found")]
    FormNotFound,

    #[error("f-validate: hybridMode cannot be used with the validateOn option")]
    HybridWithValidateOn,

    #[error("f-validate: hybridMode cannot be used if errors are grouped")]
    HybridWithGroupedErrors,

    #[error("f-validate: validation on 'blur' or 'keyup' cannot be performed if errors are grouped")]
    ValidateOnWithGroupedErrors,

    #[error("f-validate: valid options for the 'validateOn' property are 'blur' or 'keyup', got '{0}'")]
    InvalidValidateOn(String),

    #[error("f-validate: please provide the name")]
    MissingHandlerName,

    #[error("f-validate: please provide a custom method")]
    MissingHandler,

    #[error("f-validate: {event} callback must be a function")]
    CallbackNotCallable { event: String },

    #[error("f-validate: specify data-val-custom along with data-val-custom-error attribute")]
    CustomErrorWithoutCustom,

    #[error("f-validate: no custom validation registered under '{0}'")]
    UnregisteredCustomHandler(String),

    #[error("f-validate: customEmailRegex is not a valid pattern: {0}")]
    InvalidEmailRegex(String),

    #[error("f-validate: invalid options: {0}")]
    Options(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = Error::CallbackNotCallable {
            event: "success".to_string(),
        };
        assert_eq!(err.to_string(), "f-validate: success callback must be a function");

        assert_eq!(
            Error::CustomErrorWithoutCustom.to_string(),
            "f-validate: specify data-val-custom along with data-val-custom-error attribute"
        );
        assert!(Error::InvalidValidateOn("focus".into())
            .to_string()
            .contains("'focus'"));
    }
}
