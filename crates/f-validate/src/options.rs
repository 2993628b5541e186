// File: src/options.rs
// Purpose: Validation options, their defaults, and loading from TOML/JSON

use anyhow::Context;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::constants;
use crate::error::{Error, Result};

/// Options for a [`crate::FormValidation`].
///
/// Keys are camelCase so the same document works from TOML, JSON and
/// JavaScript:
///
/// ```toml
/// errorClass = "is-invalid"
/// groupErrorPlacement = "bottom"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Class applied to invalid fields and to an invalid form
    pub error_class: String,

    /// Class applied to valid fields and to a valid form
    pub success_class: String,

    /// Focus the first invalid field after a full pass
    pub focus: bool,

    /// Render every message in one list instead of next to each field
    pub group_error_placement: GroupErrorPlacement,

    /// Validate single fields on this event
    pub validate_on: Option<Trigger>,

    /// Validate on blur, then on keyup once the field has been blurred
    pub hybrid_mode: bool,

    /// Keep the browser's own constraint validation UI
    #[serde(rename = "enableHTML5Validation")]
    pub enable_html5_validation: bool,

    /// Replaces the built-in email pattern
    #[serde(
        serialize_with = "serialize_regex",
        deserialize_with = "deserialize_regex"
    )]
    pub custom_email_regex: Option<Regex>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            error_class: constants::HAS_ERROR.to_string(),
            success_class: constants::HAS_SUCCESS.to_string(),
            focus: false,
            group_error_placement: GroupErrorPlacement::Disabled,
            validate_on: None,
            hybrid_mode: false,
            enable_html5_validation: false,
            custom_email_regex: None,
        }
    }
}

impl Options {
    /// Load options from a TOML file.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let options = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse options file: {:?}", path))?;

        Ok(options)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::Options(e.message().to_string()))
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| Error::Options(e.to_string()))
    }

    /// Compiles a replacement email pattern. Hosts holding a native pattern
    /// object pass its source and case-insensitivity flag.
    pub fn email_regex(source: &str, case_insensitive: bool) -> Result<Regex> {
        RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| Error::InvalidEmailRegex(e.to_string()))
    }

    /// Rejects trigger combinations that cannot work together
    pub fn check(&self) -> Result<()> {
        let grouped = self.group_error_placement.is_enabled();

        if grouped && self.validate_on.is_some() {
            return Err(Error::ValidateOnWithGroupedErrors);
        }

        if self.hybrid_mode && grouped {
            return Err(Error::HybridWithGroupedErrors);
        }

        if self.hybrid_mode && self.validate_on.is_some() {
            return Err(Error::HybridWithValidateOn);
        }

        Ok(())
    }
}

/// Where grouped messages go
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupErrorPlacement {
    /// Messages are rendered inline
    #[default]
    Disabled,
    /// Start of the form
    Top,
    /// End of the form
    Bottom,
    /// Immediately before the first element matching this locator, falling
    /// back to the start of the form
    Locator(String),
}

impl GroupErrorPlacement {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, GroupErrorPlacement::Disabled)
    }
}

impl From<&str> for GroupErrorPlacement {
    fn from(value: &str) -> Self {
        match value {
            "" => GroupErrorPlacement::Disabled,
            "top" => GroupErrorPlacement::Top,
            "bottom" => GroupErrorPlacement::Bottom,
            locator => GroupErrorPlacement::Locator(locator.to_string()),
        }
    }
}

impl Serialize for GroupErrorPlacement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            GroupErrorPlacement::Disabled => serializer.serialize_bool(false),
            GroupErrorPlacement::Top => serializer.serialize_str("top"),
            GroupErrorPlacement::Bottom => serializer.serialize_str("bottom"),
            GroupErrorPlacement::Locator(locator) => serializer.serialize_str(locator),
        }
    }
}

impl<'de> Deserialize<'de> for GroupErrorPlacement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => GroupErrorPlacement::Disabled,
            Raw::Flag(true) => GroupErrorPlacement::Top,
            Raw::Text(text) => GroupErrorPlacement::from(text.as_str()),
        })
    }
}

/// Event that triggers single-field validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Trigger {
    Blur,
    Keyup,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Blur => "blur",
            Trigger::Keyup => "keyup",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trigger {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "blur" => Ok(Trigger::Blur),
            "keyup" => Ok(Trigger::Keyup),
            other => Err(Error::InvalidValidateOn(other.to_string())),
        }
    }
}

impl TryFrom<String> for Trigger {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

fn serialize_regex<S: Serializer>(
    regex: &Option<Regex>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match regex {
        Some(regex) => serializer.serialize_some(regex.as_str()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_regex<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Regex>, D::Error> {
    let source: Option<String> = Option::deserialize(deserializer)?;

    source
        .filter(|source| !source.is_empty())
        .map(|source| Options::email_regex(&source, false).map_err(serde::de::Error::custom))
        .transpose()
}
