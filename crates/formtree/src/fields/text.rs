//! Text-shaped field kinds: text, textarea, email, url.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::fields::{check_default, impl_field_base, Field, FieldCore};
use crate::i18n::Messages;

/// Matches `local@domain.tld`-shaped addresses, anchored at the start.
pub(crate) fn email_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("email shape pattern compiles"))
}

/// Single-line text input with optional length and pattern constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Minimum accepted length, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minlength: Option<u64>,
    /// Maximum accepted length, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<u64>,
    /// Regex the value must match; must compile at construction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl_field_base!(TextField);

impl TextField {
    /// Creates a text field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, "text"),
            minlength: None,
            maxlength: None,
            pattern: None,
        }
    }

    /// Sets the minimum length.
    #[must_use]
    pub fn minlength(mut self, min: u64) -> Self {
        self.minlength = Some(min);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn maxlength(mut self, max: u64) -> Self {
        self.maxlength = Some(max);
        self
    }

    /// Sets the pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        if let Some(pattern) = &self.pattern {
            Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                field: self.base.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Validates and wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Text(self))
    }

    /// Validates a submitted value against this field's own constraints.
    ///
    /// This is the only place the `pattern` constraint is enforced; the
    /// engine's shared primitive checks lengths only.
    pub fn validate_value(&self, value: Option<&str>, messages: &Messages) -> (bool, Option<String>) {
        let Some(value) = value else {
            if self.base.required {
                return (false, Some(messages.translate("field.required", &[])));
            }
            return (true, None);
        };

        let length = value.chars().count() as u64;
        if let Some(min) = self.minlength {
            if length < min {
                return (
                    false,
                    Some(messages.translate("text.minlength", &[("min", min.to_string())])),
                );
            }
        }
        if let Some(max) = self.maxlength {
            if length > max {
                return (
                    false,
                    Some(messages.translate("text.maxlength", &[("max", max.to_string())])),
                );
            }
        }
        if let Some(pattern) = &self.pattern {
            let anchored = format!("^(?:{pattern})");
            let matched = Regex::new(&anchored)
                .map(|re| re.is_match(value))
                .unwrap_or(false);
            if !matched {
                return (
                    false,
                    Some(messages.translate("text.pattern_mismatch", &[])),
                );
            }
        }
        (true, None)
    }
}

/// Multi-line text input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextareaField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Minimum accepted length, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minlength: Option<u64>,
    /// Maximum accepted length, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<u64>,
    /// Visible rows.
    #[serde(default = "default_rows", skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,
    /// Visible columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u64>,
}

fn default_rows() -> Option<u64> {
    Some(3)
}

impl_field_base!(TextareaField);

impl TextareaField {
    /// Creates a textarea field with the default three rows.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, "textarea"),
            minlength: None,
            maxlength: None,
            rows: default_rows(),
            cols: None,
        }
    }

    /// Sets the minimum length.
    #[must_use]
    pub fn minlength(mut self, min: u64) -> Self {
        self.minlength = Some(min);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn maxlength(mut self, max: u64) -> Self {
        self.maxlength = Some(max);
        self
    }

    /// Sets the visible rows.
    #[must_use]
    pub fn rows(mut self, rows: u64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Sets the visible columns.
    #[must_use]
    pub fn cols(mut self, cols: u64) -> Self {
        self.cols = Some(cols);
        self
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Textarea(self))
    }
}

/// Email input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
}

impl_field_base!(EmailField);

impl EmailField {
    /// Creates an email field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, "email"),
        }
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        check_default(
            &self.base,
            |v| v.as_str().is_some_and(|s| strict_email().is_match(s)),
            "a valid email address",
        )
    }

    /// Validates and wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Email(self))
    }
}

fn strict_email() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email default pattern compiles")
    })
}

/// URL input; defaults must carry an http(s) scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Minimum accepted length, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minlength: Option<u64>,
    /// Maximum accepted length, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<u64>,
}

impl_field_base!(UrlField);

impl UrlField {
    /// Creates a URL field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, "url"),
            minlength: None,
            maxlength: None,
        }
    }

    /// Sets the minimum length.
    #[must_use]
    pub fn minlength(mut self, min: u64) -> Self {
        self.minlength = Some(min);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn maxlength(mut self, max: u64) -> Self {
        self.maxlength = Some(max);
        self
    }

    /// Checks the construction-time invariants.
    ///
    /// Only string defaults are inspected; non-string defaults pass
    /// untouched.
    pub fn validate(&self) -> Result<()> {
        match &self.base.default_value {
            Some(value) => match value.as_str() {
                Some(s) if !s.starts_with("http://") && !s.starts_with("https://") => {
                    Err(SchemaError::InvalidDefaultValue {
                        field: self.base.name.clone(),
                        expected: "a URL starting with http:// or https://",
                    })
                }
                _ => Ok(()),
            },
            None => Ok(()),
        }
    }

    /// Validates and wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Url(self))
    }
}
