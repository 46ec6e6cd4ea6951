//! Checkbox field kinds.
//!
//! `checkbox` is deliberately shared between [`CheckboxField`] and
//! [`CheckboxGroupField`]; the registry disambiguates by attribute overlap
//! (an `options` key selects the group).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::fields::{check_default, impl_field_base, Field, FieldCore, SelectOption};

/// Single on/off checkbox; defaults must be booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckboxField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Whether the box starts checked.
    #[serde(default)]
    pub checked: bool,
    /// Value submitted when checked.
    #[serde(default = "default_checkbox_value")]
    pub value: String,
}

fn default_checkbox_value() -> String {
    "on".to_string()
}

impl_field_base!(CheckboxField);

impl CheckboxField {
    /// Creates a checkbox.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, "checkbox"),
            checked: false,
            value: default_checkbox_value(),
        }
    }

    /// Starts the box checked.
    #[must_use]
    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Sets the submitted-when-checked value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        check_default(&self.base, Value::is_boolean, "a boolean")
    }

    /// Validates and wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Checkbox(self))
    }
}

/// Group of checkboxes sharing one name; defaults must be lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckboxGroupField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Declared options, in order.
    pub options: Vec<SelectOption>,
    /// Render the boxes on one line.
    #[serde(default)]
    pub inline: bool,
}

impl_field_base!(CheckboxGroupField);

impl CheckboxGroupField {
    /// Creates a checkbox group with the given options.
    pub fn new(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            base: FieldCore::new(name, "checkbox"),
            options,
            inline: false,
        }
    }

    /// Renders the boxes on one line.
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        check_default(&self.base, Value::is_array, "a list of values")
    }

    /// Validates and wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::CheckboxGroup(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use serde_json::json;

    #[test]
    fn test_checkbox_default_must_be_boolean() {
        let err = CheckboxField::new("agree")
            .default_value("yes")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefaultValue { .. }));

        assert!(CheckboxField::new("agree").default_value(true).build().is_ok());
    }

    #[test]
    fn test_checkbox_value_defaults_to_on() {
        assert_eq!(CheckboxField::new("agree").value, "on");
    }

    #[test]
    fn test_checkbox_group_default_must_be_list() {
        let options = vec![SelectOption::new("r", "Red")];
        let err = CheckboxGroupField::new("colors", options.clone())
            .default_value("r")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefaultValue { .. }));

        assert!(CheckboxGroupField::new("colors", options)
            .default_value(json!(["r"]))
            .build()
            .is_ok());
    }

    #[test]
    fn test_both_kinds_share_the_checkbox_discriminator() {
        let single = CheckboxField::new("a");
        let group = CheckboxGroupField::new("b", vec![]);
        assert_eq!(single.base.field_kind, "checkbox");
        assert_eq!(group.base.field_kind, "checkbox");
    }
}
