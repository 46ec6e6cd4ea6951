//! Option-bearing field kinds: select and radio.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::fields::{check_default, impl_field_base, Field, FieldCore, SelectOption};

/// Dropdown select, single or multiple.
///
/// `min_selected`/`max_selected` are construction-time invariants only; the
/// data-validation paths do not enforce selection counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Declared options, in order.
    pub options: Vec<SelectOption>,
    /// Whether several options may be selected.
    #[serde(default)]
    pub multiple: bool,
    /// Minimum selections; only meaningful with `multiple`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_selected: Option<i64>,
    /// Maximum selections; only meaningful with `multiple`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selected: Option<i64>,
}

impl_field_base!(SelectField);

impl SelectField {
    /// Creates a single-valued select with the given options.
    pub fn new(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            base: FieldCore::new(name, "select"),
            options,
            multiple: false,
            min_selected: None,
            max_selected: None,
        }
    }

    /// Allows multiple selections.
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Sets the minimum number of selections.
    #[must_use]
    pub fn min_selected(mut self, min: i64) -> Self {
        self.min_selected = Some(min);
        self
    }

    /// Sets the maximum number of selections.
    #[must_use]
    pub fn max_selected(mut self, max: i64) -> Self {
        self.max_selected = Some(max);
        self
    }

    /// Returns the set of acceptable submitted values.
    pub fn valid_values(&self) -> BTreeSet<&str> {
        self.options.iter().map(|option| option.value.as_str()).collect()
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        if let Some(min) = self.min_selected {
            if min < 0 {
                return Err(SchemaError::NegativeMinSelected);
            }
            if !self.multiple {
                return Err(SchemaError::MinSelectedRequiresMultiple);
            }
        }
        if let Some(max) = self.max_selected {
            if max < 1 {
                return Err(SchemaError::MaxSelectedTooSmall);
            }
            if !self.multiple {
                return Err(SchemaError::MaxSelectedRequiresMultiple);
            }
            if let Some(min) = self.min_selected {
                if max < min {
                    return Err(SchemaError::MaxSelectedBelowMin);
                }
            }
        }
        Ok(())
    }

    /// Validates and wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Select(self))
    }
}

/// Radio button group; defaults must be strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Declared options, in order.
    pub options: Vec<SelectOption>,
    /// Render the buttons on one line.
    #[serde(default)]
    pub inline: bool,
}

impl_field_base!(RadioField);

impl RadioField {
    /// Creates a radio group with the given options.
    pub fn new(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            base: FieldCore::new(name, "radio"),
            options,
            inline: false,
        }
    }

    /// Renders the buttons on one line.
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        check_default(&self.base, Value::is_string, "a string")
    }

    /// Validates and wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Radio(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new("a", "A"),
            SelectOption::new("b", "B"),
        ]
    }

    #[test]
    fn test_selected_bounds_require_multiple() {
        let err = SelectField::new("s", options()).min_selected(1).build().unwrap_err();
        assert!(matches!(err, SchemaError::MinSelectedRequiresMultiple));

        let err = SelectField::new("s", options()).max_selected(2).build().unwrap_err();
        assert!(matches!(err, SchemaError::MaxSelectedRequiresMultiple));
    }

    #[test]
    fn test_selected_bounds_consistency() {
        let err = SelectField::new("s", options())
            .multiple()
            .min_selected(-1)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::NegativeMinSelected));

        let err = SelectField::new("s", options())
            .multiple()
            .max_selected(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::MaxSelectedTooSmall));

        let err = SelectField::new("s", options())
            .multiple()
            .min_selected(3)
            .max_selected(2)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::MaxSelectedBelowMin));

        assert!(SelectField::new("s", options())
            .multiple()
            .min_selected(1)
            .max_selected(2)
            .build()
            .is_ok());
    }

    #[test]
    fn test_valid_values() {
        let field = SelectField::new("s", options());
        assert!(field.valid_values().contains("a"));
        assert!(!field.valid_values().contains("z"));
    }

    #[test]
    fn test_radio_default_must_be_string() {
        let err = RadioField::new("r", options())
            .default_value(5)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefaultValue { .. }));

        assert!(RadioField::new("r", options())
            .default_value("a")
            .build()
            .is_ok());
    }
}
