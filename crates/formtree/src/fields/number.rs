//! Numeric and date field kinds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fields::{impl_field_base, Field, FieldCore};

/// Numeric input with optional bounds and step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Lowest accepted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Highest accepted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Increment granularity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl_field_base!(NumberField);

impl NumberField {
    /// Creates a number field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, "number"),
            min_value: None,
            max_value: None,
            step: None,
        }
    }

    /// Sets the lowest accepted value.
    #[must_use]
    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Sets the highest accepted value.
    #[must_use]
    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Sets the increment granularity.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Number(self))
    }
}

/// Date input.
///
/// The bounds are typed metadata for exporters; the validation engine
/// passes date values through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Earliest accepted date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
    /// Latest accepted date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<NaiveDate>,
}

impl_field_base!(DateField);

impl DateField {
    /// Creates a date field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, "date"),
            min_date: None,
            max_date: None,
        }
    }

    /// Sets the earliest accepted date.
    #[must_use]
    pub fn min_date(mut self, min: NaiveDate) -> Self {
        self.min_date = Some(min);
        self
    }

    /// Sets the latest accepted date.
    #[must_use]
    pub fn max_date(mut self, max: NaiveDate) -> Self {
        self.max_date = Some(max);
        self
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Date(self))
    }
}
