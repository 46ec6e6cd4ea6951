//! Hidden, file and list field kinds.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::fields::{impl_field_base, Field, FieldCore};

/// Hidden input carrying a scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// The carried value; string, number or boolean.
    #[serde(default = "default_hidden_value")]
    pub value: Value,
}

fn default_hidden_value() -> Value {
    Value::String(String::new())
}

impl_field_base!(HiddenField);

impl HiddenField {
    /// Creates a hidden field.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            base: FieldCore::new(name, "hidden"),
            value: value.into(),
        }
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        if !matches!(
            self.value,
            Value::String(_) | Value::Number(_) | Value::Bool(_)
        ) {
            return Err(SchemaError::InvalidHiddenValue(self.base.name.clone()));
        }
        Ok(())
    }

    /// Validates and wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::Hidden(self))
    }
}

/// File upload input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Accepted MIME types / extensions, as for the HTML attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    /// Whether several files may be uploaded.
    #[serde(default)]
    pub multiple: bool,
}

impl_field_base!(FileField);

impl FileField {
    /// Creates a file field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, "file"),
            accept: None,
            multiple: false,
        }
    }

    /// Restricts the accepted file types.
    #[must_use]
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Allows several files.
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::File(self))
    }
}

/// Repeated-item input (e.g. a list of participants).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Minimum number of items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Maximum number of items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// Item kind tag; used by exporters only.
    #[serde(rename = "item_type", default = "default_item_kind")]
    pub item_kind: String,
}

fn default_item_kind() -> String {
    "text".to_string()
}

impl_field_base!(ListField);

impl ListField {
    /// Creates a list field with text items.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, "list"),
            min_items: None,
            max_items: None,
            item_kind: default_item_kind(),
        }
    }

    /// Sets the minimum number of items.
    #[must_use]
    pub fn min_items(mut self, min: u64) -> Self {
        self.min_items = Some(min);
        self
    }

    /// Sets the maximum number of items.
    #[must_use]
    pub fn max_items(mut self, max: u64) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Sets the item kind tag.
    #[must_use]
    pub fn item_kind(mut self, kind: impl Into<String>) -> Self {
        self.item_kind = kind.into();
        self
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Wraps into the field union.
    pub fn build(self) -> Result<Field> {
        self.validate()?;
        Ok(Field::List(self))
    }
}
