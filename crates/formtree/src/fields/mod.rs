//! Field definitions: the typed content-tree leaves.
//!
//! Every concrete field embeds a flattened [`FieldCore`] (the shared
//! attribute block) and serializes flat, carrying its discriminator under
//! the `field_type` key. [`Field`] is the closed union the rest of the crate
//! works with; kinds registered at runtime resolve into [`CustomField`],
//! which keeps their extension attributes intact for lossless round-trips.

mod checkbox;
mod hidden;
mod number;
mod select;
mod text;

pub(crate) use text::email_shape;

pub use checkbox::{CheckboxField, CheckboxGroupField};
pub use hidden::{FileField, HiddenField, ListField};
pub use number::{DateField, NumberField};
pub use select::{RadioField, SelectField};
pub use text::{EmailField, TextField, TextareaField, UrlField};

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Result, SchemaError};

/// Attribute names shared by every field kind, mirrored into each
/// descriptor's declared-attribute set by the registry.
pub(crate) const BASE_ATTRIBUTE_NAMES: &[&str] = &[
    "id",
    "name",
    "label",
    "field_type",
    "required",
    "placeholder",
    "default_value",
    "help_text",
    "validation_rules",
    "css_classes",
    "readonly",
    "attributes",
    "visible_when",
    "dependent_options",
];

/// A single option of a select, radio or checkbox-group field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Human-readable label.
    pub label: String,
    /// Whether the option is pre-selected.
    #[serde(default)]
    pub selected: bool,
}

impl SelectOption {
    /// Creates an unselected option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected: false,
        }
    }

    /// Marks the option as pre-selected.
    #[must_use]
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// Declarative constraint metadata attached to a field.
///
/// The server-side validation engine never interprets these; each field kind
/// hardcodes its own checks. They exist for the client-side code generator
/// and other exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Constraint kind tag (`min`, `max`, `regex`, `minlength`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Constraint payload.
    pub value: Value,
    /// Message shown when the constraint fails client-side.
    pub message: String,
}

impl ValidationRule {
    /// Creates a validation rule.
    pub fn new(kind: impl Into<String>, value: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

/// Comparison operator of a [`VisibilityRule`].
///
/// Unrecognized operators deserialize into [`VisibilityOperator::Other`] and
/// evaluate as permissive no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityOperator {
    /// Visible iff the target value equals the rule value.
    Equals,
    /// Visible iff the target value differs from the rule value.
    NotEquals,
    /// Visible iff the target value is a member of the rule value list.
    In,
    /// Visible iff the target value is not a member of the rule value list.
    NotIn,
    /// Visible iff the target value is greater than the rule value.
    Gt,
    /// Visible iff the target value is less than the rule value.
    Lt,
    /// Visible iff the target value is null, empty string or empty list.
    IsEmpty,
    /// Visible iff the target value is none of null, empty string, empty list.
    IsNotEmpty,
    /// Forward-compatibility escape hatch; never affects visibility.
    #[serde(untagged)]
    Other(String),
}

impl Default for VisibilityOperator {
    fn default() -> Self {
        Self::Equals
    }
}

/// A declarative condition making a field's presence depend on another
/// field's submitted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityRule {
    /// Name of the field the condition reads.
    pub field: String,
    /// Comparison operator.
    #[serde(default)]
    pub operator: VisibilityOperator,
    /// Comparison value.
    #[serde(default)]
    pub value: Value,
}

impl VisibilityRule {
    /// Creates a visibility rule.
    pub fn new(
        field: impl Into<String>,
        operator: VisibilityOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Shorthand for an `equals` rule.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, VisibilityOperator::Equals, value)
    }

    /// Shorthand for an `is_not_empty` rule.
    pub fn is_not_empty(field: impl Into<String>) -> Self {
        Self::new(field, VisibilityOperator::IsNotEmpty, Value::Null)
    }
}

/// Options that swap depending on another field's value.
///
/// Pure metadata: consumed by renderers, never enforced server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependentOptionsConfig {
    /// Name of the parent field.
    pub depends_on: String,
    /// Parent value to available options.
    pub options_map: BTreeMap<String, Vec<SelectOption>>,
}

/// The attribute block shared by every field kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCore {
    /// Generated at construction.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Unique within the enclosing scope.
    pub name: String,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Discriminator string identifying the concrete kind.
    #[serde(rename = "field_type")]
    pub field_kind: String,
    /// Whether a value must be present.
    #[serde(default)]
    pub required: bool,
    /// Placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Value substituted when the submitted value is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Help text rendered next to the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Constraint metadata for exporters; ignored by the engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_rules: Vec<ValidationRule>,
    /// Extra CSS classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_classes: Option<String>,
    /// Whether the rendered control is read-only.
    #[serde(default)]
    pub readonly: bool,
    /// Arbitrary HTML attributes; values coerced to strings on input.
    #[serde(
        default,
        deserialize_with = "coerce_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub attributes: BTreeMap<String, String>,
    /// Conjunction of conditions gating the field's visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Vec<VisibilityRule>>,
    /// Dependent-options metadata for renderers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_options: Option<DependentOptionsConfig>,
}

impl FieldCore {
    /// Creates a core block with a fresh id and the given discriminator.
    pub fn new(name: impl Into<String>, field_kind: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            label: None,
            field_kind: field_kind.into(),
            required: false,
            placeholder: None,
            default_value: None,
            help_text: None,
            validation_rules: Vec::new(),
            css_classes: None,
            readonly: false,
            attributes: BTreeMap::new(),
            visible_when: None,
            dependent_options: None,
        }
    }
}

/// Coerces attribute values of any JSON type to strings, so inputs like
/// `{"data-flags": 1}` survive.
pub(crate) fn coerce_string_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Value> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key, stringify_attribute(&value)))
        .collect())
}

pub(crate) fn stringify_attribute(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Generates the builder methods shared by every field kind.
macro_rules! impl_field_base {
    ($ty:ident) => {
        impl $ty {
            /// Returns the shared attribute block.
            pub fn base(&self) -> &$crate::fields::FieldCore {
                &self.base
            }

            /// Sets the label.
            #[must_use]
            pub fn label(mut self, label: impl Into<String>) -> Self {
                self.base.label = Some(label.into());
                self
            }

            /// Marks the field as required.
            #[must_use]
            pub fn required(mut self) -> Self {
                self.base.required = true;
                self
            }

            /// Sets the placeholder text.
            #[must_use]
            pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
                self.base.placeholder = Some(placeholder.into());
                self
            }

            /// Sets the default value.
            #[must_use]
            pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
                self.base.default_value = Some(value.into());
                self
            }

            /// Sets the help text.
            #[must_use]
            pub fn help_text(mut self, text: impl Into<String>) -> Self {
                self.base.help_text = Some(text.into());
                self
            }

            /// Appends a client-side validation rule.
            #[must_use]
            pub fn validation_rule(mut self, rule: $crate::fields::ValidationRule) -> Self {
                self.base.validation_rules.push(rule);
                self
            }

            /// Sets extra CSS classes.
            #[must_use]
            pub fn css_classes(mut self, classes: impl Into<String>) -> Self {
                self.base.css_classes = Some(classes.into());
                self
            }

            /// Marks the rendered control as read-only.
            #[must_use]
            pub fn readonly(mut self) -> Self {
                self.base.readonly = true;
                self
            }

            /// Sets an arbitrary HTML attribute.
            #[must_use]
            pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.base.attributes.insert(key.into(), value.into());
                self
            }

            /// Appends a visibility rule (conjunction with any existing ones).
            #[must_use]
            pub fn visible_when(mut self, rule: $crate::fields::VisibilityRule) -> Self {
                self.base.visible_when.get_or_insert_with(Vec::new).push(rule);
                self
            }

            /// Sets the dependent-options metadata.
            #[must_use]
            pub fn dependent_options(
                mut self,
                config: $crate::fields::DependentOptionsConfig,
            ) -> Self {
                self.base.dependent_options = Some(config);
                self
            }
        }
    };
}

pub(crate) use impl_field_base;

/// A field kind registered at runtime.
///
/// Keeps every attribute the built-in core does not know about in `extra`,
/// so custom payloads round-trip losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    /// Shared attribute block.
    #[serde(flatten)]
    pub base: FieldCore,
    /// Extension attributes declared by the registered kind.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_field_base!(CustomField);

impl CustomField {
    /// Creates a custom field with the given discriminator.
    pub fn new(name: impl Into<String>, field_kind: impl Into<String>) -> Self {
        Self {
            base: FieldCore::new(name, field_kind),
            extra: Map::new(),
        }
    }

    /// Sets an extension attribute.
    #[must_use]
    pub fn extra_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Wraps into the field union.
    pub fn build(self) -> Result<Field> {
        Ok(Field::Custom(self))
    }
}

/// The closed union of field kinds the content tree carries.
///
/// Untyped input never crosses the resolver boundary: raw JSON objects are
/// turned into exactly one of these variants by the field type registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    /// Single-line text input.
    Text(TextField),
    /// Email input.
    Email(EmailField),
    /// Numeric input.
    Number(NumberField),
    /// Date input.
    Date(DateField),
    /// Dropdown select.
    Select(SelectField),
    /// Radio button group.
    Radio(RadioField),
    /// Single checkbox.
    Checkbox(CheckboxField),
    /// Checkbox group.
    CheckboxGroup(CheckboxGroupField),
    /// File upload.
    File(FileField),
    /// Hidden input.
    Hidden(HiddenField),
    /// URL input.
    Url(UrlField),
    /// Multi-line text input.
    Textarea(TextareaField),
    /// Repeated-item input.
    List(ListField),
    /// Runtime-registered kind.
    Custom(CustomField),
}

impl Field {
    /// Returns the shared attribute block.
    pub fn core(&self) -> &FieldCore {
        match self {
            Self::Text(f) => &f.base,
            Self::Email(f) => &f.base,
            Self::Number(f) => &f.base,
            Self::Date(f) => &f.base,
            Self::Select(f) => &f.base,
            Self::Radio(f) => &f.base,
            Self::Checkbox(f) => &f.base,
            Self::CheckboxGroup(f) => &f.base,
            Self::File(f) => &f.base,
            Self::Hidden(f) => &f.base,
            Self::Url(f) => &f.base,
            Self::Textarea(f) => &f.base,
            Self::List(f) => &f.base,
            Self::Custom(f) => &f.base,
        }
    }

    /// Returns the shared attribute block mutably.
    pub fn core_mut(&mut self) -> &mut FieldCore {
        match self {
            Self::Text(f) => &mut f.base,
            Self::Email(f) => &mut f.base,
            Self::Number(f) => &mut f.base,
            Self::Date(f) => &mut f.base,
            Self::Select(f) => &mut f.base,
            Self::Radio(f) => &mut f.base,
            Self::Checkbox(f) => &mut f.base,
            Self::CheckboxGroup(f) => &mut f.base,
            Self::File(f) => &mut f.base,
            Self::Hidden(f) => &mut f.base,
            Self::Url(f) => &mut f.base,
            Self::Textarea(f) => &mut f.base,
            Self::List(f) => &mut f.base,
            Self::Custom(f) => &mut f.base,
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.core().name
    }

    /// Returns the discriminator as a plain string.
    pub fn field_kind(&self) -> &str {
        &self.core().field_kind
    }

    /// Returns the declared options for option-bearing kinds.
    pub fn options(&self) -> Option<&[SelectOption]> {
        match self {
            Self::Select(f) => Some(&f.options),
            Self::Radio(f) => Some(&f.options),
            Self::CheckboxGroup(f) => Some(&f.options),
            _ => None,
        }
    }

    /// Serializes to the flat wire representation.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match crate::registry::resolve_content_item(&value).map_err(serde::de::Error::custom)? {
            crate::content::ContentItem::Field(field) => Ok(field),
            crate::content::ContentItem::Group(_) | crate::content::ContentItem::Step(_) => Err(
                serde::de::Error::custom("expected a field, found a group or step"),
            ),
        }
    }
}

/// Validates that a default value is present only with an accepted shape.
pub(crate) fn check_default(
    field: &FieldCore,
    accepts: fn(&Value) -> bool,
    expected: &'static str,
) -> Result<()> {
    match &field.default_value {
        Some(value) if !accepts(value) => Err(SchemaError::InvalidDefaultValue {
            field: field.name.clone(),
            expected,
        }),
        _ => Ok(()),
    }
}
