//! Field type registry and content-item resolution.
//!
//! The registry decouples the tree builders from a closed type switch: each
//! field kind is described by a [`FieldTypeDescriptor`] (discriminator,
//! declared attribute names, construction factory), keyed by discriminator.
//! Several descriptors may share one discriminator (the built-in `checkbox`
//! does); resolution scores candidates by how many of their declared
//! attributes appear in the raw object and picks the best, ties broken by
//! registration order.
//!
//! State is process-wide, lazily seeded with the built-ins, and append-only
//! behind a mutex; snapshots are defensive clones.
//!
//! ```rust
//! use formtree::{FieldTypeDescriptor, register_field_type, registered_field_types};
//!
//! let descriptor = FieldTypeDescriptor::custom("PhoneField", "phone", &["country_code"]);
//! register_field_type(descriptor).unwrap();
//! assert!(registered_field_types().contains_key("phone"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use serde_json::Value;
use tracing::debug;

use crate::content::{ContentItem, FieldGroup, FormStep};
use crate::error::{Result, SchemaError};
use crate::fields::{
    CheckboxField, CheckboxGroupField, CustomField, DateField, EmailField, Field, FileField,
    HiddenField, ListField, NumberField, RadioField, SelectField, TextField, TextareaField,
    UrlField, BASE_ATTRIBUTE_NAMES,
};

type ConstructFn = Arc<dyn Fn(Value) -> Result<Field> + Send + Sync>;

/// Capability descriptor for one field kind.
#[derive(Clone)]
pub struct FieldTypeDescriptor {
    type_name: String,
    field_kind: String,
    declared_attributes: Vec<String>,
    construct: ConstructFn,
}

impl fmt::Debug for FieldTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTypeDescriptor")
            .field("type_name", &self.type_name)
            .field("field_kind", &self.field_kind)
            .field("declared_attributes", &self.declared_attributes)
            .finish_non_exhaustive()
    }
}

impl PartialEq for FieldTypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.field_kind == other.field_kind
    }
}

impl FieldTypeDescriptor {
    /// Creates a descriptor.
    ///
    /// `extra_attributes` lists the attribute names beyond the shared field
    /// core; the core names are added automatically, mirroring attribute
    /// inheritance.
    pub fn new(
        type_name: impl Into<String>,
        field_kind: impl Into<String>,
        extra_attributes: &[&str],
        construct: impl Fn(Value) -> Result<Field> + Send + Sync + 'static,
    ) -> Self {
        let mut declared: Vec<String> = BASE_ATTRIBUTE_NAMES
            .iter()
            .map(|name| (*name).to_string())
            .collect();
        declared.extend(extra_attributes.iter().map(|name| (*name).to_string()));
        Self {
            type_name: type_name.into(),
            field_kind: field_kind.into(),
            declared_attributes: declared,
            construct: Arc::new(construct),
        }
    }

    /// Creates a descriptor whose instances resolve to [`CustomField`],
    /// keeping the extension attributes intact.
    pub fn custom(
        type_name: impl Into<String>,
        field_kind: impl Into<String>,
        extra_attributes: &[&str],
    ) -> Self {
        Self::new(type_name, field_kind, extra_attributes, |raw| {
            let field: CustomField = serde_json::from_value(raw)?;
            Ok(Field::Custom(field))
        })
    }

    /// Returns the unique name identifying this candidate.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the discriminator this candidate registers under.
    pub fn field_kind(&self) -> &str {
        &self.field_kind
    }

    /// Returns the declared attribute names.
    pub fn declared_attributes(&self) -> &[String] {
        &self.declared_attributes
    }

    /// Runs the factory against a raw object.
    pub fn construct(&self, raw: Value) -> Result<Field> {
        (self.construct)(raw)
    }

    fn overlap_score(&self, map: &serde_json::Map<String, Value>) -> usize {
        self.declared_attributes
            .iter()
            .filter(|attr| map.contains_key(attr.as_str()))
            .count()
    }
}

type Registry = BTreeMap<String, Vec<FieldTypeDescriptor>>;

static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();

fn registry() -> &'static Mutex<Registry> {
    REGISTRY.get_or_init(|| Mutex::new(seed_builtins()))
}

macro_rules! builtin {
    ($type_name:literal, $kind:literal, [$($attr:literal),*], $ty:ty, $variant:path) => {
        FieldTypeDescriptor::new($type_name, $kind, &[$($attr),*], |raw: Value| {
            let field: $ty = serde_json::from_value(raw)?;
            field.validate()?;
            Ok($variant(field))
        })
    };
}

fn seed_builtins() -> Registry {
    let builtins = vec![
        builtin!("TextField", "text", ["minlength", "maxlength", "pattern"], TextField, Field::Text),
        builtin!("EmailField", "email", [], EmailField, Field::Email),
        builtin!("NumberField", "number", ["min_value", "max_value", "step"], NumberField, Field::Number),
        builtin!("DateField", "date", ["min_date", "max_date"], DateField, Field::Date),
        builtin!(
            "SelectField",
            "select",
            ["options", "multiple", "min_selected", "max_selected"],
            SelectField,
            Field::Select
        ),
        builtin!("RadioField", "radio", ["options", "inline"], RadioField, Field::Radio),
        builtin!("CheckboxField", "checkbox", ["checked", "value"], CheckboxField, Field::Checkbox),
        builtin!(
            "CheckboxGroupField",
            "checkbox",
            ["options", "inline"],
            CheckboxGroupField,
            Field::CheckboxGroup
        ),
        builtin!("FileField", "file", ["accept", "multiple"], FileField, Field::File),
        builtin!("HiddenField", "hidden", ["value"], HiddenField, Field::Hidden),
        builtin!("UrlField", "url", ["minlength", "maxlength"], UrlField, Field::Url),
        builtin!(
            "TextareaField",
            "textarea",
            ["minlength", "maxlength", "rows", "cols"],
            TextareaField,
            Field::Textarea
        ),
        builtin!(
            "ListField",
            "list",
            ["min_items", "max_items", "item_type"],
            ListField,
            Field::List
        ),
    ];

    let mut registry = Registry::new();
    for descriptor in builtins {
        registry
            .entry(descriptor.field_kind.clone())
            .or_default()
            .push(descriptor);
    }
    registry
}

/// Registers a field type descriptor.
///
/// Idempotent: a descriptor with a `type_name` already present under its
/// discriminator registers once.
///
/// # Errors
/// [`SchemaError::InvalidDescriptor`] when the descriptor has no type name;
/// [`SchemaError::MissingDiscriminator`] when it declares no discriminator.
pub fn register_field_type(descriptor: FieldTypeDescriptor) -> Result<()> {
    if descriptor.type_name.is_empty() {
        return Err(SchemaError::InvalidDescriptor);
    }
    if descriptor.field_kind.is_empty() {
        return Err(SchemaError::MissingDiscriminator(descriptor.type_name));
    }

    let mut registry = registry().lock().unwrap_or_else(PoisonError::into_inner);
    let candidates = registry.entry(descriptor.field_kind.clone()).or_default();
    if !candidates
        .iter()
        .any(|existing| existing.type_name == descriptor.type_name)
    {
        debug!(
            field_kind = %descriptor.field_kind,
            type_name = %descriptor.type_name,
            "registering field type"
        );
        candidates.push(descriptor);
    }
    Ok(())
}

/// Returns a defensive snapshot of the registry.
pub fn registered_field_types() -> BTreeMap<String, Vec<FieldTypeDescriptor>> {
    registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Resolves a raw JSON object into a typed content item.
///
/// Resolution rules, in priority order:
/// 1. an explicit `type: "step"` marker resolves to a [`FormStep`], even
///    when a `title` key is also present;
/// 2. a `title` key without a `field_type` key resolves to a [`FieldGroup`]
///    (any other `type` value falls through to this heuristic);
/// 3. otherwise the `field_type` discriminator is looked up and the best
///    candidate constructs the field.
///
/// Re-entrant: groups and steps resolve their nested content through this
/// same entry point.
///
/// # Errors
/// [`SchemaError::UnknownFieldType`] when the discriminator has no
/// registered candidate; construction errors propagate from the factory.
pub fn resolve_content_item(item: &Value) -> Result<ContentItem> {
    let map = item.as_object().ok_or(SchemaError::InvalidContentItem)?;

    if map.get("type").and_then(Value::as_str) == Some("step") {
        return FormStep::from_value(item.clone()).map(ContentItem::Step);
    }

    if map.contains_key("title") && !map.contains_key("field_type") {
        return FieldGroup::from_value(item.clone()).map(ContentItem::Group);
    }

    let kind = match map.get("field_type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(_) => return Err(SchemaError::InvalidDiscriminator),
        None => return Err(SchemaError::InvalidContentItem),
    };

    let candidates = registered_field_types()
        .remove(&kind)
        .ok_or_else(|| SchemaError::UnknownFieldType(kind.clone()))?;

    let winner = if candidates.len() == 1 {
        &candidates[0]
    } else {
        // Ties keep the earliest registration.
        let mut best = &candidates[0];
        let mut best_score = best.overlap_score(map);
        for candidate in &candidates[1..] {
            let score = candidate.overlap_score(map);
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }
        debug!(
            field_kind = %kind,
            type_name = %best.type_name,
            "resolved ambiguous discriminator"
        );
        best
    };

    winner.construct(item.clone()).map(ContentItem::Field)
}
