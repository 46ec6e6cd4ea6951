//! The form root: content tree, flattening and validation entry points.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::content::{first_duplicate, ContentItem, FieldGroup, FormStep};
use crate::error::{Result, SchemaError};
use crate::fields::{coerce_string_map, Field};
use crate::i18n::Messages;
use crate::validation::{validate_form_data_dynamic, FieldError, ValidationOutcome};
use crate::visibility::evaluate_visibility;

fn default_version() -> i64 {
    1
}

/// A declarative form: an ordered tree of fields, groups and steps.
///
/// Invariant: field names are unique across the entire flattened tree.
/// Immutable after construction except for
/// [`set_default_values`](Self::set_default_values).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Form {
    /// Generated at construction.
    pub id: Uuid,
    /// Form name; also the default HTML id.
    pub name: String,
    /// The content tree, in order.
    pub content: Vec<ContentItem>,
    /// Extra CSS classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_classes: Option<String>,
    /// Schema payload version.
    pub version: i64,
    /// Cross-version compatibility marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,
    /// Arbitrary HTML attributes.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Submission target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[derive(Deserialize)]
struct FormRepr {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    name: String,
    content: Vec<ContentItem>,
    #[serde(default)]
    css_classes: Option<String>,
    #[serde(default = "default_version")]
    version: i64,
    #[serde(default)]
    schema_version: Option<i64>,
    #[serde(default, deserialize_with = "coerce_string_map")]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    action: Option<String>,
}

impl<'de> Deserialize<'de> for Form {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = Value::deserialize(deserializer)?;
        if let Some(map) = value.as_object_mut() {
            // Back-compat: a top-level `fields` key aliases `content`;
            // `content` wins when both are present.
            if let Some(fields) = map.remove("fields") {
                map.entry("content").or_insert(fields);
            }
        }
        let repr: FormRepr = serde_json::from_value(value).map_err(serde::de::Error::custom)?;
        let form = Self {
            id: repr.id,
            name: repr.name,
            content: repr.content,
            css_classes: repr.css_classes,
            version: repr.version,
            schema_version: repr.schema_version,
            attributes: repr.attributes,
            action: repr.action,
        };
        form.validate().map_err(serde::de::Error::custom)?;
        Ok(form)
    }
}

impl Form {
    /// Creates a form, enforcing global name uniqueness.
    pub fn new(name: impl Into<String>, content: Vec<ContentItem>) -> Result<Self> {
        let form = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content,
            css_classes: None,
            version: default_version(),
            schema_version: None,
            attributes: BTreeMap::new(),
            action: None,
        };
        form.validate()?;
        Ok(form)
    }

    /// Convenience constructor for the flat-list shape: every item is a bare
    /// field.
    pub fn from_fields(name: impl Into<String>, fields: Vec<Field>) -> Result<Self> {
        Self::new(name, fields.into_iter().map(ContentItem::from).collect())
    }

    /// Starts a builder.
    pub fn builder(name: impl Into<String>) -> FormBuilder {
        FormBuilder::new(name)
    }

    /// Loads a form from its JSON wire representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a form from an already-parsed JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serializes to the JSON wire representation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes to a JSON object.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Checks the global unique-name invariant.
    pub fn validate(&self) -> Result<()> {
        if let Some(duplicate) = first_duplicate(self.fields().into_iter().map(Field::name)) {
            return Err(SchemaError::DuplicateFieldName(duplicate));
        }
        Ok(())
    }

    /// Returns the flattened field list: steps and groups contribute their
    /// own flattened fields, bare items contribute themselves, in document
    /// order. Recomputed on every call.
    pub fn fields(&self) -> Vec<&Field> {
        let mut fields = Vec::new();
        for item in &self.content {
            match item {
                ContentItem::Field(field) => fields.push(field),
                ContentItem::Group(group) => fields.extend(group.fields.iter()),
                ContentItem::Step(step) => fields.extend(step.fields()),
            }
        }
        fields
    }

    fn fields_mut(&mut self) -> Vec<&mut Field> {
        let mut fields = Vec::new();
        for item in &mut self.content {
            match item {
                ContentItem::Field(field) => fields.push(field),
                ContentItem::Group(group) => fields.extend(group.fields.iter_mut()),
                ContentItem::Step(step) => fields.extend(step.fields_mut()),
            }
        }
        fields
    }

    /// Overwrites every field's default value from the given data snapshot.
    ///
    /// Fields absent from `data` have their default cleared, matching the
    /// original behavior.
    pub fn set_default_values(&mut self, data: &Map<String, Value>) {
        for field in self.fields_mut() {
            let name = field.name().to_string();
            field.core_mut().default_value = data.get(&name).cloned();
        }
    }

    /// Returns the wizard steps, in order; empty for a non-wizard form.
    pub fn steps(&self) -> Vec<&FormStep> {
        self.content
            .iter()
            .filter_map(|item| match item {
                ContentItem::Step(step) => Some(step),
                _ => None,
            })
            .collect()
    }

    /// Returns the fields visible under the given data snapshot.
    pub fn visible_fields(&self, data: &Map<String, Value>) -> Vec<&Field> {
        self.fields()
            .into_iter()
            .filter(|field| evaluate_visibility(field, data))
            .collect()
    }

    /// Legacy whole-form validation: visits every flattened field, ignores
    /// visibility and accumulates every error before returning.
    ///
    /// Note the deliberate divergence from
    /// [`validate_form_data`](crate::validation::validate_form_data), which
    /// short-circuits on the first error.
    pub fn validate_data(&self, data: &Map<String, Value>, messages: &Messages) -> ValidationOutcome {
        let mut validated = Map::new();
        let mut errors = Vec::new();
        for field in self.fields() {
            let (value, error) =
                crate::validation::validate_field_value(field, data.get(field.name()), messages);
            if let Some(error) = error {
                errors.push(error);
            } else if let Some(value) = value {
                validated.insert(field.name().to_string(), value);
            }
        }
        if errors.is_empty() {
            ValidationOutcome::ok(validated, messages.translate("form.validation_success", &[]))
        } else {
            ValidationOutcome::fail(errors, messages.translate("form.validation_error", &[]))
        }
    }

    /// Validates one wizard step.
    ///
    /// # Errors
    /// [`SchemaError::NotAWizard`] when the form has no steps,
    /// [`SchemaError::InvalidStepIndex`] when the index is out of range —
    /// unlike the dynamic path, which reports the bad index as a structured
    /// validation error.
    pub fn validate_step(
        &self,
        step_index: usize,
        data: &Map<String, Value>,
        respect_visibility: bool,
        messages: &Messages,
    ) -> Result<ValidationOutcome> {
        let steps = self.steps();
        if steps.is_empty() {
            return Err(SchemaError::NotAWizard);
        }
        if step_index >= steps.len() {
            return Err(SchemaError::InvalidStepIndex {
                index: step_index,
                max: steps.len() - 1,
            });
        }
        Ok(validate_form_data_dynamic(
            self,
            data,
            respect_visibility,
            Some(step_index),
            messages,
        ))
    }

    /// Validates every wizard step in order, merging the validated data and
    /// collecting per-step errors.
    ///
    /// A form without steps falls back to a plain dynamic validation.
    pub fn validate_all_steps(
        &self,
        data: &Map<String, Value>,
        respect_visibility: bool,
        messages: &Messages,
    ) -> ValidationOutcome {
        let steps = self.steps();
        if steps.is_empty() {
            return validate_form_data_dynamic(self, data, respect_visibility, None, messages);
        }

        let mut all_errors: Vec<FieldError> = Vec::new();
        let mut step_errors: BTreeMap<usize, Vec<FieldError>> = BTreeMap::new();
        let mut merged = Map::new();

        for index in 0..steps.len() {
            let result =
                validate_form_data_dynamic(self, data, respect_visibility, Some(index), messages);
            if result.success {
                if let Some(step_data) = result.data {
                    merged.extend(step_data);
                }
            } else {
                all_errors.extend(result.errors.iter().cloned());
                step_errors.insert(index, result.errors);
            }
        }

        if all_errors.is_empty() {
            ValidationOutcome::ok(merged, messages.translate("form.validation_success", &[]))
        } else {
            let mut outcome = ValidationOutcome::fail(
                all_errors,
                messages.translate("wizard.validation_failed", &[]),
            );
            outcome.step_errors = Some(step_errors);
            outcome
        }
    }
}

/// Incremental form construction.
#[derive(Debug, Default)]
pub struct FormBuilder {
    name: String,
    content: Vec<ContentItem>,
    css_classes: Option<String>,
    schema_version: Option<i64>,
    attributes: BTreeMap<String, String>,
    action: Option<String>,
}

impl FormBuilder {
    /// Starts a builder for a form with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a bare field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.content.push(ContentItem::Field(field));
        self
    }

    /// Appends a field group.
    #[must_use]
    pub fn group(mut self, group: FieldGroup) -> Self {
        self.content.push(ContentItem::Group(group));
        self
    }

    /// Appends a wizard step.
    #[must_use]
    pub fn step(mut self, step: FormStep) -> Self {
        self.content.push(ContentItem::Step(step));
        self
    }

    /// Sets extra CSS classes.
    #[must_use]
    pub fn css_classes(mut self, classes: impl Into<String>) -> Self {
        self.css_classes = Some(classes.into());
        self
    }

    /// Sets the compatibility marker.
    #[must_use]
    pub fn schema_version(mut self, version: i64) -> Self {
        self.schema_version = Some(version);
        self
    }

    /// Sets an arbitrary HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets the submission target.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Finalizes the form, enforcing the unique-name invariant.
    pub fn build(self) -> Result<Form> {
        let mut form = Form::new(self.name, self.content)?;
        form.css_classes = self.css_classes;
        form.schema_version = self.schema_version;
        form.attributes = self.attributes;
        form.action = self.action;
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StepItem;
    use crate::fields::{EmailField, TextField};
    use serde_json::json;

    fn text(name: &str) -> Field {
        TextField::new(name).label(name.to_uppercase()).build().unwrap()
    }

    #[test]
    fn test_duplicate_names_across_nesting_rejected() {
        let group = FieldGroup::new("G", vec![text("a")]).unwrap();
        let err = Form::new("f", vec![text("a").into(), group.into()]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldName(_)));
    }

    #[test]
    fn test_flatten_mixed_content() {
        let group = FieldGroup::new("G", vec![text("b"), text("c")]).unwrap();
        let step = FormStep::new(
            "S",
            vec![
                StepItem::Field(text("d")),
                StepItem::Group(FieldGroup::new("H", vec![text("e")]).unwrap()),
            ],
        );
        let form = Form::new(
            "f",
            vec![text("a").into(), group.into(), step.into()],
        )
        .unwrap();

        let names: Vec<&str> = form.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_fields_alias_for_content() {
        let form = Form::from_value(json!({
            "name": "legacy",
            "fields": [{"field_type": "text", "name": "x", "label": "X"}]
        }))
        .unwrap();
        assert_eq!(form.fields().len(), 1);

        // content wins when both keys are present.
        let form = Form::from_value(json!({
            "name": "both",
            "fields": [{"field_type": "text", "name": "ignored", "label": "I"}],
            "content": [{"field_type": "text", "name": "kept", "label": "K"}]
        }))
        .unwrap();
        let names: Vec<&str> = form.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["kept"]);
    }

    #[test]
    fn test_set_default_values() {
        let mut form = Form::from_fields("f", vec![text("a"), text("b")]).unwrap();
        let mut data = Map::new();
        data.insert("a".to_string(), json!("hello"));
        form.set_default_values(&data);

        assert_eq!(form.fields()[0].core().default_value, Some(json!("hello")));
        assert_eq!(form.fields()[1].core().default_value, None);
    }

    #[test]
    fn test_builder() {
        let form = Form::builder("signup")
            .field(text("username"))
            .field(EmailField::new("email").label("Email").build().unwrap())
            .action("/signup")
            .css_classes("wide")
            .build()
            .unwrap();
        assert_eq!(form.fields().len(), 2);
        assert_eq!(form.action.as_deref(), Some("/signup"));
    }

    #[test]
    fn test_roundtrip_keeps_structure() {
        let group = FieldGroup::new("G", vec![text("b")]).unwrap();
        let step = FormStep::new("S", vec![StepItem::Field(text("c"))]);
        let form = Form::new("f", vec![text("a").into(), group.into(), step.into()]).unwrap();

        let restored = Form::from_json(&form.to_json().unwrap()).unwrap();
        assert_eq!(restored.fields().len(), form.fields().len());
        assert!(matches!(restored.content[1], ContentItem::Group(_)));
        assert!(matches!(restored.content[2], ContentItem::Step(_)));
        assert_eq!(restored.version, 1);
    }
}
