//! The content tree: fields, groups and wizard steps.
//!
//! Raw JSON content is resolved into these tagged unions exactly once, at
//! the resolver boundary; nothing downstream ever sees untyped data. Groups
//! serialize with a `container_type: "group"` marker, steps with the
//! explicit `type: "step"` discriminator that resolution gives priority
//! over the group title heuristic.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, SchemaError};
use crate::fields::{coerce_string_map, Field};

/// One entry of a form's content list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentItem {
    /// A bare field.
    Field(Field),
    /// A titled group of fields.
    Group(FieldGroup),
    /// A wizard step.
    Step(FormStep),
}

impl From<Field> for ContentItem {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<FieldGroup> for ContentItem {
    fn from(group: FieldGroup) -> Self {
        Self::Group(group)
    }
}

impl From<FormStep> for ContentItem {
    fn from(step: FormStep) -> Self {
        Self::Step(step)
    }
}

impl<'de> Deserialize<'de> for ContentItem {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        crate::registry::resolve_content_item(&value).map_err(serde::de::Error::custom)
    }
}

/// One entry of a step's content list: a field or a group, never another
/// step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepItem {
    /// A bare field.
    Field(Field),
    /// A titled group of fields.
    Group(FieldGroup),
}

impl From<Field> for StepItem {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<FieldGroup> for StepItem {
    fn from(group: FieldGroup) -> Self {
        Self::Group(group)
    }
}

impl<'de> Deserialize<'de> for StepItem {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match crate::registry::resolve_content_item(&value).map_err(serde::de::Error::custom)? {
            ContentItem::Field(field) => Ok(Self::Field(field)),
            ContentItem::Group(group) => Ok(Self::Group(group)),
            ContentItem::Step(_) => Err(serde::de::Error::custom(SchemaError::NestedStep)),
        }
    }
}

fn group_marker() -> String {
    "group".to_string()
}

/// A titled section of fields.
///
/// Invariant: field names are unique within the group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGroup {
    /// Always `"group"`; distinguishes serialized groups from steps.
    pub container_type: String,
    /// Generated at construction.
    pub id: Uuid,
    /// Section title.
    pub title: String,
    /// Section description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The grouped fields, in order.
    pub fields: Vec<Field>,
    /// Extra CSS classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_classes: Option<String>,
    /// Arbitrary HTML attributes.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Whether the section can collapse.
    pub collapsible: bool,
    /// Whether the section starts collapsed.
    pub collapsed: bool,
}

#[derive(Deserialize)]
struct FieldGroupRepr {
    #[serde(rename = "container_type", default = "group_marker")]
    container_type: String,
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    title: String,
    #[serde(default)]
    description: Option<String>,
    fields: Vec<Field>,
    #[serde(default)]
    css_classes: Option<String>,
    #[serde(default, deserialize_with = "coerce_string_map")]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    collapsible: bool,
    #[serde(default)]
    collapsed: bool,
}

impl<'de> Deserialize<'de> for FieldGroup {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = FieldGroupRepr::deserialize(deserializer)?;
        let group = Self {
            container_type: repr.container_type,
            id: repr.id,
            title: repr.title,
            description: repr.description,
            fields: repr.fields,
            css_classes: repr.css_classes,
            attributes: repr.attributes,
            collapsible: repr.collapsible,
            collapsed: repr.collapsed,
        };
        group.validate().map_err(serde::de::Error::custom)?;
        Ok(group)
    }
}

impl FieldGroup {
    /// Creates a group, enforcing name uniqueness.
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Result<Self> {
        let group = Self {
            container_type: group_marker(),
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            fields,
            css_classes: None,
            attributes: BTreeMap::new(),
            collapsible: false,
            collapsed: false,
        };
        group.validate()?;
        Ok(group)
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets extra CSS classes.
    #[must_use]
    pub fn css_classes(mut self, classes: impl Into<String>) -> Self {
        self.css_classes = Some(classes.into());
        self
    }

    /// Sets an arbitrary HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Makes the section collapsible.
    #[must_use]
    pub fn collapsible(mut self) -> Self {
        self.collapsible = true;
        self
    }

    /// Starts the section collapsed.
    #[must_use]
    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }

    /// Checks the unique-name invariant.
    pub fn validate(&self) -> Result<()> {
        if let Some(duplicate) = first_duplicate(self.fields.iter().map(Field::name)) {
            return Err(SchemaError::DuplicateFieldNameInGroup {
                group: self.title.clone(),
                name: duplicate,
            });
        }
        Ok(())
    }

    /// Deserializes and validates a raw group object.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// When a wizard step validates relative to navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Validate when the user advances past the step.
    #[default]
    OnNext,
    /// Validate only at final submission.
    OnSubmit,
    /// Validate on every change.
    OnChange,
}

fn step_marker() -> String {
    "step".to_string()
}

/// One step of a multi-step (wizard) form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormStep {
    /// Always `"step"`; the explicit discriminator resolution checks first.
    #[serde(rename = "type", default = "step_marker")]
    pub container_type: String,
    /// Generated at construction.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Step title.
    pub title: String,
    /// Step description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields and groups, in order.
    pub content: Vec<StepItem>,
    /// Extra CSS classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_classes: Option<String>,
    /// Arbitrary HTML attributes.
    #[serde(
        default,
        deserialize_with = "coerce_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub attributes: BTreeMap<String, String>,
    /// When the step validates.
    #[serde(default)]
    pub validation_mode: ValidationMode,
    /// Whether the step may be skipped.
    #[serde(default)]
    pub skippable: bool,
}

impl FormStep {
    /// Creates a step.
    pub fn new(title: impl Into<String>, content: Vec<StepItem>) -> Self {
        Self {
            container_type: step_marker(),
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            content,
            css_classes: None,
            attributes: BTreeMap::new(),
            validation_mode: ValidationMode::default(),
            skippable: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets extra CSS classes.
    #[must_use]
    pub fn css_classes(mut self, classes: impl Into<String>) -> Self {
        self.css_classes = Some(classes.into());
        self
    }

    /// Sets an arbitrary HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets the validation mode.
    #[must_use]
    pub fn validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    /// Makes the step skippable.
    #[must_use]
    pub fn skippable(mut self) -> Self {
        self.skippable = true;
        self
    }

    /// Returns the flattened field list, descending into groups, in
    /// document order. Recomputed on every call.
    pub fn fields(&self) -> Vec<&Field> {
        let mut fields = Vec::new();
        for item in &self.content {
            match item {
                StepItem::Field(field) => fields.push(field),
                StepItem::Group(group) => fields.extend(group.fields.iter()),
            }
        }
        fields
    }

    pub(crate) fn fields_mut(&mut self) -> Vec<&mut Field> {
        let mut fields = Vec::new();
        for item in &mut self.content {
            match item {
                StepItem::Field(field) => fields.push(field),
                StepItem::Group(group) => fields.extend(group.fields.iter_mut()),
            }
        }
        fields
    }

    /// Deserializes a raw step object.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Returns the first name that appears twice, if any.
pub(crate) fn first_duplicate<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Some(name.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{SelectOption, TextField};
    use serde_json::json;

    fn text(name: &str) -> Field {
        TextField::new(name).label(name.to_uppercase()).build().unwrap()
    }

    #[test]
    fn test_group_rejects_duplicate_names() {
        let err = FieldGroup::new("Personal", vec![text("a"), text("a")]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateFieldNameInGroup { .. }
        ));
    }

    #[test]
    fn test_group_serializes_marker() {
        let group = FieldGroup::new("Personal", vec![text("a")]).unwrap();
        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["container_type"], "group");
        assert_eq!(value["fields"][0]["name"], "a");
    }

    #[test]
    fn test_group_from_value_resolves_fields() {
        let group = FieldGroup::from_value(json!({
            "title": "Personal",
            "fields": [
                {"field_type": "text", "name": "first", "label": "First"},
                {"field_type": "select", "name": "country", "label": "Country",
                 "options": [{"value": "us", "label": "US"}]}
            ]
        }))
        .unwrap();
        assert_eq!(group.fields.len(), 2);
        assert!(matches!(group.fields[1], Field::Select(_)));
    }

    #[test]
    fn test_step_flattens_groups() {
        let group = FieldGroup::new("Names", vec![text("first"), text("last")]).unwrap();
        let step = FormStep::new(
            "Step 1",
            vec![group.into(), text("email").into()],
        );
        let names: Vec<&str> = step.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["first", "last", "email"]);
    }

    #[test]
    fn test_step_rejects_nested_step() {
        let err = FormStep::from_value(json!({
            "type": "step",
            "title": "Outer",
            "content": [{"type": "step", "title": "Inner", "content": []}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("may not contain another step"));
    }

    #[test]
    fn test_step_serializes_type_marker() {
        let step = FormStep::new("Step 1", vec![text("x").into()]);
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["type"], "step");
        assert_eq!(value["validation_mode"], "on_next");
    }

    #[test]
    fn test_validation_mode_parses() {
        let step = FormStep::from_value(json!({
            "type": "step",
            "title": "S",
            "content": [],
            "validation_mode": "on_submit",
            "skippable": true
        }))
        .unwrap();
        assert_eq!(step.validation_mode, ValidationMode::OnSubmit);
        assert!(step.skippable);
    }

    #[test]
    fn test_select_option_in_group_roundtrip() {
        let select = crate::fields::SelectField::new(
            "color",
            vec![SelectOption::new("r", "Red").selected()],
        )
        .build()
        .unwrap();
        let group = FieldGroup::new("Prefs", vec![select]).unwrap();
        let value = serde_json::to_value(&group).unwrap();
        let restored = FieldGroup::from_value(value).unwrap();
        assert_eq!(restored.fields, group.fields);
    }
}
