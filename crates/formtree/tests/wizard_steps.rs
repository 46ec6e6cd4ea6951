//! Multi-step (wizard) forms: flattening, step-scoped validation and the
//! step/group resolution priority.

use formtree::{
    validate_form_data_dynamic, ContentItem, EmailField, FieldGroup, Form, FormStep, Messages,
    NumberField, SchemaError, StepItem, TextField, ValidationMode, VisibilityRule,
};
use serde_json::{json, Map, Value};

fn messages() -> Messages {
    Messages::new()
}

fn data(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn wizard() -> Form {
    let step1 = FormStep::new(
        "Account",
        vec![
            StepItem::Field(TextField::new("username").label("Username").required().build().unwrap()),
            StepItem::Field(EmailField::new("email").label("Email").required().build().unwrap()),
        ],
    );
    let step2 = FormStep::new(
        "Profile",
        vec![StepItem::Group(
            FieldGroup::new(
                "Details",
                vec![NumberField::new("age").label("Age").min_value(0.0).build().unwrap()],
            )
            .unwrap(),
        )],
    )
    .validation_mode(ValidationMode::OnSubmit);
    Form::builder("signup").step(step1).step(step2).build().unwrap()
}

#[test]
fn steps_and_flattening() {
    let form = wizard();
    assert_eq!(form.steps().len(), 2);
    let names: Vec<&str> = form.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["username", "email", "age"]);
    // Step-level flattening descends into groups.
    let step_names: Vec<&str> = form.steps()[1].fields().iter().map(|f| f.name()).collect();
    assert_eq!(step_names, vec!["age"]);
}

#[test]
fn non_wizard_has_no_steps() {
    let form = Form::builder("flat")
        .field(TextField::new("x").label("X").build().unwrap())
        .build()
        .unwrap();
    assert!(form.steps().is_empty());
}

#[test]
fn type_step_resolves_to_step() {
    let form = Form::from_value(json!({
        "name": "w",
        "content": [
            {"type": "step", "title": "Step 1", "content": [
                {"field_type": "text", "name": "x", "label": "X"}
            ]}
        ]
    }))
    .unwrap();
    assert!(matches!(form.content[0], ContentItem::Step(_)));
}

#[test]
fn title_without_type_resolves_to_group() {
    let form = Form::from_value(json!({
        "name": "g",
        "content": [
            {"title": "Group 1", "fields": [
                {"field_type": "text", "name": "x", "label": "X"}
            ]}
        ]
    }))
    .unwrap();
    assert!(matches!(form.content[0], ContentItem::Group(_)));
}

#[test]
fn type_step_takes_priority_over_title_heuristic() {
    // Matches the group heuristic too (it has a title), but the explicit
    // marker wins.
    let form = Form::from_value(json!({
        "name": "w",
        "content": [
            {"type": "step", "title": "Ambiguous", "content": [
                {"field_type": "text", "name": "x", "label": "X"}
            ]}
        ]
    }))
    .unwrap();
    assert!(matches!(form.content[0], ContentItem::Step(_)));
}

#[test]
fn unknown_type_falls_through_to_group() {
    let form = Form::from_value(json!({
        "name": "g",
        "content": [
            {"type": "future_section", "title": "Misc", "fields": [
                {"field_type": "text", "name": "x", "label": "X"}
            ]}
        ]
    }))
    .unwrap();
    assert!(matches!(form.content[0], ContentItem::Group(_)));
}

#[test]
fn validate_step_scopes_fields() {
    let form = wizard();
    let snapshot = data(&[("username", json!("alice")), ("email", json!("a@b.co"))]);

    let outcome = form.validate_step(0, &snapshot, true, &messages()).unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.data.unwrap().len(), 2);

    // Step 1's missing required fields do not affect step 2.
    let outcome = form.validate_step(1, &Map::new(), true, &messages()).unwrap();
    assert!(outcome.success);
}

#[test]
fn validate_step_invalid() {
    let form = wizard();
    let outcome = form
        .validate_step(0, &data(&[("username", json!("alice"))]), true, &messages())
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.errors[0].field, "email");
}

#[test]
fn validate_step_out_of_range_raises() {
    let form = wizard();
    let err = form
        .validate_step(9, &Map::new(), true, &messages())
        .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::InvalidStepIndex { index: 9, max: 1 }
    ));
}

#[test]
fn validate_step_non_wizard_raises() {
    let form = Form::builder("flat")
        .field(TextField::new("x").label("X").build().unwrap())
        .build()
        .unwrap();
    let err = form.validate_step(0, &Map::new(), true, &messages()).unwrap_err();
    assert!(matches!(err, SchemaError::NotAWizard));
}

#[test]
fn dynamic_out_of_range_is_structured_error() {
    // Same bad index through the dynamic path: a structured error entry,
    // not a hard failure.
    let form = wizard();
    let outcome = validate_form_data_dynamic(&form, &Map::new(), true, Some(9), &messages());
    assert!(!outcome.success);
    assert_eq!(outcome.errors[0].field, "unknown");
    assert_eq!(
        outcome.errors[0].message,
        "Invalid step index 9, must be between 0 and 1"
    );
}

#[test]
fn validate_all_steps_success_merges_data() {
    let form = wizard();
    let snapshot = data(&[
        ("username", json!("alice")),
        ("email", json!("a@b.co")),
        ("age", json!(30)),
    ]);
    let outcome = form.validate_all_steps(&snapshot, true, &messages());
    assert!(outcome.success);
    assert!(outcome.step_errors.is_none());
    let merged = outcome.data.unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged["age"], json!(30.0));
}

#[test]
fn validate_all_steps_partial_failure() {
    let form = wizard();
    let snapshot = data(&[("age", json!(-3))]);
    let outcome = form.validate_all_steps(&snapshot, true, &messages());
    assert!(!outcome.success);
    assert!(outcome.data.is_none());
    assert_eq!(outcome.message, "Wizard validation failed");

    let step_errors = outcome.step_errors.unwrap();
    assert_eq!(step_errors.len(), 2);
    assert_eq!(step_errors[&0].len(), 2); // username + email missing
    assert_eq!(step_errors[&1].len(), 1); // age below minimum
    assert_eq!(outcome.errors.len(), 3);
}

#[test]
fn step_fields_with_visibility() {
    let step = FormStep::new(
        "S",
        vec![
            StepItem::Field(TextField::new("plan").label("Plan").build().unwrap()),
            StepItem::Field(
                TextField::new("company")
                    .label("Company")
                    .required()
                    .visible_when(VisibilityRule::equals("plan", "business"))
                    .build()
                    .unwrap(),
            ),
        ],
    );
    let form = Form::builder("w").step(step).build().unwrap();

    let outcome = form
        .validate_step(0, &data(&[("plan", json!("personal"))]), true, &messages())
        .unwrap();
    assert!(outcome.success);

    let outcome = form
        .validate_step(0, &data(&[("plan", json!("business"))]), true, &messages())
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.errors[0].field, "company");
}

#[test]
fn wizard_json_roundtrip() {
    let form = wizard();
    let restored = Form::from_json(&form.to_json().unwrap()).unwrap();
    assert_eq!(restored.steps().len(), 2);
    assert_eq!(
        restored.steps()[1].validation_mode,
        ValidationMode::OnSubmit
    );
    assert_eq!(restored.fields().len(), 3);

    let raw: Value = serde_json::from_str(&form.to_json().unwrap()).unwrap();
    assert_eq!(raw["content"][0]["type"], "step");
    assert_eq!(raw["content"][1]["content"][0]["container_type"], "group");
}

#[test]
fn set_default_values_reaches_step_fields() {
    let mut form = wizard();
    form.set_default_values(&data(&[("username", json!("bob"))]));
    assert_eq!(
        form.fields()[0].core().default_value,
        Some(json!("bob"))
    );
    assert_eq!(form.fields()[2].core().default_value, None);
}
