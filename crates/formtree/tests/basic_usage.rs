//! End-to-end usage: build, validate, serialize.

use formtree::{
    validate_form_data, CheckboxField, CheckboxGroupField, DateField, Form, Messages, RadioField,
    SelectField, SelectOption, TextField,
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

fn registration_form() -> Form {
    Form::builder("registration")
        .field(
            TextField::new("name")
                .label("Full Name")
                .required()
                .minlength(2)
                .maxlength(100)
                .build()
                .unwrap(),
        )
        .field(
            SelectField::new(
                "country",
                vec![
                    SelectOption::new("us", "United States"),
                    SelectOption::new("uk", "United Kingdom"),
                ],
            )
            .label("Country")
            .required()
            .build()
            .unwrap(),
        )
        .field(
            RadioField::new(
                "plan",
                vec![
                    SelectOption::new("free", "Free"),
                    SelectOption::new("pro", "Pro"),
                ],
            )
            .label("Plan")
            .build()
            .unwrap(),
        )
        .field(CheckboxField::new("terms").label("Accept Terms").required().build().unwrap())
        .build()
        .unwrap()
}

#[test]
fn flattened_field_names_are_exact() {
    let form = registration_form();
    let names: Vec<&str> = form.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["name", "country", "plan", "terms"]);
}

#[test]
fn happy_path_validates_and_coerces() {
    let form = registration_form();
    let outcome = validate_form_data(
        &form,
        &data(&[
            ("name", json!("Ada Lovelace")),
            ("country", json!("uk")),
            ("plan", json!("pro")),
            ("terms", json!("on")),
        ]),
        &messages(),
    );
    assert!(outcome.success);
    let validated = outcome.data.unwrap();
    // Checkbox input coerces to a boolean by truthiness.
    assert_eq!(validated["terms"], json!(true));
    assert_eq!(validated["country"], json!("uk"));
}

#[test]
fn default_values_fill_absent_inputs() {
    let form = Form::builder("f")
        .field(
            TextField::new("lang")
                .label("Language")
                .required()
                .default_value("en")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let outcome = validate_form_data(&form, &Map::new(), &messages());
    assert!(outcome.success);
    assert_eq!(outcome.data.unwrap()["lang"], json!("en"));
}

#[test]
fn optional_absent_fields_stay_out_of_data() {
    let form = Form::builder("f")
        .field(TextField::new("nickname").label("Nickname").build().unwrap())
        .build()
        .unwrap();
    let outcome = validate_form_data(&form, &Map::new(), &messages());
    assert!(outcome.success);
    assert!(outcome.data.unwrap().is_empty());
}

#[test]
fn multi_select_accepts_valid_lists() {
    let form = Form::builder("f")
        .field(
            SelectField::new(
                "tags",
                vec![SelectOption::new("a", "A"), SelectOption::new("b", "B")],
            )
            .label("Tags")
            .multiple()
            .max_selected(3)
            .build()
            .unwrap(),
        )
        .build()
        .unwrap();

    let outcome = validate_form_data(&form, &data(&[("tags", json!(["a", "b"]))]), &messages());
    assert!(outcome.success);
    assert_eq!(outcome.data.unwrap()["tags"], json!(["a", "b"]));
}

#[test]
fn selection_bounds_not_enforced_at_validation() {
    // min/max_selected are construction-time invariants only; the engine's
    // per-kind dispatch does not re-check them. Asserted deliberately.
    let form = Form::builder("f")
        .field(
            SelectField::new(
                "tags",
                vec![
                    SelectOption::new("a", "A"),
                    SelectOption::new("b", "B"),
                    SelectOption::new("c", "C"),
                    SelectOption::new("d", "D"),
                ],
            )
            .label("Tags")
            .multiple()
            .max_selected(3)
            .build()
            .unwrap(),
        )
        .build()
        .unwrap();

    let outcome = validate_form_data(
        &form,
        &data(&[("tags", json!(["a", "b", "c", "d"]))]),
        &messages(),
    );
    assert!(outcome.success);
    assert_eq!(outcome.data.unwrap()["tags"], json!(["a", "b", "c", "d"]));
}

#[test]
fn checkbox_group_membership() {
    let form = Form::builder("f")
        .field(
            CheckboxGroupField::new(
                "colors",
                vec![SelectOption::new("r", "Red"), SelectOption::new("g", "Green")],
            )
            .label("Colors")
            .build()
            .unwrap(),
        )
        .build()
        .unwrap();

    let outcome = validate_form_data(&form, &data(&[("colors", json!(["r"]))]), &messages());
    assert!(outcome.success);

    let outcome = validate_form_data(&form, &data(&[("colors", json!(["purple"]))]), &messages());
    assert!(!outcome.success);
}

#[test]
fn dates_pass_through_unvalidated() {
    // Date bounds are exporter metadata; the engine's dispatch table has no
    // date branch.
    let form = Form::builder("f")
        .field(DateField::new("when").label("When").build().unwrap())
        .build()
        .unwrap();
    let outcome = validate_form_data(&form, &data(&[("when", json!("3024-99-99"))]), &messages());
    assert!(outcome.success);
}

#[test]
fn full_roundtrip_preserves_types_and_attributes() {
    let form = registration_form();
    let serialized = form.to_json().unwrap();
    let restored = Form::from_json(&serialized).unwrap();

    assert_eq!(restored.fields().len(), form.fields().len());
    for (a, b) in form.fields().iter().zip(restored.fields()) {
        assert_eq!(a.field_kind(), b.field_kind());
        assert_eq!(a.name(), b.name());
    }
    assert_eq!(form.fields(), restored.fields());
}
