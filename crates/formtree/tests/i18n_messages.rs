//! Localized validation messages flow through every validation path.

use formtree::{
    validate_form_data, EmailField, Form, Messages, NumberField, SelectField, SelectOption,
    TextField,
};
use serde_json::{json, Map, Value};

fn data(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn spanish() -> Messages {
    let mut messages = Messages::new();
    messages.set_locale("es").unwrap();
    messages
}

#[test]
fn required_message_is_localized() {
    let form = Form::builder("f")
        .field(TextField::new("email").label("Email").required().build().unwrap())
        .build()
        .unwrap();

    let outcome = validate_form_data(&form, &Map::new(), &Messages::new());
    assert_eq!(outcome.errors[0].message, "The field email is required");

    let outcome = validate_form_data(&form, &Map::new(), &spanish());
    assert_eq!(outcome.errors[0].message, "El campo email es requerido");
    assert_eq!(outcome.message, "Error en la validación de datos");
}

#[test]
fn success_message_is_localized() {
    let form = Form::builder("f")
        .field(TextField::new("x").label("X").build().unwrap())
        .build()
        .unwrap();
    let outcome = validate_form_data(&form, &data(&[("x", json!("hola"))]), &spanish());
    assert!(outcome.success);
    assert_eq!(outcome.message, "Datos validados correctamente");
}

#[test]
fn per_kind_messages_are_localized() {
    let form = Form::builder("f")
        .field(EmailField::new("mail").label("Mail").build().unwrap())
        .build()
        .unwrap();
    let outcome = validate_form_data(&form, &data(&[("mail", json!("nope"))]), &spanish());
    assert_eq!(outcome.errors[0].message, "Email inválido");

    let form = Form::builder("f")
        .field(NumberField::new("n").label("N").min_value(10.0).build().unwrap())
        .build()
        .unwrap();
    let outcome = validate_form_data(&form, &data(&[("n", json!(3))]), &spanish());
    assert_eq!(
        outcome.errors[0].message,
        "El valor debe ser mayor o igual a 10"
    );

    let form = Form::builder("f")
        .field(
            SelectField::new("s", vec![SelectOption::new("a", "A")])
                .label("S")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let outcome = validate_form_data(&form, &data(&[("s", json!("z"))]), &spanish());
    assert!(outcome.errors[0].message.starts_with("Opción inválida: z"));
}

#[test]
fn custom_locale_with_fallback() {
    let mut messages = Messages::new();
    messages.register_locale(
        "fr",
        [("field.required_named", "Le champ {name} est obligatoire")],
    );
    messages.set_locale("fr").unwrap();

    let form = Form::builder("f")
        .field(TextField::new("nom").label("Nom").required().build().unwrap())
        .field(EmailField::new("mail").label("Mail").build().unwrap())
        .build()
        .unwrap();

    let outcome = form.validate_data(&data(&[("mail", json!("bad"))]), &messages);
    let by_field: std::collections::BTreeMap<&str, &str> = outcome
        .errors
        .iter()
        .map(|e| (e.field.as_str(), e.message.as_str()))
        .collect();
    // Translated key from fr, untranslated key falls back to en.
    assert_eq!(by_field["nom"], "Le champ nom est obligatoire");
    assert_eq!(by_field["mail"], "Invalid email");
}
