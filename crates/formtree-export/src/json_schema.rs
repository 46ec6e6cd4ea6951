//! JSON Schema (draft-07) emission.
//!
//! Every flattened field becomes one property; group and step boundaries do
//! not survive into the schema, matching how the data is submitted as one
//! flat object.

use formtree::{Field, Form, SelectOption};
use serde_json::{json, Map, Value};

/// Emits a draft-07 object schema for the form.
///
/// `required` is present only when at least one field is required;
/// `additionalProperties` is always false.
pub fn form_to_json_schema(form: &Form) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in form.fields() {
        properties.insert(field.name().to_string(), field_to_schema(field));
        if field.core().required {
            required.push(Value::String(field.name().to_string()));
        }
    }

    let mut schema = Map::new();
    schema.insert(
        "$schema".to_string(),
        json!("http://json-schema.org/draft-07/schema#"),
    );
    schema.insert("type".to_string(), json!("object"));
    schema.insert("title".to_string(), json!(form.name));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    schema.insert("additionalProperties".to_string(), json!(false));
    Value::Object(schema)
}

fn enum_of(options: &[SelectOption]) -> Value {
    Value::Array(
        options
            .iter()
            .map(|option| Value::String(option.value.clone()))
            .collect(),
    )
}

fn field_to_schema(field: &Field) -> Value {
    let mut prop = Map::new();

    match field {
        Field::Text(text) => {
            prop.insert("type".to_string(), json!("string"));
            if let Some(min) = text.minlength {
                prop.insert("minLength".to_string(), json!(min));
            }
            if let Some(max) = text.maxlength {
                prop.insert("maxLength".to_string(), json!(max));
            }
            if let Some(pattern) = &text.pattern {
                prop.insert("pattern".to_string(), json!(pattern));
            }
        }
        Field::Textarea(textarea) => {
            prop.insert("type".to_string(), json!("string"));
            if let Some(min) = textarea.minlength {
                prop.insert("minLength".to_string(), json!(min));
            }
            if let Some(max) = textarea.maxlength {
                prop.insert("maxLength".to_string(), json!(max));
            }
        }
        Field::Email(_) => {
            prop.insert("type".to_string(), json!("string"));
            prop.insert("format".to_string(), json!("email"));
        }
        Field::Url(url) => {
            prop.insert("type".to_string(), json!("string"));
            prop.insert("format".to_string(), json!("uri"));
            if let Some(min) = url.minlength {
                prop.insert("minLength".to_string(), json!(min));
            }
            if let Some(max) = url.maxlength {
                prop.insert("maxLength".to_string(), json!(max));
            }
        }
        Field::Number(number) => {
            prop.insert("type".to_string(), json!("number"));
            if let Some(min) = number.min_value {
                prop.insert("minimum".to_string(), json!(min));
            }
            if let Some(max) = number.max_value {
                prop.insert("maximum".to_string(), json!(max));
            }
            if let Some(step) = number.step {
                prop.insert("multipleOf".to_string(), json!(step));
            }
        }
        Field::Date(_) => {
            prop.insert("type".to_string(), json!("string"));
            prop.insert("format".to_string(), json!("date"));
        }
        Field::Select(select) => {
            if select.multiple {
                prop.insert("type".to_string(), json!("array"));
                prop.insert(
                    "items".to_string(),
                    json!({"type": "string", "enum": enum_of(&select.options)}),
                );
                prop.insert("uniqueItems".to_string(), json!(true));
                if let Some(min) = select.min_selected {
                    prop.insert("minItems".to_string(), json!(min));
                }
                if let Some(max) = select.max_selected {
                    prop.insert("maxItems".to_string(), json!(max));
                }
            } else {
                prop.insert("type".to_string(), json!("string"));
                prop.insert("enum".to_string(), enum_of(&select.options));
            }
        }
        Field::Radio(radio) => {
            prop.insert("type".to_string(), json!("string"));
            prop.insert("enum".to_string(), enum_of(&radio.options));
        }
        Field::Checkbox(_) => {
            prop.insert("type".to_string(), json!("boolean"));
        }
        Field::CheckboxGroup(group) => {
            prop.insert("type".to_string(), json!("array"));
            prop.insert(
                "items".to_string(),
                json!({"type": "string", "enum": enum_of(&group.options)}),
            );
            prop.insert("uniqueItems".to_string(), json!(true));
        }
        Field::File(file) => {
            if file.multiple {
                prop.insert("type".to_string(), json!("array"));
                prop.insert(
                    "items".to_string(),
                    json!({"type": "string", "contentEncoding": "base64"}),
                );
            } else {
                prop.insert("type".to_string(), json!("string"));
                prop.insert("contentEncoding".to_string(), json!("base64"));
            }
        }
        Field::Hidden(_) => {
            prop.insert("type".to_string(), json!("string"));
        }
        Field::List(list) => {
            prop.insert("type".to_string(), json!("array"));
            let item_type = match list.item_kind.as_str() {
                "number" => "number",
                _ => "string",
            };
            prop.insert("items".to_string(), json!({"type": item_type}));
            if let Some(min) = list.min_items {
                prop.insert("minItems".to_string(), json!(min));
            }
            if let Some(max) = list.max_items {
                prop.insert("maxItems".to_string(), json!(max));
            }
        }
        Field::Custom(_) => {
            prop.insert("type".to_string(), json!("string"));
        }
    }

    let core = field.core();
    if let Some(label) = &core.label {
        prop.insert("title".to_string(), json!(label));
    }
    if let Some(help) = &core.help_text {
        prop.insert("description".to_string(), json!(help));
    }
    if let Some(default) = &core.default_value {
        prop.insert("default".to_string(), default.clone());
    }
    if core.readonly {
        prop.insert("readOnly".to_string(), json!(true));
    }

    Value::Object(prop)
}
