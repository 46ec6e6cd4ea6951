//! The validation engine.
//!
//! One shared per-field primitive, [`validate_field_value`], backs every
//! entry point; the entry points differ only in which fields they visit and
//! whether visibility is consulted:
//!
//! * [`validate_form_data`] — legacy whole-form pass; ignores visibility and
//!   stops at the first error.
//! * [`Form::validate_data`](crate::Form::validate_data) — legacy whole-form
//!   pass; ignores visibility but accumulates every error. The two legacy
//!   paths deliberately diverge in short-circuit behavior.
//! * [`validate_form_data_dynamic`] — visibility-aware, optionally scoped to
//!   one step, accumulates every error.
//!
//! Validation failures are values, not errors: every path returns the same
//! [`ValidationOutcome`] envelope.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::fields::Field;
use crate::form::Form;
use crate::i18n::Messages;
use crate::visibility::evaluate_visibility;

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the failed field, or `"unknown"` for form-level failures.
    pub field: String,
    /// Localized message.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The uniform result envelope shared by every validation entry point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    /// Whether every visited field validated.
    pub success: bool,
    /// Coerced data on success, `None` on failure.
    pub data: Option<Map<String, Value>>,
    /// Every collected error, in visit order.
    pub errors: Vec<FieldError>,
    /// Localized summary.
    pub message: String,
    /// Per-step errors, present only for the all-steps path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_errors: Option<BTreeMap<usize, Vec<FieldError>>>,
}

impl ValidationOutcome {
    pub(crate) fn ok(data: Map<String, Value>, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: Vec::new(),
            message,
            step_errors: None,
        }
    }

    pub(crate) fn fail(errors: Vec<FieldError>, message: String) -> Self {
        Self {
            success: false,
            data: None,
            errors,
            message,
            step_errors: None,
        }
    }
}

/// Validates one field against the submitted value.
///
/// Substitutes the field's default when the value is absent, enforces the
/// required flag, then runs the kind's hardcoded checks. Kinds without
/// hardcoded checks (date, file, hidden, url, textarea, list and custom
/// kinds) pass through unchanged; declarative
/// [`ValidationRule`](crate::ValidationRule) metadata is never interpreted
/// here.
///
/// Returns the coerced value on success or a structured error on failure;
/// both sides are `None` for an absent optional value.
pub fn validate_field_value(
    field: &Field,
    raw_value: Option<&Value>,
    messages: &Messages,
) -> (Option<Value>, Option<FieldError>) {
    let core = field.core();
    let value = raw_value
        .filter(|value| !value.is_null())
        .cloned()
        .or_else(|| core.default_value.clone());

    let Some(value) = value else {
        if core.required {
            return (
                None,
                Some(FieldError::new(
                    &core.name,
                    messages.translate("field.required_named", &[("name", core.name.clone())]),
                )),
            );
        }
        return (None, None);
    };

    match field {
        Field::Select(select) => {
            if select.multiple {
                validate_membership(&core.name, value, &select.valid_values(), messages)
            } else {
                let valid = select.valid_values();
                match value.as_str() {
                    Some(s) if valid.contains(s) => (Some(value.clone()), None),
                    _ => (
                        None,
                        Some(FieldError::new(
                            &core.name,
                            messages.translate(
                                "select.invalid_option_value",
                                &[
                                    ("value", display_value(&value)),
                                    ("valid", format!("{:?}", valid_list(select.options.iter().map(|o| o.value.as_str())))),
                                ],
                            ),
                        )),
                    ),
                }
            }
        }
        Field::Email(_) => {
            let text = display_value(&value);
            if crate::fields::email_shape().is_match(&text) {
                (Some(value), None)
            } else {
                (
                    None,
                    Some(FieldError::new(
                        &core.name,
                        messages.translate("email.invalid", &[]),
                    )),
                )
            }
        }
        Field::CheckboxGroup(group) => {
            let valid = group
                .options
                .iter()
                .map(|option| option.value.as_str())
                .collect();
            validate_membership(&core.name, value, &valid, messages)
        }
        Field::Checkbox(_) => (Some(Value::Bool(truthy(&value))), None),
        Field::Radio(radio) => {
            let valid: std::collections::BTreeSet<&str> = radio
                .options
                .iter()
                .map(|option| option.value.as_str())
                .collect();
            match value.as_str() {
                Some(s) if valid.contains(s) => (Some(value.clone()), None),
                _ => (
                    None,
                    Some(FieldError::new(
                        &core.name,
                        messages.translate("radio.invalid_option", &[]),
                    )),
                ),
            }
        }
        Field::Number(number) => {
            let Some(parsed) = parse_number(&value) else {
                return (
                    None,
                    Some(FieldError::new(
                        &core.name,
                        messages.translate("number.invalid", &[]),
                    )),
                );
            };
            if let Some(min) = number.min_value {
                if parsed < min {
                    return (
                        None,
                        Some(FieldError::new(
                            &core.name,
                            messages.translate("number.min_value", &[("min", min.to_string())]),
                        )),
                    );
                }
            }
            if let Some(max) = number.max_value {
                if parsed > max {
                    return (
                        None,
                        Some(FieldError::new(
                            &core.name,
                            messages.translate("number.max_value", &[("max", max.to_string())]),
                        )),
                    );
                }
            }
            (Some(Value::from(parsed)), None)
        }
        Field::Text(text) => {
            let coerced = display_value(&value);
            let length = coerced.chars().count() as u64;
            if let Some(min) = text.minlength {
                if length < min {
                    return (
                        None,
                        Some(FieldError::new(
                            &core.name,
                            messages.translate("text.minlength", &[("min", min.to_string())]),
                        )),
                    );
                }
            }
            if let Some(max) = text.maxlength {
                if length > max {
                    return (
                        None,
                        Some(FieldError::new(
                            &core.name,
                            messages.translate("text.maxlength", &[("max", max.to_string())]),
                        )),
                    );
                }
            }
            // The pattern constraint is TextField::validate_value territory,
            // not re-checked here.
            (Some(Value::String(coerced)), None)
        }
        // The custom-field escape hatch: kinds without hardcoded checks
        // always succeed.
        _ => (Some(value), None),
    }
}

/// Membership check shared by multi-select and checkbox groups: scalar
/// strings wrap into a singleton list, any other non-list input is a type
/// error.
fn validate_membership(
    name: &str,
    value: Value,
    valid: &std::collections::BTreeSet<&str>,
    messages: &Messages,
) -> (Option<Value>, Option<FieldError>) {
    let items = match value {
        Value::String(s) => vec![Value::String(s)],
        Value::Array(items) => items,
        _ => {
            return (
                None,
                Some(FieldError::new(
                    name,
                    messages.translate("select.value_must_be_list", &[]),
                )),
            )
        }
    };

    let invalid: Vec<String> = items
        .iter()
        .filter(|item| !item.as_str().is_some_and(|s| valid.contains(s)))
        .map(display_value)
        .collect();
    if invalid.is_empty() {
        (Some(Value::Array(items)), None)
    } else {
        (
            None,
            Some(FieldError::new(
                name,
                messages.translate("select.invalid_values", &[("values", format!("{invalid:?}"))]),
            )),
        )
    }
}

fn valid_list<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values.collect()
}

/// String rendering used for coercion and error interpolation.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truthiness in the loose sense: null, false, zero, empty string and empty
/// containers are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Parses a number from a JSON number, numeric string or boolean.
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Legacy whole-form validation: visits every flattened field, ignores
/// visibility and returns on the first error.
pub fn validate_form_data(
    form: &Form,
    data: &Map<String, Value>,
    messages: &Messages,
) -> ValidationOutcome {
    let mut validated = Map::new();
    for field in form.fields() {
        let (value, error) = validate_field_value(field, data.get(field.name()), messages);
        if let Some(error) = error {
            return ValidationOutcome::fail(
                vec![error],
                messages.translate("form.data_validation_error", &[]),
            );
        }
        if let Some(value) = value {
            validated.insert(field.name().to_string(), value);
        }
    }
    ValidationOutcome::ok(validated, messages.translate("form.validation_success", &[]))
}

/// Visibility-aware validation with optional step scoping.
///
/// Hidden fields (per `visible_when`, when `respect_visibility` holds) are
/// skipped entirely: they contribute neither data nor errors. With
/// `current_step`, only that step's flattened fields are visited; an
/// out-of-range index yields a structured error rather than a hard failure.
/// Every error is accumulated before returning.
pub fn validate_form_data_dynamic(
    form: &Form,
    data: &Map<String, Value>,
    respect_visibility: bool,
    current_step: Option<usize>,
    messages: &Messages,
) -> ValidationOutcome {
    let fields = match current_step {
        Some(index) => {
            let steps = form.steps();
            match steps.get(index) {
                Some(step) => step.fields(),
                None => {
                    let max = steps.len() as i64 - 1;
                    return ValidationOutcome::fail(
                        vec![FieldError::new(
                            "unknown",
                            messages.translate(
                                "wizard.invalid_step_index",
                                &[("index", index.to_string()), ("max", max.to_string())],
                            ),
                        )],
                        messages.translate("form.data_validation_error", &[]),
                    );
                }
            }
        }
        None => form.fields(),
    };

    let mut validated = Map::new();
    let mut errors = Vec::new();
    for field in fields {
        if respect_visibility && !evaluate_visibility(field, data) {
            continue;
        }
        let (value, error) = validate_field_value(field, data.get(field.name()), messages);
        if let Some(error) = error {
            errors.push(error);
        } else if let Some(value) = value {
            validated.insert(field.name().to_string(), value);
        }
    }

    if errors.is_empty() {
        ValidationOutcome::ok(validated, messages.translate("form.validation_success", &[]))
    } else {
        ValidationOutcome::fail(errors, messages.translate("form.data_validation_error", &[]))
    }
}
