//! # formtree
//!
//! Declarative form schemas: a typed content tree of fields, groups and
//! wizard steps, resolved from raw JSON through a runtime-extensible field
//! type registry, with conditional visibility and server-side data
//! validation.
//!
//! This crate provides:
//! - Typed field definitions with construction-time invariants
//! - A process-wide field type registry for custom kinds
//! - Conditional visibility rules evaluated against submitted data
//! - Whole-form, visibility-aware and per-step validation
//! - Localized validation messages with locale fallback
//!
//! ## Quick Start
//!
//! ```rust
//! use formtree::{
//!     validate_form_data, EmailField, Form, Messages, SelectField,
//!     SelectOption, TextField,
//! };
//! use serde_json::json;
//!
//! let form = Form::builder("signup")
//!     .field(
//!         TextField::new("username")
//!             .label("Username")
//!             .required()
//!             .minlength(3)
//!             .build()
//!             .unwrap(),
//!     )
//!     .field(EmailField::new("email").label("Email").required().build().unwrap())
//!     .field(
//!         SelectField::new(
//!             "role",
//!             vec![
//!                 SelectOption::new("user", "User"),
//!                 SelectOption::new("admin", "Administrator"),
//!             ],
//!         )
//!         .label("Role")
//!         .build()
//!         .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let messages = Messages::new();
//! let data = json!({
//!     "username": "alice",
//!     "email": "alice@example.com",
//!     "role": "user",
//! });
//! let outcome = validate_form_data(&form, data.as_object().unwrap(), &messages);
//! assert!(outcome.success);
//! ```
//!
//! ## Loading from JSON
//!
//! Raw definitions resolve through the registry, so groups, steps and custom
//! kinds all deserialize into their typed form:
//!
//! ```rust
//! use formtree::Form;
//! use serde_json::json;
//!
//! let form = Form::from_value(json!({
//!     "name": "survey",
//!     "content": [
//!         {"field_type": "text", "name": "title", "label": "Title"},
//!         {"title": "Details", "fields": [
//!             {"field_type": "number", "name": "age", "label": "Age"},
//!         ]},
//!         {"type": "step", "title": "Finish", "content": [
//!             {"field_type": "checkbox", "name": "agree", "label": "Agree"},
//!         ]},
//!     ],
//! }))
//! .unwrap();
//! assert_eq!(form.fields().len(), 3);
//! ```
//!
//! ## Custom field types
//!
//! ```rust
//! use formtree::{register_field_type, Field, FieldTypeDescriptor, Form};
//! use serde_json::json;
//!
//! register_field_type(FieldTypeDescriptor::custom(
//!     "PhoneField",
//!     "phone",
//!     &["country_code"],
//! ))
//! .unwrap();
//!
//! let form = Form::from_value(json!({
//!     "name": "contact",
//!     "content": [
//!         {"field_type": "phone", "name": "phone", "label": "Phone",
//!          "country_code": "+54"},
//!     ],
//! }))
//! .unwrap();
//! assert!(matches!(form.fields()[0], Field::Custom(_)));
//! ```

mod content;
mod error;
pub mod fields;
mod form;
mod i18n;
mod registry;
mod validation;
mod visibility;

pub use content::{ContentItem, FieldGroup, FormStep, StepItem, ValidationMode};
pub use error::{Result, SchemaError};
pub use fields::{
    CheckboxField, CheckboxGroupField, CustomField, DateField, DependentOptionsConfig, EmailField,
    Field, FieldCore, FileField, HiddenField, ListField, NumberField, RadioField, SelectField,
    SelectOption, TextField, TextareaField, UrlField, ValidationRule, VisibilityOperator,
    VisibilityRule,
};
pub use form::{Form, FormBuilder};
pub use i18n::{Messages, DEFAULT_LOCALE};
pub use registry::{
    register_field_type, registered_field_types, resolve_content_item, FieldTypeDescriptor,
};
pub use validation::{
    validate_field_value, validate_form_data, validate_form_data_dynamic, FieldError,
    ValidationOutcome,
};
pub use visibility::evaluate_visibility;
