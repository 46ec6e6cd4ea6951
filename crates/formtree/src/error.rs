//! Error types for schema construction and resolution.
//!
//! Schema misuse (bad regex, name collisions, inconsistent bounds) is a
//! programmer error and surfaces as a [`SchemaError`] at construction time.
//! Data-validation failures are never errors: they travel as values inside
//! [`crate::validation::ValidationOutcome`].

use thiserror::Error;

/// Errors raised while building or resolving a form schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A discriminator has no registered candidate type.
    #[error("unknown field type: {0:?}")]
    UnknownFieldType(String),

    /// A content item was not a recognizable JSON object.
    #[error("content item must be a JSON object with a field_type, title or step marker")]
    InvalidContentItem,

    /// A content item carried a non-string `field_type` value.
    #[error("field_type must be a string")]
    InvalidDiscriminator,

    /// Two fields in the same form share a name.
    #[error("field names must be unique in the form (duplicate: {0:?})")]
    DuplicateFieldName(String),

    /// Two fields in the same group share a name.
    #[error("field names must be unique within group {group:?} (duplicate: {name:?})")]
    DuplicateFieldNameInGroup {
        /// Title of the offending group.
        group: String,
        /// The duplicated field name.
        name: String,
    },

    /// A Text field pattern failed to compile.
    #[error("invalid regex pattern for field {field:?}")]
    InvalidPattern {
        /// Name of the offending field.
        field: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A default value does not match the field's expected shape.
    #[error("default value for field {field:?} must be {expected}")]
    InvalidDefaultValue {
        /// Name of the offending field.
        field: String,
        /// Human description of the expected shape.
        expected: &'static str,
    },

    /// `min_selected` was negative.
    #[error("min_selected cannot be negative")]
    NegativeMinSelected,

    /// `min_selected` was set on a single-valued select.
    #[error("min_selected can only be used with multiple=true")]
    MinSelectedRequiresMultiple,

    /// `max_selected` was below 1.
    #[error("max_selected must be greater than 0")]
    MaxSelectedTooSmall,

    /// `max_selected` was set on a single-valued select.
    #[error("max_selected can only be used with multiple=true")]
    MaxSelectedRequiresMultiple,

    /// `max_selected` was below `min_selected`.
    #[error("max_selected must be greater than or equal to min_selected")]
    MaxSelectedBelowMin,

    /// A Hidden field carried a composite value.
    #[error("hidden field {0:?} value must be a string, number or boolean")]
    InvalidHiddenValue(String),

    /// A step was nested inside another step.
    #[error("a step may not contain another step")]
    NestedStep,

    /// A step-scoped operation was called on a form without steps.
    #[error("this form is not configured as a wizard (no steps found)")]
    NotAWizard,

    /// A step index was outside the valid range.
    #[error("invalid step index {index}, must be between 0 and {max}")]
    InvalidStepIndex {
        /// The requested index.
        index: usize,
        /// The highest valid index.
        max: usize,
    },

    /// A field type descriptor is missing its type name.
    #[error("field type descriptor does not satisfy the field contract: missing type name")]
    InvalidDescriptor,

    /// A field type descriptor declares no discriminator.
    #[error("field type descriptor {0:?} must declare a field_type discriminator")]
    MissingDiscriminator(String),

    /// A locale code has not been registered.
    #[error("unknown locale {locale:?}, available locales: {available}")]
    UnknownLocale {
        /// The requested locale code.
        locale: String,
        /// Comma-separated registered locale codes.
        available: String,
    },

    /// The raw form definition failed to parse.
    #[error("failed to parse form definition: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catch-all for custom field type factories.
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
