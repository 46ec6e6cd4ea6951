//! # formtree-export
//!
//! Renderers for [`formtree`] form schemas: plain HTML, Bootstrap 4/5
//! markup with generated client-side validation, and JSON Schema (draft-07).
//!
//! The core exposes everything these renderers need — the flattened field
//! list, the content tree with group/step boundaries intact, and each
//! field's resolved discriminator — so this crate stays a pure consumer.
//!
//! ```rust
//! use formtree::{Form, Messages, TextField};
//! use formtree_export::{export, ExportFormat, ExportOutput};
//!
//! let form = Form::builder("contact")
//!     .field(TextField::new("name").label("Name").required().build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let messages = Messages::new();
//! match export(&form, ExportFormat::Bootstrap5, &messages) {
//!     ExportOutput::Html { markup, .. } => assert!(markup.contains("form-control")),
//!     ExportOutput::JsonSchema(_) => unreachable!(),
//! }
//! ```

mod html;
mod json_schema;

pub use html::{
    field_to_html, form_to_html, generate_validation_code, group_to_html, html_escape,
    step_to_html, HtmlOptions,
};
pub use json_schema::form_to_json_schema;

use formtree::{Form, Messages};
use serde_json::Value;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Plain HTML plus a generated validation script.
    Html,
    /// Bootstrap 4 markup.
    Bootstrap4,
    /// Bootstrap 5 markup.
    Bootstrap5,
    /// JSON Schema, draft-07.
    JsonSchema,
}

impl ExportFormat {
    /// The wire tag of this format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Bootstrap4 => "html_bootstrap4",
            Self::Bootstrap5 => "html_bootstrap5",
            Self::JsonSchema => "json_schema",
        }
    }

    /// Parses a wire tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "html" => Some(Self::Html),
            "html_bootstrap4" => Some(Self::Bootstrap4),
            "html_bootstrap5" => Some(Self::Bootstrap5),
            "json_schema" => Some(Self::JsonSchema),
            _ => None,
        }
    }

    pub(crate) fn is_bootstrap(self) -> bool {
        matches!(self, Self::Bootstrap4 | Self::Bootstrap5)
    }
}

/// The result of an export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutput {
    /// Rendered markup plus the generated validation script (empty for the
    /// Bootstrap flavors).
    Html {
        /// The form markup.
        markup: String,
        /// The `<script>` block validating the form client-side.
        validation_script: String,
    },
    /// The emitted schema object.
    JsonSchema(Value),
}

/// Exports a form in the requested format.
pub fn export(form: &Form, format: ExportFormat, messages: &Messages) -> ExportOutput {
    match format {
        ExportFormat::Html | ExportFormat::Bootstrap4 | ExportFormat::Bootstrap5 => {
            let options = HtmlOptions::for_format(format);
            ExportOutput::Html {
                markup: form_to_html(form, &options, messages),
                validation_script: generate_validation_code(form, format, messages),
            }
        }
        ExportFormat::JsonSchema => ExportOutput::JsonSchema(form_to_json_schema(form)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formtree::TextField;

    #[test]
    fn test_format_tags_roundtrip() {
        for format in [
            ExportFormat::Html,
            ExportFormat::Bootstrap4,
            ExportFormat::Bootstrap5,
            ExportFormat::JsonSchema,
        ] {
            assert_eq!(ExportFormat::parse(format.as_str()), Some(format));
        }
        assert_eq!(ExportFormat::parse("yaml"), None);
    }

    #[test]
    fn test_export_entry_point() {
        let form = Form::builder("f")
            .field(TextField::new("x").label("X").build().unwrap())
            .build()
            .unwrap();
        let messages = Messages::new();

        match export(&form, ExportFormat::Html, &messages) {
            ExportOutput::Html {
                markup,
                validation_script,
            } => {
                assert!(markup.starts_with("<form"));
                assert!(validation_script.contains("<script>"));
            }
            ExportOutput::JsonSchema(_) => unreachable!(),
        }

        match export(&form, ExportFormat::JsonSchema, &messages) {
            ExportOutput::JsonSchema(schema) => assert_eq!(schema["title"], "f"),
            ExportOutput::Html { .. } => unreachable!(),
        }
    }
}
