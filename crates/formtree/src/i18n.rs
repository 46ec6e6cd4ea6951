//! Localized message catalogs for validation results.
//!
//! [`Messages`] is an explicit, injectable catalog service rather than
//! process-global state: validation entry points take a `&Messages` and the
//! caller decides its scope (per request, per thread, shared). Lookup falls
//! back from the current locale to the default locale, then to the literal
//! key, so an incomplete translation never hides a message entirely.
//!
//! ```rust
//! use formtree::Messages;
//!
//! let mut messages = Messages::new();
//! messages.set_locale("es").unwrap();
//! assert_eq!(
//!     messages.translate("field.required", &[]),
//!     "Este campo es requerido"
//! );
//! ```

use std::collections::BTreeMap;

use crate::error::{Result, SchemaError};

/// The locale every catalog falls back to.
pub const DEFAULT_LOCALE: &str = "en";

/// Locale-keyed message catalogs with a current-locale cursor.
#[derive(Debug, Clone)]
pub struct Messages {
    locales: BTreeMap<String, BTreeMap<String, String>>,
    current: String,
}

impl Default for Messages {
    fn default() -> Self {
        let mut locales = BTreeMap::new();
        locales.insert(DEFAULT_LOCALE.to_string(), english_catalog());
        locales.insert("es".to_string(), spanish_catalog());
        Self {
            locales,
            current: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Messages {
    /// Creates a catalog service with the built-in `en` and `es` locales,
    /// with `en` active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active locale code.
    pub fn locale(&self) -> &str {
        &self.current
    }

    /// Switches the active locale.
    ///
    /// # Errors
    /// Returns [`SchemaError::UnknownLocale`] if the locale has not been
    /// registered.
    pub fn set_locale(&mut self, locale: &str) -> Result<()> {
        if !self.locales.contains_key(locale) {
            return Err(SchemaError::UnknownLocale {
                locale: locale.to_string(),
                available: self.available_locales().join(", "),
            });
        }
        self.current = locale.to_string();
        Ok(())
    }

    /// Returns the sorted list of registered locale codes.
    pub fn available_locales(&self) -> Vec<String> {
        self.locales.keys().cloned().collect()
    }

    /// Registers a new locale or merges messages into an existing one.
    ///
    /// Merge semantics: new keys are added, existing keys are overwritten.
    pub fn register_locale<I, K, V>(&mut self, locale: &str, messages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let catalog = self.locales.entry(locale.to_string()).or_default();
        for (key, value) in messages {
            catalog.insert(key.into(), value.into());
        }
    }

    /// Returns a copy of the catalog for `locale`, or the default locale's
    /// catalog when the code is unknown.
    pub fn catalog(&self, locale: &str) -> BTreeMap<String, String> {
        self.locales
            .get(locale)
            .or_else(|| self.locales.get(DEFAULT_LOCALE))
            .cloned()
            .unwrap_or_default()
    }

    /// Translates `key` in the active locale, interpolating `{name}`-style
    /// placeholders from `params`.
    ///
    /// Unknown keys fall back to the default locale, then to the key itself.
    pub fn translate(&self, key: &str, params: &[(&str, String)]) -> String {
        let template = self
            .locales
            .get(&self.current)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.locales
                    .get(DEFAULT_LOCALE)
                    .and_then(|catalog| catalog.get(key))
            })
            .map_or(key, String::as_str);

        let mut message = template.to_string();
        for (name, value) in params {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }
}

fn catalog_from(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn english_catalog() -> BTreeMap<String, String> {
    catalog_from(&[
        // Field-level validation
        ("field.required", "This field is required"),
        ("field.required_named", "The field {name} is required"),
        // Text
        ("text.minlength", "Minimum length is {min}"),
        ("text.maxlength", "Maximum length is {max}"),
        (
            "text.pattern_mismatch",
            "Value does not match the required pattern",
        ),
        ("text.invalid_regex", "Invalid regex pattern"),
        // Email
        ("email.invalid", "Invalid email"),
        // Number
        (
            "number.min_value",
            "Value must be greater than or equal to {min}",
        ),
        (
            "number.max_value",
            "Value must be less than or equal to {max}",
        ),
        ("number.invalid", "Must be a valid number"),
        // Date
        ("date.min_date", "Date must be after {min}"),
        ("date.max_date", "Date must be before {max}"),
        (
            "date.invalid_format",
            "Must be a valid date in YYYY-MM-DD format",
        ),
        // Select
        ("select.invalid_option", "Invalid option selected"),
        ("select.invalid_options", "Invalid options selected"),
        (
            "select.invalid_option_value",
            "Invalid option: {value}. Must be one of: {valid}",
        ),
        ("select.invalid_values", "Invalid values: {values}"),
        ("select.min_selected", "Must select at least {min} options"),
        ("select.max_selected", "Can select at most {max} options"),
        ("select.value_must_be_list", "Value must be a list"),
        // Radio
        ("radio.invalid_option", "Invalid option selected"),
        // Checkbox
        ("checkbox.must_be_boolean", "Must be a boolean value"),
        ("checkbox_group.invalid_options", "Invalid options selected"),
        // Form-level
        ("form.validation_success", "Data validated successfully"),
        ("form.validation_error", "Validation error"),
        ("form.data_validation_error", "Data validation error"),
        // Export / HTML
        ("export.fix_errors", "Please fix the following errors:"),
        ("export.submit", "Submit"),
        ("export.field_required", "The field {label} is required"),
        // Wizard / multi-step
        (
            "wizard.not_a_wizard_form",
            "This form is not configured as a wizard (no steps found)",
        ),
        (
            "wizard.invalid_step_index",
            "Invalid step index {index}, must be between 0 and {max}",
        ),
        (
            "wizard.step_validation_failed",
            "Validation failed for step {step}",
        ),
        ("wizard.validation_failed", "Wizard validation failed"),
        // Visibility
        (
            "visibility.unknown_operator",
            "Unknown visibility operator: {operator}",
        ),
    ])
}

fn spanish_catalog() -> BTreeMap<String, String> {
    catalog_from(&[
        ("field.required", "Este campo es requerido"),
        ("field.required_named", "El campo {name} es requerido"),
        ("text.minlength", "La longitud mínima es {min}"),
        ("text.maxlength", "La longitud máxima es {max}"),
        (
            "text.pattern_mismatch",
            "El valor no coincide con el patrón requerido",
        ),
        ("text.invalid_regex", "Patrón regex inválido"),
        ("email.invalid", "Email inválido"),
        (
            "number.min_value",
            "El valor debe ser mayor o igual a {min}",
        ),
        (
            "number.max_value",
            "El valor debe ser menor o igual a {max}",
        ),
        ("number.invalid", "Debe ser un número válido"),
        ("date.min_date", "La fecha debe ser posterior a {min}"),
        ("date.max_date", "La fecha debe ser anterior a {max}"),
        (
            "date.invalid_format",
            "Debe ser una fecha válida en formato YYYY-MM-DD",
        ),
        ("select.invalid_option", "Opción inválida seleccionada"),
        ("select.invalid_options", "Opciones inválidas seleccionadas"),
        (
            "select.invalid_option_value",
            "Opción inválida: {value}. Debe ser una de: {valid}",
        ),
        ("select.invalid_values", "Valores inválidos: {values}"),
        (
            "select.min_selected",
            "Debe seleccionar al menos {min} opciones",
        ),
        (
            "select.max_selected",
            "Puede seleccionar máximo {max} opciones",
        ),
        ("select.value_must_be_list", "El valor debe ser una lista"),
        ("radio.invalid_option", "Opción inválida seleccionada"),
        ("checkbox.must_be_boolean", "Debe ser un valor booleano"),
        (
            "checkbox_group.invalid_options",
            "Opciones inválidas seleccionadas",
        ),
        ("form.validation_success", "Datos validados correctamente"),
        ("form.validation_error", "Error en la validación"),
        (
            "form.data_validation_error",
            "Error en la validación de datos",
        ),
        (
            "export.fix_errors",
            "Por favor corrija los siguientes errores:",
        ),
        ("export.submit", "Enviar"),
        ("export.field_required", "El campo {label} es requerido"),
        (
            "wizard.not_a_wizard_form",
            "Este formulario no está configurado como wizard (no se encontraron pasos)",
        ),
        (
            "wizard.invalid_step_index",
            "Índice de paso inválido {index}, debe estar entre 0 y {max}",
        ),
        (
            "wizard.step_validation_failed",
            "La validación falló para el paso {step}",
        ),
        (
            "wizard.validation_failed",
            "La validación del wizard falló",
        ),
        (
            "visibility.unknown_operator",
            "Operador de visibilidad desconocido: {operator}",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_is_english() {
        let messages = Messages::new();
        assert_eq!(messages.locale(), "en");
        assert_eq!(
            messages.translate("field.required", &[]),
            "This field is required"
        );
    }

    #[test]
    fn test_set_locale_unknown_fails() {
        let mut messages = Messages::new();
        let err = messages.set_locale("fr").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownLocale { .. }));
    }

    #[test]
    fn test_interpolation() {
        let messages = Messages::new();
        assert_eq!(
            messages.translate("field.required_named", &[("name", "email".to_string())]),
            "The field email is required"
        );
    }

    #[test]
    fn test_unknown_key_returns_key() {
        let messages = Messages::new();
        assert_eq!(messages.translate("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn test_fallback_to_default_locale() {
        let mut messages = Messages::new();
        messages.register_locale("fr", [("field.required", "Ce champ est obligatoire")]);
        messages.set_locale("fr").unwrap();
        assert_eq!(
            messages.translate("field.required", &[]),
            "Ce champ est obligatoire"
        );
        // Keys missing from fr fall back to en.
        assert_eq!(
            messages.translate("email.invalid", &[]),
            "Invalid email"
        );
    }

    #[test]
    fn test_register_locale_merges() {
        let mut messages = Messages::new();
        messages.register_locale("es", [("field.required", "Obligatorio")]);
        messages.set_locale("es").unwrap();
        assert_eq!(messages.translate("field.required", &[]), "Obligatorio");
        // Untouched keys keep their original translation.
        assert_eq!(messages.translate("email.invalid", &[]), "Email inválido");
    }

    #[test]
    fn test_available_locales_sorted() {
        let mut messages = Messages::new();
        messages.register_locale("de", [("field.required", "Pflichtfeld")]);
        assert_eq!(messages.available_locales(), vec!["de", "en", "es"]);
    }

    #[test]
    fn test_catalog_returns_copy() {
        let messages = Messages::new();
        let mut copy = messages.catalog("en");
        copy.insert("field.required".to_string(), "mutated".to_string());
        assert_eq!(
            messages.translate("field.required", &[]),
            "This field is required"
        );
    }
}
