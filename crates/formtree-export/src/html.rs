//! HTML rendering for forms, groups, steps and fields, plus the
//! client-side validation code generator.
//!
//! Markup is built with plain string formatting; attribute maps render in
//! sorted order so output is deterministic.

use std::collections::BTreeMap;

use formtree::{
    CheckboxField, ContentItem, Field, FieldGroup, Form, FormStep, Messages, SelectOption,
    StepItem, ValidationMode,
};

use crate::ExportFormat;

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Rendering knobs for [`form_to_html`].
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Target markup flavor.
    pub format: ExportFormat,
    /// Render a submit button.
    pub submit: bool,
    /// Override the form element id (defaults to the form uuid).
    pub id: Option<String>,
    /// Override the form enctype.
    pub enctype: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Html,
            submit: false,
            id: None,
            enctype: None,
        }
    }
}

impl HtmlOptions {
    /// Options for a given markup flavor.
    pub fn for_format(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }
}

fn render_attrs(attrs: &BTreeMap<String, String>) -> String {
    attrs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!(r#"{key}="{}""#, html_escape(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn merge_custom_attrs(attrs: &mut BTreeMap<String, String>, custom: &BTreeMap<String, String>) {
    for (key, value) in custom {
        attrs.insert(key.clone(), value.clone());
    }
}

/// Renders a single field wrapped in its group div.
pub fn field_to_html(field: &Field, format: ExportFormat) -> String {
    let core = field.core();
    let is_bootstrap = format.is_bootstrap();

    let base_input_class = if is_bootstrap { "form-control" } else { "" };
    let form_group_class = if is_bootstrap {
        if format == ExportFormat::Bootstrap5 {
            "mb-3"
        } else {
            "form-group"
        }
    } else {
        "form-field"
    };
    let help_text_class = if is_bootstrap { "form-text" } else { "help-text" };

    let label_html = if field.field_kind() == "hidden" {
        String::new()
    } else {
        let label_class = if is_bootstrap { "form-label" } else { "" };
        let label = core.label.as_deref().unwrap_or_default();
        format!(
            r#"<label class="{label_class}" for="{}">{}</label>"#,
            core.id,
            html_escape(label)
        )
    };

    let help_html = core.help_text.as_deref().map_or_else(String::new, |help| {
        format!(r#"<small class="{help_text_class}">{}</small>"#, html_escape(help))
    });

    let input_html = match field {
        Field::Select(select) => {
            let mut attrs = BTreeMap::new();
            attrs.insert("id".to_string(), core.id.to_string());
            attrs.insert("name".to_string(), core.name.clone());
            attrs.insert(
                "class".to_string(),
                format!("{base_input_class} {}", core.css_classes.as_deref().unwrap_or(""))
                    .trim()
                    .to_string(),
            );
            if core.required {
                attrs.insert("required".to_string(), "required".to_string());
            }
            if select.multiple {
                attrs.insert("multiple".to_string(), "multiple".to_string());
            }
            merge_custom_attrs(&mut attrs, &core.attributes);

            let options_html: String = select.options.iter().map(option_html).collect();
            format!("<select {}>{options_html}</select>", render_attrs(&attrs))
        }
        Field::Radio(radio) => {
            choice_inputs_html(core, &radio.options, "radio", "radio-group")
        }
        Field::CheckboxGroup(group) => {
            choice_inputs_html(core, &group.options, "checkbox", "checkbox-group")
        }
        other => {
            let mut attrs = BTreeMap::new();
            attrs.insert("id".to_string(), core.id.to_string());
            attrs.insert("name".to_string(), core.name.clone());
            attrs.insert("type".to_string(), field.field_kind().to_string());
            attrs.insert(
                "class".to_string(),
                format!("{base_input_class} {}", core.css_classes.as_deref().unwrap_or(""))
                    .trim()
                    .to_string(),
            );
            if let Some(placeholder) = &core.placeholder {
                attrs.insert("placeholder".to_string(), placeholder.clone());
            }
            if let Field::Hidden(hidden) = other {
                attrs.insert("value".to_string(), scalar_to_string(&hidden.value));
            }
            if core.required {
                attrs.insert("required".to_string(), "required".to_string());
            }
            if core.readonly {
                attrs.insert("readonly".to_string(), "readonly".to_string());
            }
            if let Some(default) = &core.default_value {
                attrs.insert("value".to_string(), scalar_to_string(default));
            }
            if let Field::Checkbox(CheckboxField { checked: true, .. }) = other {
                attrs.insert("checked".to_string(), "checked".to_string());
            }
            merge_custom_attrs(&mut attrs, &core.attributes);

            format!("<input {}>", render_attrs(&attrs))
        }
    };

    format!(r#"<div class="{form_group_class}">{label_html}{input_html}{help_html}</div>"#)
}

fn option_html(option: &SelectOption) -> String {
    let selected = if option.selected {
        r#" selected="selected""#
    } else {
        ""
    };
    format!(
        r#"<option value="{}"{selected}>{}</option>"#,
        html_escape(&option.value),
        html_escape(&option.label)
    )
}

fn choice_inputs_html(
    core: &formtree::FieldCore,
    options: &[SelectOption],
    input_type: &str,
    wrapper_class: &str,
) -> String {
    let inputs: String = options
        .iter()
        .map(|option| {
            let mut attrs = BTreeMap::new();
            attrs.insert("id".to_string(), format!("{}_{}", core.id, option.value));
            attrs.insert("name".to_string(), core.name.clone());
            attrs.insert("type".to_string(), input_type.to_string());
            attrs.insert("value".to_string(), option.value.clone());
            attrs.insert(
                "class".to_string(),
                core.css_classes.clone().unwrap_or_default(),
            );
            if option.selected {
                attrs.insert("checked".to_string(), "checked".to_string());
            }
            if core.required {
                attrs.insert("required".to_string(), "required".to_string());
            }
            format!(
                r#"<input {}><label for="{}_{}">{}</label>"#,
                render_attrs(&attrs),
                core.id,
                html_escape(&option.value),
                html_escape(&option.label)
            )
        })
        .collect();
    format!(r#"<div class="{wrapper_class}">{inputs}</div>"#)
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders a field group as a fieldset with a legend.
pub fn group_to_html(group: &FieldGroup, format: ExportFormat) -> String {
    let is_bootstrap = format.is_bootstrap();

    let fieldset_class = if is_bootstrap {
        format!("mb-4 {}", group.css_classes.as_deref().unwrap_or(""))
            .trim()
            .to_string()
    } else {
        group.css_classes.clone().unwrap_or_default()
    };
    let legend_class = if is_bootstrap { "h5 mb-3" } else { "" };

    let mut attrs = BTreeMap::new();
    attrs.insert("id".to_string(), format!("group_{}", group.id));
    attrs.insert("class".to_string(), fieldset_class);
    if group.collapsible {
        attrs.insert("data-collapsible".to_string(), "true".to_string());
        if group.collapsed {
            attrs.insert("data-collapsed".to_string(), "true".to_string());
        }
    }
    merge_custom_attrs(&mut attrs, &group.attributes);

    let description_html = group.description.as_deref().map_or_else(String::new, |desc| {
        let desc_class = if is_bootstrap {
            "text-muted small mb-3"
        } else {
            "group-description"
        };
        format!(r#"<p class="{desc_class}">{}</p>"#, html_escape(desc))
    });

    let fields_html: String = group
        .fields
        .iter()
        .map(|field| field_to_html(field, format))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<fieldset {}><legend class="{legend_class}">{}</legend>{description_html}{fields_html}</fieldset>"#,
        render_attrs(&attrs),
        html_escape(&group.title)
    )
}

/// Renders a wizard step as a section carrying its step metadata.
pub fn step_to_html(step: &FormStep, index: usize, format: ExportFormat) -> String {
    let is_bootstrap = format.is_bootstrap();

    let section_class = format!(
        "form-step {}",
        step.css_classes.as_deref().unwrap_or("")
    )
    .trim()
    .to_string();

    let mut attrs = BTreeMap::new();
    attrs.insert("id".to_string(), format!("step_{}", step.id));
    attrs.insert("class".to_string(), section_class);
    attrs.insert("data-step-index".to_string(), index.to_string());
    attrs.insert(
        "data-validation-mode".to_string(),
        validation_mode_tag(step.validation_mode).to_string(),
    );
    if step.skippable {
        attrs.insert("data-skippable".to_string(), "true".to_string());
    }
    merge_custom_attrs(&mut attrs, &step.attributes);

    let title_class = if is_bootstrap { "h5 mb-3" } else { "step-title" };
    let title_html = format!(
        r#"<h3 class="{title_class}">{}</h3>"#,
        html_escape(&step.title)
    );

    let description_html = step.description.as_deref().map_or_else(String::new, |desc| {
        let desc_class = if is_bootstrap {
            "text-muted small mb-3"
        } else {
            "step-description"
        };
        format!(r#"<p class="{desc_class}">{}</p>"#, html_escape(desc))
    });

    let content_html: String = step
        .content
        .iter()
        .map(|item| match item {
            StepItem::Field(field) => field_to_html(field, format),
            StepItem::Group(group) => group_to_html(group, format),
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<section {}>{title_html}{description_html}{content_html}</section>",
        render_attrs(&attrs)
    )
}

fn validation_mode_tag(mode: ValidationMode) -> &'static str {
    match mode {
        ValidationMode::OnNext => "on_next",
        ValidationMode::OnSubmit => "on_submit",
        ValidationMode::OnChange => "on_change",
    }
}

/// Renders the complete form.
pub fn form_to_html(form: &Form, options: &HtmlOptions, messages: &Messages) -> String {
    let is_bootstrap = options.format.is_bootstrap();
    let form_class = if is_bootstrap { "needs-validation" } else { "" };

    let mut attrs = BTreeMap::new();
    attrs.insert(
        "id".to_string(),
        options.id.clone().unwrap_or_else(|| form.id.to_string()),
    );
    attrs.insert("name".to_string(), form.name.clone());
    attrs.insert(
        "class".to_string(),
        format!("{form_class} {}", form.css_classes.as_deref().unwrap_or(""))
            .trim()
            .to_string(),
    );
    attrs.insert(
        "enctype".to_string(),
        options
            .enctype
            .clone()
            .unwrap_or_else(|| "application/x-www-form-urlencoded".to_string()),
    );
    if let Some(action) = &form.action {
        attrs.insert("action".to_string(), action.clone());
    }
    if !form.steps().is_empty() {
        attrs.insert("data-wizard".to_string(), "true".to_string());
    }
    merge_custom_attrs(&mut attrs, &form.attributes);

    let mut step_index = 0usize;
    let content_html: String = form
        .content
        .iter()
        .map(|item| match item {
            ContentItem::Field(field) => field_to_html(field, options.format),
            ContentItem::Group(group) => group_to_html(group, options.format),
            ContentItem::Step(step) => {
                let html = step_to_html(step, step_index, options.format);
                step_index += 1;
                html
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let submit_html = if options.submit {
        let submit_class = if is_bootstrap { "btn btn-primary" } else { "" };
        format!(
            r#"<button type="submit" class="{submit_class}">{}</button>"#,
            html_escape(&messages.translate("export.submit", &[]))
        )
    } else {
        String::new()
    };

    format!(
        "<form {}>{content_html}{submit_html}</form>",
        render_attrs(&attrs)
    )
}

/// Generates the client-side validation script for the plain-HTML flavor.
///
/// This is the one consumer of [`formtree::ValidationRule`] metadata; the
/// server-side engine never interprets those rules.
pub fn generate_validation_code(form: &Form, format: ExportFormat, messages: &Messages) -> String {
    if format != ExportFormat::Html {
        return String::new();
    }

    let field_validations = form
        .fields()
        .iter()
        .map(|field| field_validation_js(field, messages))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<script>
function validate_{name}(form) {{
    let errors = [];
    let validated_data = {{}};

{field_validations}

    if (errors.length > 0) {{
        alert('{fix_errors}\n' + errors.join('\n'));
        return false;
    }}
    return true;
}}

document.getElementById('{name}').onsubmit = function(e) {{
    return validate_{name}(this);
}};
</script>"#,
        name = form.name,
        fix_errors = messages.translate("export.fix_errors", &[]),
    )
}

fn field_validation_js(field: &Field, messages: &Messages) -> String {
    let core = field.core();
    let name = &core.name;
    let mut js = format!("    let {name} = form.elements['{name}'].value;\n");

    if core.required {
        let message = messages.translate(
            "export.field_required",
            &[("label", core.label.clone().unwrap_or_else(|| name.clone()))],
        );
        js.push_str(&format!(
            "    if (!{name}) {{ errors.push('{message}'); }}\n"
        ));
    }

    for rule in &core.validation_rules {
        let value = &rule.value;
        let message = &rule.message;
        let check = match rule.kind.as_str() {
            "min" => Some(format!("{name} && {name} < {value}")),
            "max" => Some(format!("{name} && {name} > {value}")),
            "regex" => Some(format!("{name} && !new RegExp({value}).test({name})")),
            "minlength" => Some(format!("{name} && {name}.length < {value}")),
            "maxlength" => Some(format!("{name} && {name}.length > {value}")),
            _ => None,
        };
        if let Some(check) = check {
            js.push_str(&format!(
                "    if ({check}) {{ errors.push('{message}'); }}\n"
            ));
        }
    }

    js.push_str(&format!(
        "    if (!errors.length) {{ validated_data['{name}'] = {name}; }}\n"
    ));
    js
}
