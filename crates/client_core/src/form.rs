use std::collections::BTreeMap;

use shared::domain::RecordId;
use thiserror::Error;

use crate::entity::{EntityLabels, FieldSpec};

/// Create-mode or edit-mode of a panel's form. Starts in `Create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(RecordId),
}

/// Title, submit label and cancel visibility for the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormChrome {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub show_cancel: bool,
}

impl FormChrome {
    pub fn for_mode(labels: &EntityLabels, mode: FormMode) -> Self {
        match mode {
            FormMode::Create => Self {
                title: labels.create_title,
                submit_label: labels.create_submit,
                show_cancel: false,
            },
            FormMode::Edit(_) => Self {
                title: labels.edit_title,
                submit_label: labels.edit_submit,
                show_cancel: true,
            },
        }
    }
}

/// Raw control values keyed by field name, as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|value| value.is_empty())
    }

    pub fn required_text(&self, field: &FieldSpec) -> Result<String, FormError> {
        let value = self.get(field.name);
        if value.trim().is_empty() {
            return Err(FormError::Required { field: field.label });
        }
        Ok(value.to_string())
    }

    pub fn optional_text(&self, field: &FieldSpec) -> Option<String> {
        let value = self.get(field.name);
        (!value.trim().is_empty()).then(|| value.to_string())
    }

    pub fn price(&self, field: &FieldSpec) -> Result<f64, FormError> {
        let raw = self.get(field.name).trim();
        if raw.is_empty() {
            return Err(FormError::Required { field: field.label });
        }
        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| FormError::NotANumber {
                field: field.label,
                value: raw.to_string(),
            })?;
        if value < 0.0 {
            return Err(FormError::Negative { field: field.label });
        }
        Ok(value)
    }
}

/// What a browser's native form controls would refuse to submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("El campo {field} es obligatorio")]
    Required { field: &'static str },
    #[error("El campo {field} debe ser un número: {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("El campo {field} no puede ser negativo")]
    Negative { field: &'static str },
}
