//! Entity descriptors: everything that differs between the admin panels.
//!
//! A [`CrudPanel`](crate::panel::CrudPanel) is generic over one [`Entity`];
//! the endpoint, table columns, form fields, chrome texts and per-field
//! display formatting all come from here.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use shared::domain::RecordId;

use crate::form::{FormError, FormValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    RequiredText,
    /// Non-negative decimal, shown with two decimals.
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Form control name, also the payload key.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind }
    }
}

pub const NAME_FIELD: FieldSpec = FieldSpec::new("nombre", "Nombre", FieldKind::RequiredText);

/// Locale-specific texts of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityLabels {
    pub singular: &'static str,
    pub plural: &'static str,
    /// Placeholder row shown for an empty list.
    pub empty: &'static str,
    pub create_title: &'static str,
    pub create_submit: &'static str,
    pub edit_title: &'static str,
    pub edit_submit: &'static str,
    pub delete_prompt: &'static str,
}

pub trait Entity: Send + Sync + 'static {
    type Record: DeserializeOwned + Clone + fmt::Debug + Send + Sync;
    type Payload: Serialize + fmt::Debug + Send + Sync;

    /// Path segment under `/api/`.
    const ENDPOINT: &'static str;
    const LABELS: EntityLabels;
    /// Table header, in cell order.
    const COLUMNS: &'static [&'static str];
    const FIELDS: &'static [FieldSpec];

    fn record_id(record: &Self::Record) -> RecordId;

    /// Display cells in [`Entity::COLUMNS`] order.
    fn cells(record: &Self::Record) -> Vec<String>;

    fn form_values(record: &Self::Record) -> FormValues;

    fn payload(values: &FormValues) -> Result<Self::Payload, FormError>;
}

pub fn format_price(value: f64) -> String {
    format!("${value:.2}")
}
