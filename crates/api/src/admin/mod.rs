//! Admin CRUD panels.
//!
//! A panel exposes `setup` (a description of the entity's columns and form
//! fields for the admin UI) plus the usual index/show/store/update/destroy
//! actions. Field `required` flags are read from the entity's
//! [`FormRequest`] rules so the UI and the server agree.

pub mod category;

use serde::Serialize;

use crate::request::{FormRequest, Operation};

/// A column shown in the panel's index table.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

/// Whether a form field must be filled, per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Required {
    pub create: bool,
    pub edit: bool,
}

/// A form field in the panel's create/edit form.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    /// Input widget kind (`text`, `switch`, ...).
    pub kind: &'static str,
    pub required: Required,
}

impl Field {
    pub fn new(name: &'static str, label: &'static str, kind: &'static str) -> Self {
        Self {
            name,
            label,
            kind,
            required: Required::default(),
        }
    }
}

/// Everything the admin UI needs to render a panel.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSetup {
    pub entity_name: &'static str,
    pub entity_name_plural: &'static str,
    pub route: String,
    pub columns: Vec<Column>,
    pub fields: Vec<Field>,
}

/// Mirror the `required` rule of `R` onto each field for `operation`.
pub fn set_required_fields<R: FormRequest>(fields: &mut [Field], operation: Operation) {
    for field in fields.iter_mut() {
        let required = R::rules_for(operation, field.name).is_some_and(|rules| rules.is_required());
        match operation {
            Operation::Create => field.required.create = required,
            Operation::Edit => field.required.edit = required,
        }
    }
}
