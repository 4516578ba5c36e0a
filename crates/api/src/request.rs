//! Request payload helpers shared by the project, tag and category handlers.

use folio_core::translation::TranslatableInput;
use folio_core::types::DbId;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::error::FieldErrors;

/// Longest string accepted for a title or color.
pub const MAX_STRING_LEN: usize = 191;

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A tag reference in a save payload: either a bare id or an object with one.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    Id(DbId),
    Object { id: DbId },
}

impl TagRef {
    pub fn id(self) -> DbId {
        match self {
            TagRef::Id(id) | TagRef::Object { id } => id,
        }
    }
}

/// Every locale of a translatable title must be non-blank and at most
/// [`MAX_STRING_LEN`] characters.
pub fn validate_translatable_title(value: &TranslatableInput) -> Result<(), ValidationError> {
    let texts = value.texts();
    if texts.is_empty() || texts.iter().any(|t| t.trim().is_empty()) {
        let mut err = ValidationError::new("required");
        err.message = Some("The title field is required.".into());
        return Err(err);
    }
    if texts.iter().any(|t| t.chars().count() > MAX_STRING_LEN) {
        let mut err = ValidationError::new("max");
        err.message = Some(
            format!("The title may not be greater than {MAX_STRING_LEN} characters.").into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Run the derived validation of `input`, collecting failures per field.
///
/// Handlers add their own database-backed checks to the result before
/// turning it into a response with [`FieldErrors::into_result`].
pub fn field_errors(input: &impl Validate) -> FieldErrors {
    match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}

/// The kind of write a form is submitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Edit,
}

/// The rule names declared for one request field (`"required"`, `"max:191"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [&'static str],
}

impl FieldRules {
    pub fn is_required(&self) -> bool {
        self.rules.contains(&"required")
    }
}

/// A validated request body that can describe its rules to a client.
pub trait FormRequest: Validate {
    /// Rules applied to every operation.
    const RULES: &'static [FieldRules];

    /// Rules in effect for `operation`. Defaults to [`FormRequest::RULES`].
    fn rules(_operation: Operation) -> &'static [FieldRules] {
        Self::RULES
    }

    fn rules_for(operation: Operation, field: &str) -> Option<FieldRules> {
        Self::rules(operation)
            .iter()
            .find(|rules| rules.field == field)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        image: Option<Option<String>>,
    }

    #[test]
    fn double_option_tells_null_from_missing() {
        let missing: Patch = serde_json::from_value(json!({})).unwrap();
        let null: Patch = serde_json::from_value(json!({"image": null})).unwrap();
        let set: Patch = serde_json::from_value(json!({"image": "a.png"})).unwrap();

        assert_eq!(missing.image, None);
        assert_eq!(null.image, Some(None));
        assert_eq!(set.image, Some(Some("a.png".to_string())));
    }

    #[test]
    fn tag_refs_accept_ids_and_objects() {
        let refs: Vec<TagRef> = serde_json::from_value(json!([3, {"id": 7, "title": "x"}])).unwrap();
        let ids: Vec<DbId> = refs.into_iter().map(TagRef::id).collect();
        assert_eq!(ids, vec![3, 7]);
    }

    #[test]
    fn translatable_title_rules() {
        let ok: TranslatableInput = serde_json::from_value(json!("Foo")).unwrap();
        assert!(validate_translatable_title(&ok).is_ok());

        let blank: TranslatableInput = serde_json::from_value(json!({"en": "  "})).unwrap();
        assert_eq!(validate_translatable_title(&blank).unwrap_err().code, "required");

        let long: TranslatableInput = serde_json::from_value(json!("x".repeat(192))).unwrap();
        assert_eq!(validate_translatable_title(&long).unwrap_err().code, "max");
    }

    #[derive(Validate)]
    struct Named {
        #[validate(length(min = 1, message = "The name field is required."))]
        name: String,
    }

    impl FormRequest for Named {
        const RULES: &'static [FieldRules] = &[FieldRules {
            field: "name",
            rules: &["required", "string"],
        }];
    }

    #[test]
    fn field_errors_empty_when_valid() {
        assert!(field_errors(&Named { name: "a".into() }).is_empty());
        let errors = field_errors(&Named { name: String::new() });
        assert_eq!(
            errors.get("name"),
            Some(&["The name field is required.".to_string()][..])
        );
    }

    #[test]
    fn form_rules_lookup() {
        let rules = Named::rules_for(Operation::Edit, "name").unwrap();
        assert!(rules.is_required());
        assert!(Named::rules_for(Operation::Create, "missing").is_none());
    }
}
