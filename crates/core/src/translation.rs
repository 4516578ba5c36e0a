//! Translatable attribute values.
//!
//! A translatable attribute is stored as a `{locale: text}` JSON object and
//! resolved to a single string for the request locale on read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Locale used when neither the request nor the configuration names one.
pub const FALLBACK_LOCALE: &str = "en";

/// Per-locale values of a translatable attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<String, String>);

impl Translations {
    /// A translation set holding one locale.
    pub fn single(locale: &str, value: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(locale.to_string(), value.into());
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    pub fn set(&mut self, locale: &str, value: impl Into<String>) {
        self.0.insert(locale.to_string(), value.into());
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Overlay every locale of `other` onto `self`, keeping locales that
    /// `other` does not mention.
    pub fn merge(&mut self, other: Translations) {
        self.0.extend(other.0);
    }

    /// Apply `f` to every value, keeping the locale keys.
    pub fn map_values(&self, f: impl Fn(&str) -> String) -> Translations {
        Translations(
            self.0
                .iter()
                .map(|(locale, value)| (locale.clone(), f(value)))
                .collect(),
        )
    }

    /// Resolve to the value for `locale`, then `fallback`, then any locale.
    pub fn resolve(&self, locale: &str, fallback: &str) -> Option<&str> {
        self.get(locale)
            .or_else(|| self.get(fallback))
            .or_else(|| self.values().next())
    }
}

/// Incoming value for a translatable attribute.
///
/// A bare string targets the request locale; an object names its locales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslatableInput {
    Text(String),
    PerLocale(BTreeMap<String, String>),
}

impl TranslatableInput {
    pub fn into_translations(self, locale: &str) -> Translations {
        match self {
            TranslatableInput::Text(text) => Translations::single(locale, text),
            TranslatableInput::PerLocale(map) => Translations(map),
        }
    }

    /// Every text value carried by the input, for validation.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            TranslatableInput::Text(text) => vec![text.as_str()],
            TranslatableInput::PerLocale(map) => map.values().map(String::as_str).collect(),
        }
    }
}
