use serde::Serialize;
use std::collections::BTreeMap;

use crate::protocol::keys::{CopyKey, Field};

/// A sparse set of content changes decoded from a model reply.
///
/// Carries no identity: it is merged into a
/// [`ContentDocument`](super::ContentDocument) and dropped. Only allow-listed
/// keys can be represented, so an update can never smuggle arbitrary keys
/// into the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_jumbo_text: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub canvas_copy: BTreeMap<CopyKey, String>,
}

impl ParsedUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Builder-style variant of [`set_field`](Self::set_field).
    pub fn with_field(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set_field(field, value);
        self
    }

    pub fn with_copy(mut self, key: CopyKey, value: impl Into<String>) -> Self {
        self.canvas_copy.insert(key, value.into());
        self
    }

    /// Populated top-level fields with their values.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .iter()
            .filter_map(|&field| self.field(field).map(|value| (field, value)))
    }

    /// Number of populated fields, counting each canvas copy key.
    pub fn len(&self) -> usize {
        self.fields().count() + self.canvas_copy.len()
    }

    /// An update with no populated field is treated as "no update".
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Title => &self.title,
            Field::HeroHeading => &self.hero_heading,
            Field::HeroDescription => &self.hero_description,
            Field::HeroJumboText => &self.hero_jumbo_text,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::HeroHeading => &mut self.hero_heading,
            Field::HeroDescription => &mut self.hero_description,
            Field::HeroJumboText => &mut self.hero_jumbo_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_update_is_empty() {
        let update = ParsedUpdate::new();
        assert!(update.is_empty());
        assert_eq!(update.len(), 0);
    }

    #[test]
    fn len_counts_fields_and_copy_keys() {
        let update = ParsedUpdate::new()
            .with_field(Field::Title, "Dr. Ayushi")
            .with_field(Field::HeroJumboText, "Hello")
            .with_copy(CopyKey::FooterText, "Clinic");
        assert_eq!(update.len(), 3);
        assert!(!update.is_empty());
        assert_eq!(update.field(Field::Title), Some("Dr. Ayushi"));
        assert_eq!(update.field(Field::HeroHeading), None);
    }

    #[test]
    fn fields_iterates_in_declaration_order() {
        let update = ParsedUpdate::new()
            .with_field(Field::HeroDescription, "b")
            .with_field(Field::Title, "a");
        let fields: Vec<_> = update.fields().collect();
        assert_eq!(
            fields,
            vec![(Field::Title, "a"), (Field::HeroDescription, "b")]
        );
    }

    #[test]
    fn serializes_only_populated_fields() {
        let update = ParsedUpdate::new()
            .with_field(Field::HeroHeading, "Hi")
            .with_copy(CopyKey::Work2Title, "Site");
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"heroHeading":"Hi","canvasCopy":{"work2Title":"Site"}}"#);
    }
}
