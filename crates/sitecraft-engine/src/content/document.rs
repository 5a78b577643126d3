use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::update::ParsedUpdate;
use crate::protocol::keys::{CopyKey, Field};

/// Shown in the hero when the document has no jumbo text of its own.
pub const DEFAULT_JUMBO_TEXT: &str = "I design clear, friendly experiences for the web.";

/// Title and body given to sections added from the editor.
pub const NEW_SECTION_TITLE: &str = "New Section";
pub const NEW_SECTION_CONTENT: &str = "Add content here.";

/// Stable identity of a user-added section.
///
/// Assigned once when the section is created and never rewritten; the
/// editor tree uses it as the id of the section's node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// A fresh id that cannot collide with any other section.
    pub fn generate() -> Self {
        Self(format!("section-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    id: SectionId,
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(id: SectionId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn id(&self) -> &SectionId {
        &self.id
    }
}

/// Partial edit of a section; `None` leaves the value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Named canvas text, keyed by the closed [`CopyKey`] set.
///
/// Reads never come back empty-handed: a key the document has no value for
/// yields the key's default copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CanvasCopy(BTreeMap<CopyKey, String>);

impl CanvasCopy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: CopyKey) -> &str {
        self.0
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_copy())
    }

    /// The stored value, without falling back to the default copy.
    pub fn explicit(&self, key: CopyKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn set(&mut self, key: CopyKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    /// Writes every given entry, leaving unmentioned keys untouched.
    pub fn merge<'a>(&mut self, entries: impl IntoIterator<Item = (&'a CopyKey, &'a String)>) {
        for (key, value) in entries {
            self.0.insert(*key, value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The generated site copy: single source of truth for the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    title: String,
    hero_heading: String,
    hero_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero_jumbo_text: Option<String>,
    canvas_copy: CanvasCopy,
    sections: Vec<Section>,
}

impl ContentDocument {
    pub fn new(
        title: impl Into<String>,
        hero_heading: impl Into<String>,
        hero_description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            hero_heading: hero_heading.into(),
            hero_description: hero_description.into(),
            hero_jumbo_text: None,
            canvas_copy: CanvasCopy::new(),
            sections: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn hero_heading(&self) -> &str {
        &self.hero_heading
    }

    pub fn hero_description(&self) -> &str {
        &self.hero_description
    }

    pub fn hero_jumbo_text(&self) -> &str {
        self.hero_jumbo_text.as_deref().unwrap_or(DEFAULT_JUMBO_TEXT)
    }

    /// Current value of a top-level field, defaults applied.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => self.title(),
            Field::HeroHeading => self.hero_heading(),
            Field::HeroDescription => self.hero_description(),
            Field::HeroJumboText => self.hero_jumbo_text(),
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::HeroHeading => self.hero_heading = value,
            Field::HeroDescription => self.hero_description = value,
            Field::HeroJumboText => self.hero_jumbo_text = Some(value),
        }
    }

    pub fn canvas_copy(&self) -> &CanvasCopy {
        &self.canvas_copy
    }

    pub fn copy(&self, key: CopyKey) -> &str {
        self.canvas_copy.get(key)
    }

    pub fn set_copy(&mut self, key: CopyKey, value: impl Into<String>) {
        self.canvas_copy.set(key, value);
    }

    /// Merges a decoded update into the document.
    ///
    /// Populated top-level fields overwrite; canvas copy is merged key by
    /// key. Applying the same update twice leaves the same document as
    /// applying it once. Returns the number of fields written.
    pub fn apply_update(&mut self, update: &ParsedUpdate) -> usize {
        for (field, value) in update.fields() {
            self.set_field(field, value);
        }
        self.canvas_copy.merge(&update.canvas_copy);
        update.len()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == id)
    }

    /// Appends the standard "New Section" placeholder.
    pub fn add_section(&mut self) -> SectionId {
        self.push_section(NEW_SECTION_TITLE, NEW_SECTION_CONTENT)
    }

    /// Appends a section under a freshly generated id.
    pub fn push_section(&mut self, title: impl Into<String>, content: impl Into<String>) -> SectionId {
        let id = SectionId::generate();
        self.sections.push(Section::new(id.clone(), title, content));
        id
    }

    /// Inserts a section with a caller-chosen id. Rejected if the id is taken.
    pub(crate) fn push_section_with_id(&mut self, section: Section) -> bool {
        if self.section(section.id()).is_some() {
            return false;
        }
        self.sections.push(section);
        true
    }

    /// Removes a section. Unknown ids are ignored.
    pub fn remove_section(&mut self, id: &SectionId) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id() != id);
        self.sections.len() != before
    }

    /// Applies a partial edit to a section. Unknown ids are ignored.
    pub fn update_section(&mut self, id: &SectionId, patch: SectionPatch) -> bool {
        let Some(section) = self.sections.iter_mut().find(|s| s.id() == id) else {
            return false;
        };
        if let Some(title) = patch.title {
            section.title = title;
        }
        if let Some(content) = patch.content {
            section.content = content;
        }
        true
    }

    /// Reorders sections to follow `order`.
    ///
    /// Sections missing from `order` keep their relative order after the
    /// listed ones; ids in `order` that are not sections are skipped.
    pub fn reorder_sections(&mut self, order: &[SectionId]) {
        let rank = |s: &Section| {
            order
                .iter()
                .position(|id| id == s.id())
                .unwrap_or(order.len())
        };
        // Stable sort keeps unlisted sections in place relative to each other
        self.sections.sort_by_key(rank);
    }
}
