//! Seeding a [`ContentDocument`] from the build prompt.
//!
//! The prompt is split into non-blank lines:
//!
//! ```text
//! Jane Lo                      -> title (max 50 chars)
//! Product designer in SF       -> hero heading (max 60 chars)
//! Case studies                 -> hero description (all remaining lines,
//! Three years of fintech work     joined, max 300 chars)
//! ```
//!
//! With more than three lines, the lines after the hero heading are also read
//! as `title / body` pairs and each pair becomes a section. Otherwise two
//! generic sections are created.

use super::document::{ContentDocument, Section, SectionId};

pub const TITLE_MAX_CHARS: usize = 50;
pub const HERO_HEADING_MAX_CHARS: usize = 60;
pub const HERO_DESCRIPTION_MAX_CHARS: usize = 300;

const DEFAULT_TITLE: &str = "My Website";
const DEFAULT_HERO_HEADING: &str = "Welcome";
const DEFAULT_HERO_DESCRIPTION: &str = "Describe your website here.";

impl ContentDocument {
    /// The document shown for an empty prompt: placeholder copy and two
    /// starter sections with fixed ids.
    pub fn starter() -> Self {
        let mut doc = Self::new(DEFAULT_TITLE, DEFAULT_HERO_HEADING, DEFAULT_HERO_DESCRIPTION);
        doc.push_section_with_id(Section::new(
            SectionId::from("section-1"),
            "About",
            "Add your content here.",
        ));
        doc.push_section_with_id(Section::new(
            SectionId::from("section-2"),
            "Services",
            "Add your services or features here.",
        ));
        doc
    }

    /// Builds a document from a free-text description of the site.
    pub fn from_prompt(prompt: &str) -> Self {
        let lines: Vec<&str> = prompt
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return Self::starter();
        }

        let title = lines[0];
        let hero_heading = lines.get(1).copied().unwrap_or(DEFAULT_HERO_HEADING);
        let rest = match lines.get(2..) {
            Some(tail) if !tail.is_empty() => tail.join(" "),
            _ => DEFAULT_HERO_DESCRIPTION.to_string(),
        };

        let mut doc = Self::new(
            truncate_chars(title, TITLE_MAX_CHARS),
            truncate_chars(hero_heading, HERO_HEADING_MAX_CHARS),
            truncate_chars(&rest, HERO_DESCRIPTION_MAX_CHARS),
        );

        if lines.len() > 3 {
            for pair in lines[2..].chunks(2) {
                doc.push_section(pair[0], pair.get(1).copied().unwrap_or(""));
            }
        } else {
            doc.push_section("About", rest);
            doc.push_section("More", "You can edit all sections manually.");
        }

        doc
    }
}

impl Default for ContentDocument {
    fn default() -> Self {
        Self::starter()
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section_pairs(doc: &ContentDocument) -> Vec<(&str, &str)> {
        doc.sections()
            .iter()
            .map(|s| (s.title.as_str(), s.content.as_str()))
            .collect()
    }

    #[test]
    fn blank_prompt_gives_starter() {
        let doc = ContentDocument::from_prompt("   \n\n  ");
        assert_eq!(doc, ContentDocument::starter());
        assert_eq!(doc.title(), "My Website");
        let ids: Vec<_> = doc.sections().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, vec!["section-1", "section-2"]);
    }

    #[test]
    fn single_line_prompt_uses_defaults_and_fallback_sections() {
        let doc = ContentDocument::from_prompt("Portfolio - Jane Lo, Product Designer");
        assert_eq!(doc.title(), "Portfolio - Jane Lo, Product Designer");
        assert_eq!(doc.hero_heading(), "Welcome");
        assert_eq!(doc.hero_description(), "Describe your website here.");
        assert_eq!(
            section_pairs(&doc),
            vec![
                ("About", "Describe your website here."),
                ("More", "You can edit all sections manually."),
            ]
        );
    }

    #[test]
    fn three_lines_fill_hero_without_pairing() {
        let doc = ContentDocument::from_prompt("Jane Lo\nDesigner\nI build things");
        assert_eq!(doc.hero_heading(), "Designer");
        assert_eq!(doc.hero_description(), "I build things");
        assert_eq!(section_pairs(&doc)[0], ("About", "I build things"));
        assert_eq!(doc.sections().len(), 2);
    }

    #[test]
    fn line_pairs_become_sections() {
        let prompt = "Jane Lo\n\n  Designer  \nWork\nCase studies\nContact\nSay hello\nOrphan";
        let doc = ContentDocument::from_prompt(prompt);

        assert_eq!(doc.hero_heading(), "Designer");
        assert_eq!(
            doc.hero_description(),
            "Work Case studies Contact Say hello Orphan"
        );
        assert_eq!(
            section_pairs(&doc),
            vec![
                ("Work", "Case studies"),
                ("Contact", "Say hello"),
                ("Orphan", ""),
            ]
        );
    }

    #[test]
    fn long_lines_are_truncated_by_chars() {
        let title = "é".repeat(80);
        let heading = "h".repeat(100);
        let doc = ContentDocument::from_prompt(&format!("{title}\n{heading}\n{}", "d".repeat(400)));

        assert_eq!(doc.title().chars().count(), TITLE_MAX_CHARS);
        assert_eq!(doc.hero_heading().len(), HERO_HEADING_MAX_CHARS);
        assert_eq!(doc.hero_description().len(), HERO_DESCRIPTION_MAX_CHARS);
        // Fallback "About" section keeps the untruncated description
        assert_eq!(doc.sections()[0].content.len(), 400);
    }

    #[test]
    fn seeded_section_ids_are_unique() {
        let doc = ContentDocument::from_prompt("a\nb\nc\nd\ne\nf");
        let mut ids: Vec<_> = doc.sections().iter().map(|s| s.id().clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 2);
    }
}
