use std::fmt::Write;

use super::keys::{CopyKey, Field, allowed_keys};
use crate::content::ContentDocument;

/// Copy keys a whole-site or theme request must rewrite, besides the four
/// top-level fields and every experience entry and work item.
const BROAD_COPY_KEYS: &[CopyKey] = &[
    CopyKey::ExperienceHeading,
    CopyKey::ExperienceParagraph,
    CopyKey::ContactHeading,
    CopyKey::ContactSubheading,
    CopyKey::ContactParagraph,
    CopyKey::FooterText,
];

const EXAMPLE_REQUEST: &str = "change the name to Dr. Ayushi and give the site a medical theme";
const EXAMPLE_OBJECT: &str = r#"{"title": "Dr. Ayushi", "heroHeading": "Welcome to Your Health", "heroDescription": "Caring for you and your family.", "heroJumboText": "I am Dr. Ayushi, your healthcare partner.", "experienceHeading": "My Medical Experience", "experienceParagraph": "Years of experience in patient care.", "contactHeading": "Book a visit", "footerText": "Dr. Ayushi Clinic"}"#;

/// Builds the instruction string sent to the model for one turn.
///
/// With a document, the prompt lists every field's current value, states the
/// marker contract, the closed key set, the minimum key set for whole-site
/// requests, and ends with a worked example. Without a document the
/// instruction is passed through unchanged.
pub fn build_prompt(instruction: &str, current: Option<&ContentDocument>, marker: &str) -> String {
    let Some(doc) = current else {
        return instruction.to_string();
    };

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_prompt(&mut out, instruction, doc, marker);
    out
}

fn write_prompt(
    out: &mut String,
    instruction: &str,
    doc: &ContentDocument,
    marker: &str,
) -> std::fmt::Result {
    writeln!(
        out,
        "You are a website editor. The live page next to this chat changes ONLY when your \
         reply contains {marker} followed by a JSON object with the new values. Prose alone \
         changes nothing: you MUST output the JSON to change the page."
    )?;
    writeln!(out)?;
    writeln!(out, "Current page content (exact keys for your JSON):")?;
    for field in Field::ALL {
        writeln!(out, "- {}: {}", field, quote(doc.field(*field)))?;
    }
    for key in CopyKey::ALL {
        writeln!(out, "- {}: {}", key, quote(doc.copy(*key)))?;
    }
    writeln!(out)?;
    writeln!(out, "User request: {instruction}")?;
    writeln!(out)?;
    writeln!(out, "RULES:")?;
    writeln!(
        out,
        "1. When the user renames the site owner, asks for a new theme, or asks to update \
         the whole website, {marker} MUST include new values for at least: {}. Never answer \
         such a request with only one or two keys.",
        broad_keys().collect::<Vec<_>>().join(", ")
    )?;
    writeln!(
        out,
        "2. Reply in one or two short sentences. Then, on a NEW LINE, write exactly {marker} \
         followed by a single JSON object and nothing else. Use only these keys: {}. Any \
         other key is ignored.",
        allowed_keys().collect::<Vec<_>>().join(", ")
    )?;
    write!(
        out,
        "3. Example. Request: \"{EXAMPLE_REQUEST}\". Answer:\n\
         Done! The site now presents Dr. Ayushi's practice.\n\
         {marker} {EXAMPLE_OBJECT}"
    )
}

/// Minimum key set for whole-site requests, in prompt order.
fn broad_keys() -> impl Iterator<Item = &'static str> {
    let entries = (1..=4).filter_map(CopyKey::experience_entry).flat_map(|(c, r, p)| [c, r, p]);
    let works = (1..=4).filter_map(CopyKey::work_item).flat_map(|(t, c)| [t, c]);
    Field::ALL
        .iter()
        .map(|f| f.as_str())
        .chain(BROAD_COPY_KEYS.iter().map(|k| k.as_str()))
        .chain(entries.chain(works).map(CopyKey::as_str))
}

/// Double-quotes a value, escaping what would break the quoted line.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
