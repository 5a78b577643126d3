//! Splitting a model reply into chat text and a content update.
//!
//! The contract with the model is a marker line:
//!
//! ```text
//! Done! I switched the site to a medical theme.
//! APPLY_JSON: {"title": "Dr. Ayushi", "footerText": "Dr. Ayushi Clinic"}
//! ```
//!
//! Everything before the last marker is conversation. The payload after it
//! may be wrapped in a code fence and surrounded by more prose. Failures to
//! find or decode the object are not errors: the reply simply carries no
//! update.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::extract::extract_object;
use super::keys::{CopyKey, Field};
use crate::content::ParsedUpdate;

/// Marker the prompt asks the model to emit before its JSON object.
pub const DEFAULT_MARKER: &str = "APPLY_JSON:";

/// A reply split into what the user reads and what the canvas applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedReply {
    pub clean_text: String,
    pub update: ParsedUpdate,
}

/// Splits `text` at the last occurrence of `marker` and decodes the payload.
///
/// Without a marker the whole trimmed text is conversation and the update is
/// empty. The last occurrence governs so that a model echoing the
/// instructions before its answer is not misread.
pub fn decode_reply(text: &str, marker: &str) -> DecodedReply {
    let found = if marker.is_empty() {
        None
    } else {
        text.rfind(marker)
    };
    let Some(idx) = found else {
        return DecodedReply {
            clean_text: text.trim().to_string(),
            update: ParsedUpdate::default(),
        };
    };

    let payload = strip_code_fence(&text[idx + marker.len()..]);
    let update = match extract_object(payload, 0) {
        Some(object) => decode_update(object),
        None => {
            log::debug!("marker present but no balanced object follows it");
            ParsedUpdate::default()
        }
    };

    DecodedReply {
        clean_text: text[..idx].trim().to_string(),
        update,
    }
}

/// Decodes a JSON object and projects it onto the allow-list.
///
/// Unknown keys and non-string values are dropped one by one; the rest of the
/// object still applies. Anything that is not a JSON object decodes to an
/// empty update.
pub fn decode_update(object: &str) -> ParsedUpdate {
    match serde_json::from_str::<Value>(object) {
        Ok(Value::Object(map)) => project(&map),
        Ok(other) => {
            log::debug!("update payload is not an object: {other}");
            ParsedUpdate::default()
        }
        Err(e) => {
            log::debug!("discarding malformed update payload: {e}");
            ParsedUpdate::default()
        }
    }
}

fn project(map: &Map<String, Value>) -> ParsedUpdate {
    let mut update = ParsedUpdate::default();

    for (name, value) in map {
        let Some(text) = value.as_str() else {
            log::debug!("dropping key {name}: value is not a string");
            continue;
        };
        if let Some(field) = Field::from_wire(name) {
            update.set_field(field, text);
        } else if let Ok(key) = name.parse::<CopyKey>() {
            update.canvas_copy.insert(key, text.to_string());
        } else {
            log::debug!("dropping key {name}: not in the allow-list");
        }
    }

    update
}

/// Removes a surrounding code fence (three backticks with an optional
/// language tag) from the payload.
fn strip_code_fence(payload: &str) -> &str {
    static OPEN_FENCE: OnceLock<Regex> = OnceLock::new();
    static CLOSE_FENCE: OnceLock<Regex> = OnceLock::new();
    let open = OPEN_FENCE
        .get_or_init(|| Regex::new(r"^\s*```[A-Za-z0-9_+-]*[ \t]*").expect("Invalid fence regex"));
    let close =
        CLOSE_FENCE.get_or_init(|| Regex::new(r"\s*```\s*$").expect("Invalid fence regex"));

    let body = match open.find(payload) {
        Some(m) => &payload[m.end()..],
        None => payload,
    };
    match close.find(body) {
        Some(m) => &body[..m.start()],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn decode(text: &str) -> DecodedReply {
        decode_reply(text, DEFAULT_MARKER)
    }

    #[test]
    fn reply_without_marker_is_all_text() {
        let reply = decode("  Sure, what colour would you like?\n");
        assert_eq!(reply.clean_text, "Sure, what colour would you like?");
        assert!(reply.update.is_empty());
    }

    #[test]
    fn splits_text_and_update() {
        let reply = decode("Done! \nAPPLY_JSON: {\"title\": \"Dr. Ayushi\"}");
        assert_eq!(reply.clean_text, "Done!");
        assert_eq!(
            reply.update,
            ParsedUpdate::new().with_field(Field::Title, "Dr. Ayushi")
        );
    }

    #[test]
    fn braces_and_escaped_quotes_inside_values_survive() {
        let reply = decode(r#"Ok. APPLY_JSON: {"footerText": "Say \"hi\" {here}"}"#);
        assert_eq!(
            reply.update.canvas_copy.get(&CopyKey::FooterText).map(String::as_str),
            Some(r#"Say "hi" {here}"#)
        );
    }

    #[test]
    fn last_marker_wins() {
        let text = "You asked me to write APPLY_JSON: {\"title\": \"Echo\"}\n\
                    Here it is.\nAPPLY_JSON: {\"title\": \"Real\"}";
        let reply = decode(text);
        assert_eq!(reply.update.field(Field::Title), Some("Real"));
        assert!(reply.clean_text.ends_with("Here it is."));
        assert!(reply.clean_text.contains("Echo"));
    }

    #[rstest]
    #[case::json_fence("APPLY_JSON:\n```json\n{\"heroHeading\": \"Hi\"}\n```")]
    #[case::bare_fence("APPLY_JSON:\n```\n{\"heroHeading\": \"Hi\"}\n```\n")]
    #[case::uppercase_tag("APPLY_JSON: ```JSON {\"heroHeading\": \"Hi\"} ```")]
    #[case::prose_after("APPLY_JSON: {\"heroHeading\": \"Hi\"}\nLet me know!")]
    #[case::multiline("APPLY_JSON:\n{\n  \"heroHeading\": \"Hi\"\n}")]
    fn payload_wrapping_is_tolerated(#[case] text: &str) {
        let reply = decode(text);
        assert_eq!(reply.update.field(Field::HeroHeading), Some("Hi"));
        assert_eq!(reply.clean_text, "");
    }

    #[rstest]
    #[case::no_object("Done.\nAPPLY_JSON: nothing to change")]
    #[case::truncated("Done.\nAPPLY_JSON: {\"title\": \"Dr")]
    #[case::single_quotes("Done.\nAPPLY_JSON: {'title': 'Dr'}")]
    #[case::trailing_comma("Done.\nAPPLY_JSON: {\"title\": \"Dr\",}")]
    fn malformed_payload_yields_empty_update(#[case] text: &str) {
        let reply = decode(text);
        assert_eq!(reply.clean_text, "Done.");
        assert!(reply.update.is_empty());
    }

    #[test]
    fn unknown_keys_and_non_strings_are_dropped() {
        let reply = decode(
            r#"APPLY_JSON: {"title": "T", "heroHeading": 42, "work1Title": "W",
                "work9Title": "nope", "__proto__": "x", "exp1Role": null,
                "contactHeading": ["a"], "sections": []}"#,
        );
        assert_eq!(
            reply.update,
            ParsedUpdate::new()
                .with_field(Field::Title, "T")
                .with_copy(CopyKey::Work1Title, "W")
        );
    }

    #[test]
    fn only_unknown_keys_means_no_update() {
        let reply = decode(r#"Hi APPLY_JSON: {"colour": "red"}"#);
        assert!(reply.update.is_empty());
    }

    #[test]
    fn custom_marker() {
        let reply = decode_reply("ok\n@@PATCH {\"heroJumboText\": \"J\"}", "@@PATCH");
        assert_eq!(reply.clean_text, "ok");
        assert_eq!(reply.update.field(Field::HeroJumboText), Some("J"));
    }

    #[test]
    fn empty_marker_never_matches() {
        let reply = decode_reply(" text {\"title\": \"x\"} ", "");
        assert_eq!(reply.clean_text, "text {\"title\": \"x\"}");
        assert!(reply.update.is_empty());
    }

    #[test]
    fn decode_update_rejects_non_objects() {
        assert!(decode_update("[1, 2]").is_empty());
        assert!(decode_update("\"title\"").is_empty());
    }
}
