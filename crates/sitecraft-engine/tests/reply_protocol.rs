use pretty_assertions::assert_eq;
use rstest::rstest;
use sitecraft_engine::content::ContentDocument;
use sitecraft_engine::protocol::{
    CopyKey, DEFAULT_MARKER, Field, allowed_keys, decode_reply, extract_object,
};
use sitecraft_engine::{ParsedUpdate, build_prompt};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/replies/{name}.txt",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

#[test]
fn fenced_whole_site_update() {
    let reply = decode_reply(&fixture("medical_theme"), DEFAULT_MARKER);

    assert_eq!(
        reply.clean_text,
        "Done! The whole site now presents Dr. Ayushi's family practice."
    );
    assert_eq!(reply.update.len(), 15);
    assert_eq!(reply.update.field(Field::HeroJumboText), Some("I am Dr. Ayushi, your healthcare partner."));
    assert_eq!(
        reply.update.canvas_copy.get(&CopyKey::Exp1Period).map(String::as_str),
        Some("2012 - 2015")
    );
}

#[test]
fn echoed_marker_is_ignored() {
    let reply = decode_reply(&fixture("echoed_marker"), DEFAULT_MARKER);

    assert_eq!(reply.update.field(Field::Title), Some("Bakery Lane"));
    assert_eq!(reply.update.len(), 2);
    assert!(reply.clean_text.starts_with("You told me to answer with APPLY_JSON:"));
    assert!(reply.clean_text.ends_with("I kept the rest of the page as it was."));
}

#[test]
fn braces_and_quotes_inside_values() {
    let reply = decode_reply(&fixture("braces_in_values"), DEFAULT_MARKER);

    assert_eq!(reply.clean_text, "Updated the footer.");
    assert_eq!(
        reply.update,
        ParsedUpdate::new()
            .with_copy(CopyKey::FooterText, r#"Say "hi" {here}"#)
            .with_copy(CopyKey::ContactHeading, "Write to {us}")
    );
}

#[test]
fn hostile_keys_are_dropped_and_the_rest_applies() {
    let reply = decode_reply(&fixture("hostile_keys"), DEFAULT_MARKER);

    assert_eq!(
        reply.update,
        ParsedUpdate::new()
            .with_field(Field::Title, "Safe")
            .with_copy(CopyKey::SectionNew2Title, "Card Two")
    );
}

#[test]
fn truncated_payload_keeps_the_text() {
    let reply = decode_reply(&fixture("truncated"), DEFAULT_MARKER);
    assert_eq!(reply.clean_text, "Here is the new hero.");
    assert!(reply.update.is_empty());
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("Just chatting, no changes.")]
#[case("  {\"title\": \"looks like json\"}  ")]
#[case("apply_json: {\"title\": \"wrong case\"}")]
fn text_without_marker_is_returned_trimmed(#[case] text: &str) {
    let reply = decode_reply(text, DEFAULT_MARKER);
    assert_eq!(reply.clean_text, text.trim());
    assert!(reply.update.is_empty());
}

#[rstest]
#[case::plain(r#"{"title": "A"}"#)]
#[case::nested(r#"{"a": {"b": {"c": 1}}, "d": [1, {"e": 2}]}"#)]
#[case::braces_in_string(r#"{"footerText": "use {curly} braces }}"}"#)]
#[case::escaped_quotes(r#"{"t": "a \"quoted\" } word", "u": "\\"}"#)]
#[case::single_quoted(r#"{'k': 'it is } here'}"#)]
#[case::multiline("{\n  \"title\": \"A\",\n  \"x\": \"}\"\n}")]
fn extractor_finds_object_inside_prose(#[case] object: &str) {
    for (before, after) in [
        ("", ""),
        ("Sure thing! ", " Hope that helps."),
        ("No braces here.\n", "\n} stray closer"),
    ] {
        let text = format!("{before}{object}{after}");
        assert_eq!(extract_object(&text, 0), Some(object), "in {text:?}");
    }
}

#[test]
fn applying_an_update_twice_equals_applying_once() {
    let update = decode_reply(&fixture("medical_theme"), DEFAULT_MARKER).update;

    let mut once = ContentDocument::starter();
    once.apply_update(&update);
    let mut twice = once.clone();
    twice.apply_update(&update);

    assert_eq!(once, twice);
}

#[test]
fn merge_preserves_keys_not_named_in_the_update() {
    let mut doc = ContentDocument::starter();
    doc.set_copy(CopyKey::Work2Title, "Kept");
    doc.set_copy(CopyKey::FooterText, "Old footer");

    let update = ParsedUpdate::new().with_copy(CopyKey::FooterText, "New footer");
    doc.apply_update(&update);

    assert_eq!(doc.copy(CopyKey::Work2Title), "Kept");
    assert_eq!(doc.copy(CopyKey::FooterText), "New footer");
    assert_eq!(doc.title(), "My Website");
    assert_eq!(doc.canvas_copy().len(), 2);
}

#[test]
fn only_allow_listed_keys_ever_decode() {
    let allowed: Vec<&str> = allowed_keys().collect();
    let candidates = [
        "title",
        "heroJumboText",
        "work4Category",
        "work0Title",
        "exp5Role",
        "sectionNew4Title",
        "sectionNew5Title",
        "constructor",
        "Title",
        "footer_text",
        "",
    ];

    for key in candidates {
        let text = format!("ok {DEFAULT_MARKER} {{\"{key}\": \"v\"}}");
        let update = decode_reply(&text, DEFAULT_MARKER).update;
        let decoded: Vec<&str> = update
            .fields()
            .map(|(f, _)| f.as_str())
            .chain(update.canvas_copy.keys().map(|k| k.as_str()))
            .collect();

        if allowed.contains(&key) {
            assert_eq!(decoded, vec![key]);
        } else {
            assert!(decoded.is_empty(), "{key:?} leaked into {decoded:?}");
        }
    }
}

#[test]
fn prompt_round_trip_uses_current_values() {
    let mut doc = ContentDocument::from_prompt("Jane Lo\nProduct designer");
    let prompt = build_prompt("make it warmer", Some(&doc), DEFAULT_MARKER);
    assert!(prompt.contains(r#"- title: "Jane Lo""#));
    assert!(prompt.contains(r#"- heroHeading: "Product designer""#));

    let reply = decode_reply(
        "Warmer now.\nAPPLY_JSON: {\"heroHeading\": \"Designing with care\"}",
        DEFAULT_MARKER,
    );
    doc.apply_update(&reply.update);

    let prompt = build_prompt("again", Some(&doc), DEFAULT_MARKER);
    assert!(prompt.contains(r#"- heroHeading: "Designing with care""#));
}
