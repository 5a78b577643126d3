use std::collections::HashMap;
use std::sync::OnceLock;

/// Hotspots that select another node when clicked.
///
/// The hero's inner wrappers are rendered as separate hit areas but edit as
/// one logical section.
const ALIASES: &[(&str, &str)] = &[
    ("hero-container", "hero"),
    ("hero-intro", "hero"),
    ("hero-t-name", "hero"),
    ("hero-t-para", "hero"),
    ("hero-h1", "hero"),
];

/// Maps synthetic node ids to the canonical node they select.
#[derive(Debug)]
pub struct AliasTable {
    map: HashMap<&'static str, &'static str>,
}

impl AliasTable {
    /// The table used by the editor, built on first use.
    pub fn standard() -> &'static AliasTable {
        static TABLE: OnceLock<AliasTable> = OnceLock::new();
        TABLE.get_or_init(|| AliasTable {
            map: ALIASES.iter().copied().collect(),
        })
    }

    /// The canonical id for `id`; ids without an alias map to themselves.
    pub fn resolve<'a>(&self, id: &'a str) -> &'a str {
        self.map.get(id).copied().unwrap_or(id)
    }
}
