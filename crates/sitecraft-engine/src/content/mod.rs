//! # Content Document
//!
//! The structured copy of the site being built: top-level hero fields, the
//! allow-listed canvas copy, and the ordered list of user sections.
//!
//! - **`document`**: `ContentDocument`, `CanvasCopy`, `Section`, `SectionId`
//! - **`update`**: `ParsedUpdate`, the sparse patch decoded from a reply
//! - **`seed`**: building the initial document from a prompt

pub mod document;
pub mod seed;
pub mod update;

pub use document::{
    CanvasCopy, ContentDocument, DEFAULT_JUMBO_TEXT, Section, SectionId, SectionPatch,
};
pub use update::ParsedUpdate;
