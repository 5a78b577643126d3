//! # Editor Canvas
//!
//! The navigator tree the user clicks through and the editor state over it.
//! Scaffold nodes are fixed; section nodes mirror the document's sections.
//! All edits go through `CanvasState::apply` so each one is a value that can
//! be tested on its own.
//!
//! - **`tree`**: `NavTree` and `EditorNode`
//! - **`alias`**: hotspot ids that select another node
//! - **`style`**: sparse per-node style overrides
//! - **`state`**: `CanvasState`, `CanvasCmd` and the resulting `Change`

pub mod alias;
pub mod state;
pub mod style;
pub mod tree;

pub use alias::AliasTable;
pub use state::{CanvasCmd, CanvasState, Change};
pub use style::{Display, Overflow, Position, ResolvedStyle, StyleOverride, TextAlign};
pub use tree::{BODY_ID, EditorNode, NavTree, NodeKind, SECTION_LABEL};
