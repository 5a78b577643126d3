pub mod canvas;
pub mod content;
pub mod protocol;
pub mod session;

// Re-export key types for easier usage
pub use canvas::{CanvasCmd, CanvasState, Change, EditorNode, NavTree, StyleOverride};
pub use content::{ContentDocument, ParsedUpdate, Section, SectionId, SectionPatch};
pub use protocol::{CopyKey, DEFAULT_MARKER, Field, build_prompt, decode_reply, extract_object};
pub use session::{
    ChatId, CompletionError, CompletionProvider, OfflineProvider, SiteBuilder, SubmitError,
    TurnOutcome,
};
