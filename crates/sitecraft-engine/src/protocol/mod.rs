//! # Reply Protocol
//!
//! How the builder talks to a language model that only produces free text.
//!
//! ```text
//! instruction + document ──build_prompt──▶ model ──reply──▶ decode_reply
//!                                                              │
//!                                   extract_object ◀───────────┘
//!                                          │
//!                               allow-list projection ──▶ ParsedUpdate
//! ```
//!
//! - **`keys`**: the closed set of keys a reply may use (`Field`, `CopyKey`)
//! - **`extract`**: quote-aware scan for one balanced `{ ... }` object
//! - **`reply`**: marker split, fence stripping and decoding
//! - **`prompt`**: the instruction string that states the contract

pub mod extract;
pub mod keys;
pub mod prompt;
pub mod reply;

pub use extract::extract_object;
pub use keys::{CopyKey, Field, UnknownCopyKey, allowed_keys};
pub use prompt::build_prompt;
pub use reply::{DEFAULT_MARKER, DecodedReply, decode_reply, decode_update};
