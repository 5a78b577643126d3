//! # Builder Session
//!
//! Ties the pieces together for a front end: a `SiteBuilder` owns the
//! current document and canvas, and runs chat turns against a
//! `CompletionProvider`.
//!
//! A turn is `begin_turn` (marks the chat pending and builds the prompt),
//! the provider call, then `finish_turn` (decodes the reply, applies the
//! update, clears the pending flag). `submit` does all three in one call.

pub mod builder;
pub mod chat;
pub mod provider;

pub use builder::{EMPTY_REPLY_TEXT, PendingTurn, SiteBuilder, SubmitError, TurnOutcome};
pub use chat::{ChatId, ChatMessage, ChatThread, Role};
pub use provider::{CompletionError, CompletionProvider, NO_PROVIDER_NOTICE, OfflineProvider};
