use std::collections::BTreeMap;
use thiserror::Error;

use super::chat::{ChatId, ChatMessage, ChatThread, Role, TurnId};
use super::provider::{CompletionError, CompletionProvider};
use crate::canvas::{BODY_ID, CanvasCmd, CanvasState, Change, NavTree, StyleOverride};
use crate::content::{ContentDocument, SectionId, SectionPatch};
use crate::protocol::{CopyKey, DEFAULT_MARKER, Field, build_prompt, decode_reply};

/// Chat text used when the model returns nothing.
pub const EMPTY_REPLY_TEXT: &str = "(No response from model.)";

/// Why a turn could not be started.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("instruction is empty")]
    EmptyInstruction,

    #[error("{0} is still waiting for a reply")]
    TurnInFlight(ChatId),

    #[error("no chat with id {0}")]
    UnknownChat(ChatId),
}

/// A turn that has been started and awaits its reply.
///
/// Not `Clone`: each turn settles exactly once through
/// [`SiteBuilder::finish_turn`].
#[derive(Debug)]
#[must_use = "a started turn keeps its chat pending until it is finished"]
pub struct PendingTurn {
    chat: ChatId,
    turn: TurnId,
    generation: u64,
    prompt: String,
}

impl PendingTurn {
    pub fn chat(&self) -> ChatId {
        self.chat
    }

    /// The full instruction string to send to the provider.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// How a turn settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied {
        /// Chat text shown to the user.
        text: String,
        /// Number of fields written to the document.
        applied: usize,
        /// The reply arrived after a new build had started; its update was
        /// not applied.
        stale: bool,
    },
    Failed {
        message: String,
        configuration: bool,
    },
}

/// The website builder session: the document, the canvas over it and the
/// chats that edit it.
#[derive(Debug)]
pub struct SiteBuilder {
    marker: String,
    document: Option<ContentDocument>,
    canvas: CanvasState,
    chats: BTreeMap<ChatId, ChatThread>,
    next_chat: u64,
    next_turn: u64,
    generation: u64,
}

impl SiteBuilder {
    pub fn new(marker: impl Into<String>) -> Self {
        let mut builder = Self {
            marker: marker.into(),
            document: None,
            canvas: CanvasState::new(NavTree::scaffold()),
            chats: BTreeMap::new(),
            next_chat: 0,
            next_turn: 0,
            generation: 0,
        };
        builder.open_chat();
        builder
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Starts a build from `prompt`, replacing the current document and
    /// canvas. Chats are kept.
    pub fn build(&mut self, prompt: &str) -> &ContentDocument {
        let doc = ContentDocument::from_prompt(prompt);
        self.generation += 1;
        log::info!(
            "build {} started: {:?} with {} sections",
            self.generation,
            doc.title(),
            doc.sections().len()
        );
        self.canvas = CanvasState::for_document(&doc);
        self.document.insert(doc)
    }

    /// Discards the current document so the next build starts fresh.
    pub fn build_new(&mut self) {
        self.generation += 1;
        self.document = None;
        self.canvas = CanvasState::new(NavTree::scaffold());
        log::info!("build {} cleared", self.generation);
    }

    pub fn current_document(&self) -> Option<&ContentDocument> {
        self.document.as_ref()
    }

    pub fn current_tree(&self) -> &NavTree {
        self.canvas.tree()
    }

    pub fn selection(&self) -> Option<&str> {
        self.canvas.selection()
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    // Document edits. Each returns false when there is no document or the
    // target does not exist.

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        doc.set_field(field, value);
        true
    }

    pub fn set_copy(&mut self, key: CopyKey, value: impl Into<String>) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        doc.set_copy(key, value);
        true
    }

    pub fn add_section(&mut self) -> Option<SectionId> {
        let doc = self.document.as_mut()?;
        let id = doc.add_section();
        self.canvas.sync_sections(doc);
        Some(id)
    }

    pub fn remove_section(&mut self, id: &SectionId) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        if !doc.remove_section(id) {
            return false;
        }
        self.canvas.forget(id.as_str());
        self.canvas.sync_sections(doc);
        true
    }

    pub fn update_section(&mut self, id: &SectionId, patch: SectionPatch) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        if !doc.update_section(id, patch) {
            return false;
        }
        self.canvas.sync_sections(doc);
        true
    }

    // Canvas edits

    /// Applies a canvas command. Reordering the body's children also moves
    /// the document's sections so both stay in the same order.
    pub fn dispatch(&mut self, cmd: CanvasCmd) -> Option<Change> {
        let change = self.canvas.apply(cmd)?;
        if let Change::Structure { parent } = &change
            && parent == BODY_ID
            && let Some(doc) = self.document.as_mut()
        {
            doc.reorder_sections(&self.canvas.tree().section_order());
            self.canvas.sync_sections(doc);
        }
        Some(change)
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.dispatch(CanvasCmd::Select(id.into()));
    }

    pub fn clear_selection(&mut self) {
        self.dispatch(CanvasCmd::ClearSelection);
    }

    pub fn toggle_expand(&mut self, id: impl Into<String>) {
        self.dispatch(CanvasCmd::ToggleExpand(id.into()));
    }

    pub fn reorder_children(&mut self, parent: &str, from: usize, to: usize) -> bool {
        self.dispatch(CanvasCmd::Reorder {
            parent: parent.to_string(),
            from,
            to,
        })
        .is_some()
    }

    pub fn rename(&mut self, id: &str, label: &str) -> bool {
        self.dispatch(CanvasCmd::Rename {
            id: id.to_string(),
            label: label.to_string(),
        })
        .is_some()
    }

    pub fn set_style(&mut self, id: &str, style: StyleOverride) -> bool {
        self.dispatch(CanvasCmd::SetStyle {
            id: id.to_string(),
            style,
        })
        .is_some()
    }

    // Chats

    pub fn open_chat(&mut self) -> ChatId {
        self.next_chat += 1;
        let id = ChatId(self.next_chat);
        self.chats.insert(id, ChatThread::new(id));
        id
    }

    pub fn chat(&self, id: ChatId) -> Option<&ChatThread> {
        self.chats.get(&id)
    }

    pub fn chats(&self) -> impl Iterator<Item = &ChatThread> {
        self.chats.values()
    }

    /// Starts a turn in `chat`: records the user's message, marks the chat
    /// pending and serializes the prompt against the current document.
    pub fn begin_turn(&mut self, chat: ChatId, instruction: &str) -> Result<PendingTurn, SubmitError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(SubmitError::EmptyInstruction);
        }
        let thread = self
            .chats
            .get_mut(&chat)
            .ok_or(SubmitError::UnknownChat(chat))?;
        if thread.is_pending() {
            return Err(SubmitError::TurnInFlight(chat));
        }

        self.next_turn += 1;
        let turn = TurnId(self.next_turn);
        thread.start(turn, instruction);
        log::info!("{chat}: turn {} started", turn.0);

        Ok(PendingTurn {
            chat,
            turn,
            generation: self.generation,
            prompt: build_prompt(instruction, self.document.as_ref(), &self.marker),
        })
    }

    /// Settles a turn with the provider's result. The chat's pending flag is
    /// cleared on every path.
    pub fn finish_turn(
        &mut self,
        pending: PendingTurn,
        result: Result<String, CompletionError>,
    ) -> TurnOutcome {
        let (message, outcome) = match result {
            Ok(raw) => {
                let (text, applied, stale) = self.accept_reply(&raw, pending.generation);
                (
                    ChatMessage::new(Role::Assistant, text.clone()),
                    TurnOutcome::Replied {
                        text,
                        applied,
                        stale,
                    },
                )
            }
            Err(err) => {
                log::warn!("{}: turn {} failed: {err}", pending.chat, pending.turn.0);
                let message = err.to_string();
                (
                    ChatMessage::new(Role::Error, message.clone()),
                    TurnOutcome::Failed {
                        message,
                        configuration: err.is_configuration(),
                    },
                )
            }
        };

        if let Some(thread) = self.chats.get_mut(&pending.chat) {
            thread.settle(pending.turn, message);
        }
        outcome
    }

    /// Decodes a reply and applies its update if the turn is still current.
    fn accept_reply(&mut self, raw: &str, generation: u64) -> (String, usize, bool) {
        let raw = if raw.trim().is_empty() {
            EMPTY_REPLY_TEXT
        } else {
            raw
        };
        let reply = decode_reply(raw, &self.marker);
        let text = if reply.clean_text.is_empty() {
            raw.trim().to_string()
        } else {
            reply.clean_text
        };

        let stale = generation != self.generation;
        if reply.update.is_empty() {
            return (text, 0, stale);
        }
        if stale {
            log::info!(
                "discarding update from build {generation}; build {} is current",
                self.generation
            );
            return (text, 0, stale);
        }

        let applied = match self.document.as_mut() {
            Some(doc) => doc.apply_update(&reply.update),
            None => {
                log::debug!("reply carried an update but there is no document to apply it to");
                0
            }
        };
        if applied > 0 {
            log::info!("applied {applied} fields from reply");
        }
        (text, applied, stale)
    }

    /// Runs one whole turn against `provider`.
    pub fn submit(
        &mut self,
        chat: ChatId,
        instruction: &str,
        provider: &mut impl CompletionProvider,
    ) -> Result<TurnOutcome, SubmitError> {
        let pending = self.begin_turn(chat, instruction)?;
        log::debug!("sending prompt to {}", provider.name());
        let result = provider.complete(pending.prompt());
        Ok(self.finish_turn(pending, result))
    }

    /// The chat opened with the builder.
    pub fn default_chat(&self) -> ChatId {
        ChatId(1)
    }
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}
