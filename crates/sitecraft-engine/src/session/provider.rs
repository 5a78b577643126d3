use thiserror::Error;

/// Notice returned by [`OfflineProvider`] for every prompt.
pub const NO_PROVIDER_NOTICE: &str =
    "No AI provider selected. Choose a provider in the configuration.";

/// Why a completion call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The collaborator is not set up, e.g. a missing credential.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, CompletionError::Configuration(_))
    }
}

/// A text-completion service: one instruction in, one reply out.
///
/// Implementations block until the reply is available. Callers that need
/// to keep working in the meantime split the turn with
/// `SiteBuilder::begin_turn` and `SiteBuilder::finish_turn`.
pub trait CompletionProvider {
    /// Short name for logs.
    fn name(&self) -> &str {
        "custom"
    }

    fn complete(&mut self, prompt: &str) -> Result<String, CompletionError>;
}

impl<F> CompletionProvider for F
where
    F: FnMut(&str) -> Result<String, CompletionError>,
{
    fn complete(&mut self, prompt: &str) -> Result<String, CompletionError> {
        self(prompt)
    }
}

/// Answers every prompt with [`NO_PROVIDER_NOTICE`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

impl CompletionProvider for OfflineProvider {
    fn name(&self) -> &str {
        "none"
    }

    fn complete(&mut self, _prompt: &str) -> Result<String, CompletionError> {
        Ok(NO_PROVIDER_NOTICE.to_string())
    }
}
