use sitecraft_config::{Config, ProviderKind};
use sitecraft_engine::{CompletionError, CompletionProvider, OfflineProvider};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Line that ends a pasted reply.
pub const END_OF_REPLY: &str = ".";

/// The operator plays the model: the prompt is printed and the reply is read
/// back until a line containing only [`END_OF_REPLY`].
pub struct ManualProvider<'a> {
    input: &'a mut dyn BufRead,
    output: &'a mut dyn Write,
}

impl<'a> ManualProvider<'a> {
    pub fn new(input: &'a mut dyn BufRead, output: &'a mut dyn Write) -> Self {
        Self { input, output }
    }
}

impl CompletionProvider for ManualProvider<'_> {
    fn name(&self) -> &str {
        "manual"
    }

    fn complete(&mut self, prompt: &str) -> Result<String, CompletionError> {
        let io_err = |e: std::io::Error| CompletionError::Transport(e.to_string());

        writeln!(self.output, "----- prompt -----\n{prompt}\n------------------").map_err(io_err)?;
        writeln!(self.output, "Paste the reply, then a line with a single '{END_OF_REPLY}':")
            .map_err(io_err)?;
        self.output.flush().map_err(io_err)?;

        let mut reply = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line).map_err(io_err)? == 0 {
                break;
            }
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed == END_OF_REPLY {
                break;
            }
            reply.push(trimmed.to_string());
        }
        Ok(reply.join("\n"))
    }
}

/// Replays recorded replies, one `*.txt` file per turn in file name order.
#[derive(Debug)]
pub struct ReplayProvider {
    queue: VecDeque<PathBuf>,
}

impl ReplayProvider {
    pub fn from_dir(dir: &Path) -> std::io::Result<Self> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();
        log::info!("replaying {} replies from {}", files.len(), dir.display());
        Ok(Self {
            queue: files.into(),
        })
    }
}

impl CompletionProvider for ReplayProvider {
    fn name(&self) -> &str {
        "replay"
    }

    fn complete(&mut self, _prompt: &str) -> Result<String, CompletionError> {
        let path = self
            .queue
            .pop_front()
            .ok_or_else(|| CompletionError::Provider("no recorded replies left".to_string()))?;
        std::fs::read_to_string(&path)
            .map_err(|e| CompletionError::Transport(format!("{}: {e}", path.display())))
    }
}

/// The provider selected by the configuration.
pub enum Backend {
    Manual,
    Replay(ReplayProvider),
    Offline(OfflineProvider),
    /// Every turn fails with this configuration problem.
    Misconfigured(String),
}

impl Backend {
    pub fn from_config(config: &Config) -> Self {
        if let Err(e) = config.validate() {
            return Backend::Misconfigured(e.to_string());
        }
        match (config.provider, &config.replies_path) {
            (ProviderKind::Manual, _) => Backend::Manual,
            (ProviderKind::None, _) => Backend::Offline(OfflineProvider),
            (ProviderKind::Replay, Some(dir)) => match ReplayProvider::from_dir(dir) {
                Ok(replay) => Backend::Replay(replay),
                Err(e) => Backend::Misconfigured(format!(
                    "cannot read replies from {}: {e}",
                    dir.display()
                )),
            },
            (ProviderKind::Replay, None) => {
                Backend::Misconfigured("replay provider has no replies_path".to_string())
            }
        }
    }
}
