mod providers;

use anyhow::{Context, Result, anyhow, bail};
use providers::{Backend, ManualProvider};
use sitecraft_config::Config;
use sitecraft_engine::session::{Role, TurnOutcome};
use sitecraft_engine::{
    ChatId, CompletionError, SectionId, SiteBuilder, StyleOverride, build_prompt,
};
use std::env;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  :build <prompt>             start a new site (use \\n to separate lines)
  :new                        discard the current site
  :show                       print the content document as JSON
  :tree [json]                print the navigator, or dump it as JSON
  :select <id>                select a node
  :expand <id>                expand or collapse a node
  :rename <id> [label]        set a node label, or clear it
  :reorder <parent> <from> <to>
  :style <id> <json>          merge style properties, e.g. {\"marginTop\": 8}
  :add                        add a section
  :remove <id>                remove a section
  :chat                       open another chat and switch to it
  :chats                      list chats
  :history                    print the current chat as JSON
  :prompt <instruction>       print the prompt that would be sent
  :help                       show this help
  :quit
Anything else is sent to the current chat.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Build(String),
    New,
    Show,
    Tree { json: bool },
    Select(String),
    Expand(String),
    Rename { id: String, label: String },
    Reorder { parent: String, from: usize, to: usize },
    Style { id: String, json: String },
    Add,
    Remove(String),
    Chat,
    Chats,
    History,
    Prompt(String),
    Help,
    Quit,
    Say(String),
}

fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Say(line.to_string()));
    };
    let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let args = args.trim();

    let required = |what: &str| -> Result<String> {
        if args.is_empty() {
            bail!(":{name} needs {what}");
        }
        Ok(args.to_string())
    };

    let command = match name {
        "build" => Command::Build(args.replace("\\n", "\n")),
        "new" => Command::New,
        "show" => Command::Show,
        "tree" => match args {
            "" => Command::Tree { json: false },
            "json" => Command::Tree { json: true },
            other => bail!(":tree takes no argument or \"json\", not {other:?}"),
        },
        "select" => Command::Select(required("a node id")?),
        "expand" => Command::Expand(required("a node id")?),
        "rename" => {
            let (id, label) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
            if id.is_empty() {
                bail!(":rename needs a node id");
            }
            Command::Rename {
                id: id.to_string(),
                label: label.trim().to_string(),
            }
        }
        "reorder" => {
            let parts: Vec<&str> = args.split_whitespace().collect();
            let [parent, from, to] = parts.as_slice() else {
                bail!(":reorder needs <parent> <from> <to>");
            };
            Command::Reorder {
                parent: parent.to_string(),
                from: from.parse().context("<from> must be an index")?,
                to: to.parse().context("<to> must be an index")?,
            }
        }
        "style" => {
            let (id, json) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!(":style needs <id> <json>"))?;
            Command::Style {
                id: id.to_string(),
                json: json.trim().to_string(),
            }
        }
        "add" => Command::Add,
        "remove" => Command::Remove(required("a section id")?),
        "chat" => Command::Chat,
        "chats" => Command::Chats,
        "history" => Command::History,
        "prompt" => Command::Prompt(required("an instruction")?),
        "help" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => bail!("unknown command :{other} (try :help)"),
    };
    Ok(command)
}

struct App {
    builder: SiteBuilder,
    chat: ChatId,
    backend: Backend,
}

impl App {
    fn new(config: &Config) -> Self {
        let builder = SiteBuilder::new(config.marker.clone());
        let chat = builder.default_chat();
        Self {
            builder,
            chat,
            backend: Backend::from_config(config),
        }
    }

    /// Runs one command. Returns false when the session should end.
    fn execute(
        &mut self,
        command: Command,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<bool> {
        match command {
            Command::Build(prompt) => {
                let doc = self.builder.build(&prompt);
                writeln!(out, "Built \"{}\" with {} sections.", doc.title(), doc.sections().len())?;
            }
            Command::New => {
                self.builder.build_new();
                writeln!(out, "Cleared. Use :build to start again.")?;
            }
            Command::Show => match self.builder.current_document() {
                Some(doc) => writeln!(out, "{}", serde_json::to_string_pretty(doc)?)?,
                None => writeln!(out, "No site yet. Use :build.")?,
            },
            Command::Tree { json: true } => {
                writeln!(out, "{}", serde_json::to_string_pretty(self.builder.current_tree())?)?;
            }
            Command::Tree { json: false } => {
                let canvas = self.builder.canvas();
                write!(out, "{}", canvas.outline())?;
                writeln!(out, "{}", canvas.breadcrumb())?;
                if let Some(selected) = canvas.selection() {
                    for (name, value) in canvas.resolved_style(selected).css_declarations() {
                        writeln!(out, "  {name}: {value};")?;
                    }
                }
            }
            Command::Select(id) => {
                self.builder.select(id);
                writeln!(out, "{}", self.builder.canvas().breadcrumb())?;
            }
            Command::Expand(id) => self.builder.toggle_expand(id),
            Command::Rename { id, label } => {
                if !self.builder.rename(&id, &label) {
                    writeln!(out, "Nothing to rename.")?;
                }
            }
            Command::Reorder { parent, from, to } => {
                if !self.builder.reorder_children(&parent, from, to) {
                    writeln!(out, "Nothing moved.")?;
                }
            }
            Command::Style { id, json } => {
                let style: StyleOverride =
                    serde_json::from_str(&json).context("invalid style JSON")?;
                if !self.builder.set_style(&id, style) {
                    writeln!(out, "No node {id}.")?;
                }
            }
            Command::Add => match self.builder.add_section() {
                Some(id) => writeln!(out, "Added {id}.")?,
                None => writeln!(out, "No site yet. Use :build.")?,
            },
            Command::Remove(id) => {
                if !self.builder.remove_section(&SectionId::from(id.as_str())) {
                    writeln!(out, "No section {id}.")?;
                }
            }
            Command::Chat => {
                self.chat = self.builder.open_chat();
                writeln!(out, "Switched to {}.", self.chat)?;
            }
            Command::Chats => {
                for chat in self.builder.chats() {
                    let current = if chat.id() == self.chat { "*" } else { " " };
                    let pending = if chat.is_pending() { ", waiting" } else { "" };
                    writeln!(
                        out,
                        "{current} {}: {} messages{pending}",
                        chat.id(),
                        chat.messages().len()
                    )?;
                }
            }
            Command::History => match self.builder.chat(self.chat) {
                Some(chat) => writeln!(out, "{}", serde_json::to_string_pretty(chat)?)?,
                None => writeln!(out, "No chat {}.", self.chat)?,
            },
            Command::Prompt(instruction) => {
                let prompt = build_prompt(
                    &instruction,
                    self.builder.current_document(),
                    self.builder.marker(),
                );
                writeln!(out, "{prompt}")?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
            Command::Say(instruction) => self.say(&instruction, input, out)?,
        }
        Ok(true)
    }

    fn say(&mut self, instruction: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
        let result = match &mut self.backend {
            Backend::Manual => {
                let mut provider = ManualProvider::new(input, out);
                self.builder.submit(self.chat, instruction, &mut provider)
            }
            Backend::Replay(provider) => self.builder.submit(self.chat, instruction, provider),
            Backend::Offline(provider) => self.builder.submit(self.chat, instruction, provider),
            Backend::Misconfigured(reason) => {
                let reason = reason.clone();
                let mut failing = move |_: &str| -> Result<String, CompletionError> {
                    Err(CompletionError::Configuration(reason.clone()))
                };
                self.builder.submit(self.chat, instruction, &mut failing)
            }
        };

        match result {
            Ok(TurnOutcome::Replied {
                text,
                applied,
                stale,
            }) => {
                writeln!(out, "assistant: {text}")?;
                if stale {
                    writeln!(out, "(reply belonged to an earlier build; page not changed)")?;
                } else if applied > 0 {
                    writeln!(out, "(updated {applied} fields)")?;
                }
            }
            Ok(TurnOutcome::Failed {
                message,
                configuration,
            }) => {
                let kind = if configuration { "configuration" } else { "error" };
                writeln!(out, "{kind}: {message}")?;
            }
            Err(e) => writeln!(out, "{e}")?,
        }
        Ok(())
    }

    fn history(&self) -> usize {
        self.builder
            .chat(self.chat)
            .map(|chat| {
                chat.messages()
                    .iter()
                    .filter(|m| m.role == Role::User)
                    .count()
            })
            .unwrap_or(0)
    }
}

fn run(app: &mut App, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "[{} #{}] > ", app.chat, app.history() + 1)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e:#}")?;
                continue;
            }
        };
        match app.execute(command, input, out) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(e) => writeln!(out, "error: {e:#}")?,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(Some(config)) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        Ok(None) => {
            log::info!("No config at {}, using defaults", config_path.display());
            Config::default()
        }
        Err(e) => return Err(e).context("Failed to load config file"),
    };

    let mut app = App::new(&config);
    let prompt: Vec<String> = env::args().skip(1).collect();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    if !prompt.is_empty() {
        app.execute(Command::Build(prompt.join("\n")), &mut input, &mut out)?;
    }
    writeln!(out, "Type :help for commands.")?;
    run(&mut app, &mut input, &mut out)
}
