//! Line-driven host for a set of synced editors.
//!
//! A [`Session`] plays the part of the UI layer: it owns one
//! [`SharedEditor`] and one [`ConfigCell`] per editor id, registers them with
//! a [`SyncRegistry`], and forwards every editor content change to the
//! matching controller, just as a widget's change event would.

mod command;

pub use command::{Command, FailMode, HELP};

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow};

use crate::config::ConfigFlags;
use crate::editor::{ListenerId, SharedEditor};
use crate::reactive::ConfigCell;
use crate::sync::{SyncEntry, SyncRegistry};

struct Pane {
    editor: SharedEditor,
    config: ConfigCell,
    listener: Option<ListenerId>,
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Session {
    flags: ConfigFlags,
    registry: SyncRegistry,
    panes: BTreeMap<String, Pane>,
}

impl Session {
    /// Create a session with one attached editor per configured id.
    pub fn new(flags: ConfigFlags) -> Self {
        let mut session = Self {
            registry: SyncRegistry::default(),
            panes: BTreeMap::new(),
            flags,
        };
        for id in session.flags.editor_ids() {
            session.attach(&id);
        }
        session
    }

    pub const fn registry(&self) -> &SyncRegistry {
        &self.registry
    }

    pub fn editor(&self, id: &str) -> Option<&SharedEditor> {
        self.panes.get(id).map(|p| &p.editor)
    }

    pub fn config(&self, id: &str) -> Option<&ConfigCell> {
        self.panes.get(id).map(|p| &p.config)
    }

    /// Parse and execute one input line.
    ///
    /// # Errors
    /// Returns an error for malformed lines or unknown editor ids.
    pub fn execute_line(&mut self, line: &str) -> Result<Option<Reply>> {
        match Command::parse(line)? {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        }
    }

    /// # Errors
    /// Returns an error when the command names an editor that does not exist.
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        let text = match command {
            Command::Edit { id, text } => {
                self.pane(&id)?.editor.replace(&text);
                self.describe(&id)?
            }
            Command::Type { id, text } => {
                self.pane(&id)?.editor.type_text(&text);
                self.describe(&id)?
            }
            Command::Backspace { id } => {
                self.pane(&id)?.editor.backspace();
                self.describe(&id)?
            }
            Command::Set { id, text } => {
                self.pane(&id)?.config.set(text);
                self.describe(&id)?
            }
            Command::Show { id: Some(id) } => self.describe(&id)?,
            Command::Show { id: None } => self.describe_all(),
            Command::Trigger { id } => {
                self.pane(&id)?;
                match self.registry.trigger(&id) {
                    Some(outcome) => format!("{id}: {outcome}"),
                    None => format!("{id}: not attached"),
                }
            }
            Command::ToConfig { id } => self.push(id, true)?,
            Command::ToEditor { id } => self.push(id, false)?,
            Command::Attach { id } => {
                self.attach(&id);
                self.describe(&id)?
            }
            Command::Dispose { id } => {
                let controller = self
                    .registry
                    .get(&id)
                    .ok_or_else(|| anyhow!("editor '{id}' is not attached"))?;
                controller.dispose();
                self.describe(&id)?
            }
            Command::DisposeAll => {
                self.registry.dispose_all();
                for pane in self.panes.values_mut() {
                    if let Some(listener) = pane.listener.take() {
                        pane.editor.remove_listener(listener);
                    }
                }
                "all controllers disposed".to_string()
            }
            Command::Fail { id, mode } => {
                let pane = self.pane(&id)?;
                pane.editor.set_fail_reads(mode == FailMode::Read);
                pane.editor.set_fail_writes(mode == FailMode::Write);
                format!("{id}: failure mode {mode:?}")
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    /// Run commands from `input` until it ends or a `quit` is read.
    ///
    /// Command errors are written to `out` and do not stop the run.
    ///
    /// # Errors
    /// Returns an error if reading `input` or writing `out` fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            match self.execute_line(&line) {
                Ok(Some(Reply::Text(text))) => writeln!(out, "{text}")?,
                Ok(Some(Reply::Quit)) => break,
                Ok(None) => {}
                Err(err) => writeln!(out, "error: {err:#}")?,
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Register a controller for `id`, creating the pane on first use.
    ///
    /// Re-attaching replaces the previous controller.
    fn attach(&mut self, id: &str) {
        let pane = self.panes.entry(id.to_string()).or_insert_with(|| Pane {
            editor: SharedEditor::new(""),
            config: ConfigCell::default(),
            listener: None,
        });
        if let Some(listener) = pane.listener.take() {
            pane.editor.remove_listener(listener);
        }

        let entry = SyncEntry::new(id, pane.editor.clone(), pane.config.clone())
            .with_options(self.flags.sync_options(id));
        let controller = self.registry.register(entry);

        let weak = controller.downgrade();
        pane.listener = Some(pane.editor.on_change(move || {
            if let Some(controller) = weak.upgrade() {
                controller.on_editor_change();
            }
        }));
        tracing::debug!(target: "mirrorsync::session", id, "editor attached");
    }

    fn push(&self, id: Option<String>, to_config: bool) -> Result<String> {
        let outcomes = match id {
            Some(id) => {
                self.pane(&id)?;
                let controller = self
                    .registry
                    .get(&id)
                    .ok_or_else(|| anyhow!("editor '{id}' is not attached"))?;
                let outcome = if to_config {
                    controller.sync_to_config()
                } else {
                    controller.sync_to_editor()
                };
                vec![(id, outcome)]
            }
            None if to_config => self.registry.sync_all_to_config(),
            None => self.registry.sync_all_to_editor(),
        };
        let mut text = String::new();
        for (id, outcome) in outcomes {
            let _ = writeln!(text, "{id}: {outcome}");
        }
        Ok(text.trim_end().to_string())
    }

    fn pane(&self, id: &str) -> Result<&Pane> {
        self.panes
            .get(id)
            .ok_or_else(|| anyhow!("no editor named '{id}'"))
    }

    fn describe(&self, id: &str) -> Result<String> {
        let pane = self.pane(id)?;
        let editor = pane.editor.text();
        let config = pane.config.get();
        let state = match self.registry.get(id) {
            Some(c) if c.is_active() => "active",
            Some(_) => "disposed",
            None => "detached",
        };
        let sync = if editor == config { "in sync" } else { "diverged" };
        Ok(format!(
            "{id}: editor={editor:?} config={config:?} [{sync}, {state}]"
        ))
    }

    fn describe_all(&self) -> String {
        if self.panes.is_empty() {
            return "no editors".to_string();
        }
        self.panes
            .keys()
            .filter_map(|id| self.describe(id).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("flags", &self.flags)
            .field("registry", &self.registry)
            .field("editors", &self.panes.keys().collect::<Vec<_>>())
            .finish()
    }
}
