use anyhow::{Result, bail};

/// Which adapter call a pane should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailMode {
    None,
    Read,
    Write,
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace editor content, as a user edit
    Edit { id: String, text: String },
    /// Append text at the end of the editor, as if typed
    Type { id: String, text: String },
    /// Delete the last character of the editor
    Backspace { id: String },
    /// Assign the configuration value directly
    Set { id: String, text: String },
    /// Print editor and configuration state
    Show { id: Option<String> },
    /// Forward an editor change by hand
    Trigger { id: String },
    /// Copy editor content into configuration
    ToConfig { id: Option<String> },
    /// Copy configuration into editor content
    ToEditor { id: Option<String> },
    /// Register a controller for the editor (creating it if needed)
    Attach { id: String },
    /// Stop the controller observing its configuration
    Dispose { id: String },
    /// Dispose and unregister every controller
    DisposeAll,
    /// Make the editor's adapter calls fail
    Fail { id: String, mode: FailMode },
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  edit <id> <text>        replace editor content (user edit)
  type <id> <text>        append text to the editor
  backspace <id>          delete the last editor character
  set <id> <text>         assign the configuration value
  show [id]               print editor and configuration state
  trigger <id>            forward an editor change by hand
  to-config [id]          copy editor content into configuration
  to-editor [id]          copy configuration into the editor
  attach <id>             register a controller for an editor
  dispose <id>            stop a controller observing configuration
  dispose-all             dispose and unregister every controller
  fail <id> read|write|none
  help | quit
text arguments accept \\n for a newline and \\\\ for a backslash";

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    ///
    /// # Errors
    /// Returns an error for unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_start();
        if line.trim().is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (name, rest) = split_word(line);
        let (id, text) = split_word(rest);
        let id = (!id.is_empty()).then(|| id.to_string());
        let text = unescape(text);

        let command = match name {
            "edit" => Self::Edit {
                id: require(id, name)?,
                text,
            },
            "type" => Self::Type {
                id: require(id, name)?,
                text,
            },
            "backspace" => Self::Backspace {
                id: require(id, name)?,
            },
            "set" => Self::Set {
                id: require(id, name)?,
                text,
            },
            "show" => Self::Show { id },
            "trigger" => Self::Trigger {
                id: require(id, name)?,
            },
            "to-config" => Self::ToConfig { id },
            "to-editor" => Self::ToEditor { id },
            "attach" => Self::Attach {
                id: require(id, name)?,
            },
            "dispose" => Self::Dispose {
                id: require(id, name)?,
            },
            "dispose-all" => Self::DisposeAll,
            "fail" => {
                let id = require(id, name)?;
                let mode = match text.trim() {
                    "read" => FailMode::Read,
                    "write" => FailMode::Write,
                    "none" | "" => FailMode::None,
                    other => bail!("unknown failure mode '{other}' (read, write or none)"),
                };
                Self::Fail { id, mode }
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(Some(command))
    }
}

fn require(id: Option<String>, command: &str) -> Result<String> {
    match id {
        Some(id) => Ok(id),
        None => bail!("'{command}' needs an editor id"),
    }
}

/// Split off the first whitespace-delimited word; the remainder keeps its
/// inner spacing.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    s.split_once(char::is_whitespace).unwrap_or((s, ""))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
