use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::sync::SyncOptions;

/// Editors created when neither the CLI nor a defaults file names any.
pub const DEFAULT_EDITORS: &[&str] = &["main"];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub debug: bool,
    pub no_immediate: bool,
    pub editors: Option<Vec<String>>,
    pub script: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: booleans are OR'd, options prefer `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            debug: self.debug || other.debug,
            no_immediate: self.no_immediate || other.no_immediate,
            editors: other.editors.clone().or_else(|| self.editors.clone()),
            script: other.script.clone().or_else(|| self.script.clone()),
        }
    }

    /// Editor ids to create, falling back to [`DEFAULT_EDITORS`].
    pub fn editor_ids(&self) -> Vec<String> {
        self.editors.clone().unwrap_or_else(|| {
            DEFAULT_EDITORS.iter().map(ToString::to_string).collect()
        })
    }

    /// Controller options for the editor `id`.
    pub fn sync_options(&self, id: &str) -> SyncOptions {
        SyncOptions::default()
            .with_immediate(!self.no_immediate)
            .with_key(id)
            .with_debug(self.debug)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mirrorsync").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("mirrorsync")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mirrorsync").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("mirrorsync")
                .join("config");
        }
    }

    PathBuf::from(".mirrorsyncrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mirrorsyncrc")
}

/// Load saved defaults. A missing file yields empty flags.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// # Errors
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# mirrorsync defaults (saved with --save)".to_string()];
    if flags.debug {
        lines.push("--debug".to_string());
    }
    if flags.no_immediate {
        lines.push("--no-immediate".to_string());
    }
    if let Some(editors) = &flags.editors {
        lines.push(format!("--editors {}", editors.join(",")));
    }
    if let Some(script) = &flags.script {
        lines.push(format!("--script {}", script.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
/// Returns an error if the file exists and cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from raw tokens, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--debug" {
            flags.debug = true;
        } else if token == "--no-immediate" {
            flags.no_immediate = true;
        } else if token == "--editors" {
            if let Some(next) = tokens.get(i + 1) {
                flags.editors = parse_editor_list(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--editors=") {
            flags.editors = parse_editor_list(value);
        } else if token == "--script" {
            if let Some(next) = tokens.get(i + 1) {
                flags.script = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--script=") {
            flags.script = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_editor_list(s: &str) -> Option<Vec<String>> {
    let ids: Vec<String> = s
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    (!ids.is_empty()).then_some(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "mirrorsync",
            "--debug",
            "--no-immediate",
            "--editors",
            "script,style",
            "--script=session.txt",
            "stray",
        ]));
        assert!(flags.debug);
        assert!(flags.no_immediate);
        assert_eq!(
            flags.editors,
            Some(vec!["script".to_string(), "style".to_string()])
        );
        assert_eq!(flags.script, Some(PathBuf::from("session.txt")));
    }

    #[test]
    fn test_empty_editor_list_is_ignored() {
        let flags = parse_flag_tokens(&args(&["--editors", " , "]));
        assert_eq!(flags.editors, None);
        assert_eq!(flags.editor_ids(), vec!["main".to_string()]);
    }

    #[test]
    fn test_config_union_prefers_right_for_options() {
        let file = ConfigFlags {
            debug: true,
            editors: Some(vec!["a".to_string()]),
            script: Some(PathBuf::from("file.txt")),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            no_immediate: true,
            editors: Some(vec!["b".to_string()]),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.debug);
        assert!(merged.no_immediate);
        assert_eq!(merged.editors, Some(vec!["b".to_string()]));
        assert_eq!(merged.script, Some(PathBuf::from("file.txt")));
    }

    #[test]
    fn test_sync_options_follow_flags() {
        let flags = ConfigFlags {
            debug: true,
            no_immediate: true,
            ..ConfigFlags::default()
        };
        let options = flags.sync_options("style");
        assert!(!options.immediate);
        assert!(options.debug);
        assert_eq!(options.key, "style");
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".mirrorsyncrc");
        let flags = ConfigFlags {
            debug: true,
            no_immediate: true,
            editors: Some(vec!["a".to_string(), "b".to_string()]),
            script: Some(PathBuf::from("run.txt")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
