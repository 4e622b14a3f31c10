//! Mirrorsync - drive synced editors from the command line.
//!
//! # Usage
//!
//! ```bash
//! mirrorsync --editors script,style
//! mirrorsync --debug --script session.txt
//! echo "set main hello" | mirrorsync --no-immediate
//! ```

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use mirrorsync::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use mirrorsync::session::{HELP, Session};

/// Two-way sync between editors and configuration values
#[derive(Parser, Debug)]
#[command(name = "mirrorsync", version, about, long_about = None)]
struct Cli {
    /// Comma-separated editor ids to create
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    editors: Vec<String>,

    /// Enable sync diagnostics
    #[arg(long)]
    debug: bool,

    /// Do not push configuration into editors when they are attached
    #[arg(long)]
    no_immediate: bool,

    /// Read commands from a file instead of stdin
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            debug: self.debug,
            no_immediate: self.no_immediate,
            editors: (!self.editors.is_empty()).then(|| self.editors.clone()),
            script: self.script.clone(),
        }
    }
}

fn init_tracing(debug: bool) {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    if debug {
        if let Ok(directive) = "mirrorsync=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_tracing(effective.debug);
    tracing::debug!(?effective, "starting session");

    let mut session = Session::new(effective.clone());
    let stdout = io::stdout().lock();

    if let Some(script) = &effective.script {
        let file = File::open(script)
            .with_context(|| format!("Failed to open script {}", script.display()))?;
        return session.run(BufReader::new(file), stdout);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("{HELP}");
    }
    session.run(stdin.lock(), stdout).context("Session error")
}
