// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. sync::SyncOptions)
    clippy::module_name_repetitions
)]

//! # Mirrorsync
//!
//! Two-way binding between text editor widgets and reactive configuration
//! values.
//!
//! An editor and a configuration value are two independently mutable copies of
//! the same string. Mirrorsync keeps them equal in both directions without
//! letting an update echo back and forth:
//! - editor edits are copied into the configuration value,
//! - configuration changes are written into the editor,
//! - a guard flag suppresses the editor's own change event while a
//!   configuration write is in progress.
//!
//! ## Modules
//!
//! - [`reactive`]: Observable configuration cells
//! - [`editor`]: Editor adapters and a rope-backed editor buffer
//! - [`sync`]: Sync controllers and the multi-editor registry
//! - [`session`]: Line-driven host used by the CLI
//! - [`config`]: Command-line flags and saved defaults
//! - [`error`]: Editor adapter errors

pub mod config;
pub mod editor;
pub mod error;
pub mod reactive;
pub mod session;
pub mod sync;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{EditorAdapter, FnEditor, SharedEditor};
    pub use crate::error::EditorError;
    pub use crate::reactive::ConfigCell;
    pub use crate::sync::{SyncController, SyncEntry, SyncOptions, SyncRegistry, UpdateGuard};
}
