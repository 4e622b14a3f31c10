//! Two-way sync between editors and configuration cells.
//!
//! A [`SyncController`] mediates between one editor and one
//! [`ConfigCell`](crate::reactive::ConfigCell). Both directions are
//! synchronous and last-writer-wins; the only cross-cutting state is the
//! [`UpdateGuard`], which is set while configuration content is being written
//! into the editor so the editor's own change notification is ignored.
//!
//! A [`SyncRegistry`] holds many controllers keyed by editor id and tears them
//! down together.

mod controller;
mod guard;
mod logger;
mod options;
mod registry;

pub use controller::{SyncController, SyncOutcome, WeakSyncController};
pub use guard::{GuardToken, UpdateGuard};
pub use logger::SyncLogger;
pub use options::{DEFAULT_KEY, SyncOptions};
pub use registry::{SyncEntry, SyncRegistry};
