//! Editor-side collaborators of the sync layer.
//!
//! The sync layer only sees an [`EditorAdapter`]: a content getter and a
//! content setter. [`FnEditor`] builds one from a pair of closures;
//! [`SharedEditor`] wraps a rope-backed [`EditorBuffer`] and fires change
//! listeners the way a real editor widget does.

mod adapter;
mod buffer;
mod shared;

pub use adapter::{EditorAdapter, FnEditor};
pub use buffer::EditorBuffer;
pub use shared::{ListenerId, SharedEditor};
