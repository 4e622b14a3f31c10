//! Observable configuration values.
//!
//! [`ConfigCell`] is a single-threaded shared string with synchronous change
//! notification:
//!
//! 1. Version increments exactly once per assignment that changes the value.
//! 2. Watchers are notified in registration order.
//! 3. Assigning a value equal to the current one is a no-op.
//! 4. A stopped or dropped [`WatchHandle`] receives no further deliveries.

mod cell;

pub use cell::{ConfigCell, WatchEvent, WatchHandle};
