use crate::error::EditorError;

/// Diagnostics for one controller, tagged with its key.
///
/// Debug messages only go out when the controller was built with
/// `debug = true`. Adapter failures are always reported.
#[derive(Debug, Clone)]
pub struct SyncLogger {
    key: String,
    enabled: bool,
}

impl SyncLogger {
    pub fn new(key: impl Into<String>, enabled: bool) -> Self {
        Self {
            key: key.into(),
            enabled,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn debug(&self, message: &str) {
        if self.enabled {
            tracing::debug!(target: "mirrorsync::sync", key = %self.key, "{message}");
        }
    }

    /// A value moving from one side to the other.
    pub fn change(&self, message: &str, from: Option<&str>, to: &str) {
        if self.enabled {
            tracing::debug!(
                target: "mirrorsync::sync",
                key = %self.key,
                from = ?from,
                to = ?to,
                "{message}"
            );
        }
    }

    pub fn failure(&self, message: &str, err: &EditorError) {
        tracing::error!(target: "mirrorsync::sync", key = %self.key, error = %err, "{message}");
    }
}
