/// Key used when a controller is not given one.
pub const DEFAULT_KEY: &str = "unknown";

/// Per-controller settings, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Push the configuration value into the editor as soon as observation
    /// starts (when they differ).
    pub immediate: bool,
    /// Label used in diagnostics. Registries force it to the entry id.
    pub key: String,
    /// Emit debug-level sync diagnostics.
    pub debug: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            immediate: true,
            key: DEFAULT_KEY.to_string(),
            debug: false,
        }
    }
}

impl SyncOptions {
    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
