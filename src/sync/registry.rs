use std::collections::BTreeMap;

use crate::editor::EditorAdapter;
use crate::reactive::ConfigCell;

use super::{SyncController, SyncOptions, SyncOutcome, UpdateGuard};

/// Everything needed to register one editor with a [`SyncRegistry`].
pub struct SyncEntry {
    pub id: String,
    pub editor: Box<dyn EditorAdapter>,
    pub config: ConfigCell,
    /// Guard to share with other controllers; a fresh one when `None`.
    pub guard: Option<UpdateGuard>,
    /// `key` is overwritten with `id` on registration.
    pub options: SyncOptions,
}

impl SyncEntry {
    pub fn new(id: impl Into<String>, editor: impl EditorAdapter + 'static, config: ConfigCell) -> Self {
        Self {
            id: id.into(),
            editor: Box::new(editor),
            config,
            guard: None,
            options: SyncOptions::default(),
        }
    }

    pub fn with_guard(mut self, guard: UpdateGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }
}

impl std::fmt::Debug for SyncEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEntry")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Controllers keyed by editor id, sharing one lifecycle.
///
/// The registry owns what it creates: replacing an id disposes the previous
/// controller, and [`dispose_all`](Self::dispose_all) (or dropping the
/// registry) disposes every controller.
#[derive(Debug, Default)]
pub struct SyncRegistry {
    controllers: BTreeMap<String, SyncController>,
}

impl SyncRegistry {
    /// Attach a controller for each entry, in order.
    ///
    /// A later entry with an id already seen replaces the earlier one.
    pub fn new(entries: impl IntoIterator<Item = SyncEntry>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            registry.register(entry);
        }
        registry
    }

    /// Attach a controller for `entry` and return it.
    pub fn register(&mut self, entry: SyncEntry) -> SyncController {
        let SyncEntry {
            id,
            editor,
            config,
            guard,
            options,
        } = entry;
        if let Some(previous) = self.controllers.remove(&id) {
            tracing::debug!(
                target: "mirrorsync::sync",
                key = %previous.key(),
                "replacing registered controller"
            );
            previous.dispose();
        }

        let options = options.with_key(id.clone());
        let controller = SyncController::from_boxed(editor, config, guard.unwrap_or_default(), options);
        controller.start();
        self.controllers.insert(id, controller.clone());
        controller
    }

    pub fn get(&self, id: &str) -> Option<&SyncController> {
        self.controllers.get(id)
    }

    /// Forward an editor change to the controller for `id`.
    ///
    /// Unknown ids are ignored and yield `None`.
    pub fn trigger(&self, id: &str) -> Option<SyncOutcome> {
        self.controllers.get(id).map(SyncController::on_editor_change)
    }

    /// Push every editor into its configuration cell.
    ///
    /// One controller failing does not stop the others; outcomes are returned
    /// per id.
    pub fn sync_all_to_config(&self) -> Vec<(String, SyncOutcome)> {
        self.each(SyncController::sync_to_config)
    }

    /// Push every configuration value into its editor.
    pub fn sync_all_to_editor(&self) -> Vec<(String, SyncOutcome)> {
        self.each(SyncController::sync_to_editor)
    }

    /// Dispose every controller, then forget them all.
    pub fn dispose_all(&mut self) {
        for controller in self.controllers.values() {
            controller.dispose();
        }
        self.controllers.clear();
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.controllers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SyncController)> {
        self.controllers.iter().map(|(id, c)| (id.as_str(), c))
    }

    fn each(&self, op: impl Fn(&SyncController) -> SyncOutcome) -> Vec<(String, SyncOutcome)> {
        self.controllers
            .iter()
            .map(|(id, controller)| (id.clone(), op(controller)))
            .collect()
    }
}

impl Drop for SyncRegistry {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
