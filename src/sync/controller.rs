use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::editor::EditorAdapter;
use crate::error::EditorError;
use crate::reactive::{ConfigCell, WatchEvent, WatchHandle};

use super::{SyncLogger, SyncOptions, UpdateGuard};

/// What a sync operation did.
///
/// Informational only: adapter failures are already logged by the time an
/// outcome is returned, and no operation leaves the controller in a state
/// that needs recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The update guard was set; nothing was read or written.
    Skipped,
    /// Both sides already held the same content.
    Unchanged,
    /// Content was propagated.
    Synced,
    /// An adapter call failed; the target side was left untouched.
    Failed(EditorError),
}

impl SyncOutcome {
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped => f.write_str("skipped (update in progress)"),
            Self::Unchanged => f.write_str("unchanged"),
            Self::Synced => f.write_str("synced"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

struct ControllerInner {
    editor: Box<dyn EditorAdapter>,
    config: ConfigCell,
    guard: UpdateGuard,
    options: SyncOptions,
    log: SyncLogger,
    watch: RefCell<Option<WatchHandle>>,
}

/// Keeps one editor and one configuration cell in step.
///
/// Editor → config runs when the host calls
/// [`on_editor_change`](Self::on_editor_change). Config → editor runs from the
/// controller's own watch on the cell once [`start`](Self::start)ed. While a
/// config → editor write is in flight the [`UpdateGuard`] is set, so the
/// editor's re-entrant change notification does not bounce the value back.
///
/// Handles are cheap to clone and share one controller. The watch is
/// cancelled by [`dispose`](Self::dispose) or when the last handle drops.
#[derive(Clone)]
pub struct SyncController {
    inner: Rc<ControllerInner>,
}

impl SyncController {
    /// Build a controller without observing the cell yet.
    pub fn new<E>(editor: E, config: ConfigCell, guard: UpdateGuard, options: SyncOptions) -> Self
    where
        E: EditorAdapter + 'static,
    {
        Self::from_boxed(Box::new(editor), config, guard, options)
    }

    /// Build a controller and start observing right away.
    pub fn attach<E>(editor: E, config: ConfigCell, guard: UpdateGuard, options: SyncOptions) -> Self
    where
        E: EditorAdapter + 'static,
    {
        let controller = Self::new(editor, config, guard, options);
        controller.start();
        controller
    }

    pub(crate) fn from_boxed(
        editor: Box<dyn EditorAdapter>,
        config: ConfigCell,
        guard: UpdateGuard,
        options: SyncOptions,
    ) -> Self {
        let log = SyncLogger::new(options.key.clone(), options.debug);
        Self {
            inner: Rc::new(ControllerInner {
                editor,
                config,
                guard,
                options,
                log,
                watch: RefCell::new(None),
            }),
        }
    }

    /// Begin observing the configuration cell.
    ///
    /// With `immediate` set, the current configuration value is pushed into
    /// the editor before this returns (when the two differ). Does nothing if
    /// the controller is already observing; a disposed controller can be
    /// started again.
    pub fn start(&self) {
        if self.is_active() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.config.watch(false, move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_config_change(event);
            }
        });
        // Stored before the first delivery so a dispose() from inside it sticks.
        *self.inner.watch.borrow_mut() = Some(handle);

        let initial = self.inner.config.get();
        if self.inner.options.immediate {
            self.inner.on_config_change(&WatchEvent {
                new: &initial,
                old: None,
            });
        }

        let log = &self.inner.log;
        if log.is_enabled() {
            tracing::debug!(
                target: "mirrorsync::sync",
                key = %log.key(),
                immediate = self.inner.options.immediate,
                initial_value = ?initial,
                "sync controller started"
            );
        }
    }

    /// The editor content changed; copy it into the configuration cell.
    ///
    /// Skipped while the update guard is set, since the change then came from
    /// this controller's own write-back.
    pub fn on_editor_change(&self) -> SyncOutcome {
        self.inner.on_editor_change()
    }

    /// Copy the editor content into the configuration cell whether or not
    /// they differ.
    ///
    /// The cell ignores equal assignments, so no change event is produced
    /// when they already match.
    pub fn sync_to_config(&self) -> SyncOutcome {
        let inner = &self.inner;
        match inner.editor.get_value() {
            Ok(content) => {
                inner.log.change("manual sync to config", None, &content);
                if inner.config.set(content) {
                    SyncOutcome::Synced
                } else {
                    SyncOutcome::Unchanged
                }
            }
            Err(err) => {
                inner.log.failure("manual sync to config failed", &err);
                SyncOutcome::Failed(err)
            }
        }
    }

    /// Write the configuration value into the editor whether or not they
    /// differ.
    pub fn sync_to_editor(&self) -> SyncOutcome {
        let inner = &self.inner;
        let value = inner.config.get();
        inner.log.change("manual sync to editor", None, &value);
        inner.write_editor(&value, "manual sync to editor failed")
    }

    /// Stop observing the configuration cell. Later calls do nothing.
    pub fn dispose(&self) {
        let handle = self.inner.watch.borrow_mut().take();
        if let Some(mut handle) = handle {
            self.inner.log.debug("sync controller disposed");
            handle.stop();
        }
    }

    /// Whether the controller is observing its configuration cell.
    pub fn is_active(&self) -> bool {
        self.inner
            .watch
            .borrow()
            .as_ref()
            .is_some_and(WatchHandle::is_active)
    }

    pub fn key(&self) -> &str {
        &self.inner.options.key
    }

    pub fn options(&self) -> &SyncOptions {
        &self.inner.options
    }

    pub fn config(&self) -> &ConfigCell {
        &self.inner.config
    }

    pub fn guard(&self) -> &UpdateGuard {
        &self.inner.guard
    }

    /// A handle that does not keep the controller alive.
    ///
    /// Editor change listeners should hold one of these: the controller owns
    /// the editor, so a strong handle inside the editor would never be freed.
    pub fn downgrade(&self) -> WeakSyncController {
        WeakSyncController {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("options", &self.inner.options)
            .field("guard", &self.inner.guard)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

/// Non-owning counterpart of [`SyncController`].
#[derive(Clone, Debug, Default)]
pub struct WeakSyncController {
    inner: Weak<ControllerInner>,
}

impl WeakSyncController {
    pub fn upgrade(&self) -> Option<SyncController> {
        self.inner.upgrade().map(|inner| SyncController { inner })
    }
}

impl ControllerInner {
    fn on_editor_change(&self) -> SyncOutcome {
        if self.guard.is_updating() {
            self.log.debug("skipping editor change (update in progress)");
            return SyncOutcome::Skipped;
        }

        let content = match self.editor.get_value() {
            Ok(content) => content,
            Err(err) => {
                self.log.failure("failed to read editor content", &err);
                return SyncOutcome::Failed(err);
            }
        };

        if self.config.with(|current| current == content) {
            return SyncOutcome::Unchanged;
        }
        if self.log.is_enabled() {
            let previous = self.config.get();
            self.log
                .change("editor changed, syncing to config", Some(&previous), &content);
        }
        self.config.set(content);
        SyncOutcome::Synced
    }

    fn on_config_change(&self, event: &WatchEvent<'_>) -> SyncOutcome {
        if self.guard.is_updating() {
            self.log.debug("skipping config change (update in progress)");
            return SyncOutcome::Skipped;
        }

        let current = match self.editor.get_value() {
            Ok(current) => current,
            Err(err) => {
                self.log.failure("failed to read editor before write-back", &err);
                return SyncOutcome::Failed(err);
            }
        };
        if current == event.new {
            return SyncOutcome::Unchanged;
        }

        self.log
            .change("config changed, syncing to editor", event.old, event.new);
        self.write_editor(event.new, "failed to write editor content")
    }

    fn write_editor(&self, value: &str, failure: &str) -> SyncOutcome {
        let _token = self.guard.engage();
        match self.editor.set_value(value) {
            Ok(()) => SyncOutcome::Synced,
            Err(err) => {
                self.log.failure(failure, &err);
                SyncOutcome::Failed(err)
            }
        }
    }
}
