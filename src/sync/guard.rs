use std::cell::Cell;
use std::rc::Rc;

/// Re-entrancy guard shared between a controller and whoever else holds a
/// clone.
///
/// Set while a controller is writing configuration content into its editor;
/// both sync directions do nothing while it is set. Each controller gets its
/// own guard unless one is handed in explicitly, which lets several
/// controllers coordinate through a single flag.
#[derive(Clone, Default)]
pub struct UpdateGuard {
    flag: Rc<Cell<bool>>,
}

impl UpdateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_updating(&self) -> bool {
        self.flag.get()
    }

    /// Set the flag until the returned token is dropped.
    ///
    /// The token restores the state it found, so the flag is cleared on every
    /// exit path of the write-back, including unwinding.
    #[must_use = "the guard is released as soon as the token is dropped"]
    pub fn engage(&self) -> GuardToken {
        let previous = self.flag.replace(true);
        GuardToken {
            flag: Rc::clone(&self.flag),
            previous,
        }
    }

    /// Whether both handles share one flag.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.flag, &other.flag)
    }
}

impl std::fmt::Debug for UpdateGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("UpdateGuard").field(&self.flag.get()).finish()
    }
}

/// Scope of an engaged [`UpdateGuard`].
#[derive(Debug)]
pub struct GuardToken {
    flag: Rc<Cell<bool>>,
    previous: bool,
}

impl Drop for GuardToken {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}
