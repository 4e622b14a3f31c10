use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{EditorAdapter, EditorBuffer};
use crate::error::EditorError;

/// Identifier returned by [`SharedEditor::on_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn()>;

struct SharedInner {
    buffer: RefCell<EditorBuffer>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_listener: Cell<u64>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

/// An editor widget stand-in: a shared [`EditorBuffer`] plus
/// content-change listeners.
///
/// Every mutation that changes the content, including a programmatic
/// [`set_value`](EditorAdapter::set_value), notifies listeners synchronously
/// once the buffer borrow has been released. Listeners may therefore read the
/// editor (or write it) from inside the notification.
#[derive(Clone)]
pub struct SharedEditor {
    inner: Rc<SharedInner>,
}

impl SharedEditor {
    pub fn new(text: &str) -> Self {
        Self {
            inner: Rc::new(SharedInner {
                buffer: RefCell::new(EditorBuffer::from_text(text)),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                fail_reads: Cell::new(false),
                fail_writes: Cell::new(false),
            }),
        }
    }

    /// Register a content-change listener.
    pub fn on_change(&self, listener: impl Fn() + 'static) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Current content, bypassing failure injection.
    pub fn text(&self) -> String {
        self.inner.buffer.borrow().text()
    }

    /// Replace the content as a user edit would.
    pub fn replace(&self, text: &str) {
        self.edit(|buf| buf.set_text(text));
    }

    /// Append text at the end of the content, as if typed.
    pub fn type_text(&self, text: &str) {
        self.edit(|buf| {
            buf.move_to_end();
            buf.insert_str(text);
            !text.is_empty()
        });
    }

    /// Delete the last character, as if Backspace were pressed at the end.
    pub fn backspace(&self) -> bool {
        self.edit(|buf| {
            buf.move_to_end();
            buf.delete_back()
        })
    }

    /// Make subsequent reads fail with [`EditorError::Read`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.set(fail);
    }

    /// Make subsequent writes fail with [`EditorError::Write`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.set(fail);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn edit(&self, f: impl FnOnce(&mut EditorBuffer) -> bool) -> bool {
        let changed = f(&mut *self.inner.buffer.borrow_mut());
        if changed {
            self.notify();
        }
        changed
    }

    fn notify(&self) {
        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener();
        }
    }
}

impl EditorAdapter for SharedEditor {
    fn get_value(&self) -> Result<String, EditorError> {
        if self.inner.fail_reads.get() {
            return Err(EditorError::read("editor is not readable"));
        }
        Ok(self.text())
    }

    fn set_value(&self, value: &str) -> Result<(), EditorError> {
        if self.inner.fail_writes.get() {
            return Err(EditorError::write("editor is read-only"));
        }
        self.edit(|buf| buf.set_text(value));
        Ok(())
    }
}

impl std::fmt::Debug for SharedEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEditor")
            .field("buffer", &*self.inner.buffer.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(editor: &SharedEditor) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        editor.on_change(move || c.set(c.get() + 1));
        count
    }

    #[test]
    fn test_set_value_notifies_listeners() {
        let editor = SharedEditor::new("a");
        let count = counting(&editor);
        editor.set_value("b").unwrap();
        assert_eq!(editor.text(), "b");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_set_value_equal_content_does_not_notify() {
        let editor = SharedEditor::new("a");
        let count = counting(&editor);
        editor.set_value("a").unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_listener_may_read_editor_during_notification() {
        let editor = SharedEditor::new("a");
        let seen = Rc::new(RefCell::new(String::new()));
        let (reader, sink) = (editor.clone(), Rc::clone(&seen));
        editor.on_change(move || *sink.borrow_mut() = reader.get_value().unwrap());

        editor.type_text("bc");
        assert_eq!(*seen.borrow(), "abc");
    }

    #[test]
    fn test_backspace_removes_last_char() {
        let editor = SharedEditor::new("abc");
        let count = counting(&editor);
        assert!(editor.backspace());
        assert_eq!(editor.text(), "ab");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_backspace_on_empty_does_not_notify() {
        let editor = SharedEditor::new("");
        let count = counting(&editor);
        assert!(!editor.backspace());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_typed_line_breaks_backspace_cleanly() {
        let editor = SharedEditor::new("a");
        editor.type_text("\r\u{2028}b\r\n");
        assert!(editor.backspace());
        assert!(editor.backspace());
        assert!(editor.backspace());
        assert_eq!(editor.text(), "a\r");
        assert!(editor.backspace());
        assert!(editor.backspace());
        assert!(!editor.backspace());
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_remove_listener() {
        let editor = SharedEditor::new("a");
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let id = editor.on_change(move || c.set(c.get() + 1));

        assert!(editor.remove_listener(id));
        assert!(!editor.remove_listener(id));
        editor.replace("b");
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_failure_injection() {
        let editor = SharedEditor::new("a");
        editor.set_fail_reads(true);
        editor.set_fail_writes(true);
        assert!(matches!(editor.get_value(), Err(EditorError::Read(_))));
        assert!(matches!(editor.set_value("b"), Err(EditorError::Write(_))));
        assert_eq!(editor.text(), "a");

        editor.set_fail_reads(false);
        assert_eq!(editor.get_value(), Ok("a".to_string()));
    }
}
