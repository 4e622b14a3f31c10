use std::rc::Rc;

use crate::error::EditorError;

/// Content accessors for an editor widget.
///
/// Both calls are black boxes to the sync layer. `set_value` may call back
/// into the sync layer synchronously (for example through a content-change
/// listener); the controller's update guard turns that into a no-op.
pub trait EditorAdapter {
    /// Read the full editor content.
    ///
    /// # Errors
    /// Returns [`EditorError::Read`] when the content cannot be read.
    fn get_value(&self) -> Result<String, EditorError>;

    /// Replace the full editor content.
    ///
    /// # Errors
    /// Returns [`EditorError::Write`] when the content cannot be written.
    fn set_value(&self, value: &str) -> Result<(), EditorError>;
}

impl<T: EditorAdapter + ?Sized> EditorAdapter for Rc<T> {
    fn get_value(&self) -> Result<String, EditorError> {
        (**self).get_value()
    }

    fn set_value(&self, value: &str) -> Result<(), EditorError> {
        (**self).set_value(value)
    }
}

impl<T: EditorAdapter + ?Sized> EditorAdapter for Box<T> {
    fn get_value(&self) -> Result<String, EditorError> {
        (**self).get_value()
    }

    fn set_value(&self, value: &str) -> Result<(), EditorError> {
        (**self).set_value(value)
    }
}

/// Adapter built from a getter closure and a setter closure.
pub struct FnEditor<G, S> {
    get: G,
    set: S,
}

impl<G, S> FnEditor<G, S>
where
    G: Fn() -> Result<String, EditorError>,
    S: Fn(&str) -> Result<(), EditorError>,
{
    pub const fn new(get: G, set: S) -> Self {
        Self { get, set }
    }
}

impl<G, S> EditorAdapter for FnEditor<G, S>
where
    G: Fn() -> Result<String, EditorError>,
    S: Fn(&str) -> Result<(), EditorError>,
{
    fn get_value(&self) -> Result<String, EditorError> {
        (self.get)()
    }

    fn set_value(&self, value: &str) -> Result<(), EditorError> {
        (self.set)(value)
    }
}

impl<G, S> std::fmt::Debug for FnEditor<G, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnEditor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_fn_editor_forwards_to_closures() {
        let store = Rc::new(RefCell::new(String::from("x")));
        let reader = Rc::clone(&store);
        let writer = Rc::clone(&store);
        let editor = FnEditor::new(
            move || Ok(reader.borrow().clone()),
            move |v: &str| {
                *writer.borrow_mut() = v.to_string();
                Ok(())
            },
        );

        assert_eq!(editor.get_value(), Ok("x".to_string()));
        editor.set_value("y").unwrap();
        assert_eq!(*store.borrow(), "y");
    }

    #[test]
    fn test_fn_editor_propagates_adapter_errors() {
        let editor = FnEditor::new(
            || Err(EditorError::read("detached")),
            |_: &str| Err(EditorError::write("read-only")),
        );
        assert_eq!(editor.get_value(), Err(EditorError::read("detached")));
        assert_eq!(editor.set_value("z"), Err(EditorError::write("read-only")));
    }

    #[test]
    fn test_boxed_adapter_is_an_adapter() {
        let boxed: Box<dyn EditorAdapter> =
            Box::new(FnEditor::new(|| Ok("boxed".to_string()), |_: &str| Ok(())));
        assert_eq!(boxed.get_value(), Ok("boxed".to_string()));
    }
}
