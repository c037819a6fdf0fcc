//! Ambient log properties.
//!
//! Properties pushed here are added to every record the console logger
//! writes on the same thread until their guard is dropped.

use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static PROPERTIES: RefCell<Vec<(String, String)>> = const { RefCell::new(Vec::new()) };
}

/// Removes its property, and any pushed after it, when dropped.
#[must_use = "the property is removed as soon as the guard is dropped"]
pub struct PropertyGuard {
    depth: usize,
    // Tied to the pushing thread.
    _not_send: PhantomData<*const ()>,
}

impl Drop for PropertyGuard {
    fn drop(&mut self) {
        let _ = PROPERTIES.try_with(|properties| properties.borrow_mut().truncate(self.depth));
    }
}

/// Attach `key=value` to every record logged on this thread while the guard lives.
pub fn push_property(key: impl Into<String>, value: impl ToString) -> PropertyGuard {
    let depth = PROPERTIES.with(|properties| {
        let mut properties = properties.borrow_mut();
        properties.push((key.into(), value.to_string()));
        properties.len() - 1
    });
    PropertyGuard {
        depth,
        _not_send: PhantomData,
    }
}

/// Properties currently in scope, outermost first.
pub fn current_properties() -> Vec<(String, String)> {
    PROPERTIES
        .try_with(|properties| properties.borrow().clone())
        .unwrap_or_default()
}
