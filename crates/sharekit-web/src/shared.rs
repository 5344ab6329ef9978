//! Shared handle to a widget reachable from several JS entry points.
//!
//! Script callbacks run while the widget is mid-operation (a custom URL
//! builder during a re-render, `onShare` during a click), so every access
//! goes through `try_borrow` and a busy widget is reported, never a panic.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sharekit_core::ShareWidget;

#[derive(Clone)]
pub struct SharedWidget {
    inner: Rc<RefCell<ShareWidget>>,
}

/// Non-owning handle, held by the click listener.
pub struct WeakWidget(Weak<RefCell<ShareWidget>>);

impl SharedWidget {
    pub fn new(widget: ShareWidget) -> Self {
        Self {
            inner: Rc::new(RefCell::new(widget)),
        }
    }

    pub fn downgrade(&self) -> WeakWidget {
        WeakWidget(Rc::downgrade(&self.inner))
    }

    /// Read from the widget, or `None` while it is being mutated.
    pub fn read<T>(&self, f: impl FnOnce(&ShareWidget) -> T) -> Option<T> {
        match self.inner.try_borrow() {
            Ok(widget) => Some(f(&widget)),
            Err(_) => {
                log::warn!("Share widget is busy; read ignored");
                None
            }
        }
    }

    /// Mutate the widget. Returns `false` if it was busy.
    pub fn update(&self, f: impl FnOnce(&mut ShareWidget)) -> bool {
        match self.inner.try_borrow_mut() {
            Ok(mut widget) => {
                f(&mut widget);
                true
            }
            Err(_) => {
                log::warn!("Share widget is busy; call ignored");
                false
            }
        }
    }
}

impl WeakWidget {
    pub fn upgrade(&self) -> Option<SharedWidget> {
        self.0.upgrade().map(|inner| SharedWidget { inner })
    }
}
