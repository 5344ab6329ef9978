//! Ownership of per-timer resources.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Holds a value per scheduled timer until the timer fires or is cancelled.
///
/// A firing timer reports itself through [`FiredMarker`]; its value is
/// dropped on the next [`TimerSlots::sweep`], never while it may still be
/// running.
pub struct TimerSlots<T> {
    live: RefCell<HashMap<i32, T>>,
    fired: Rc<RefCell<Vec<i32>>>,
}

/// Handed to a timer callback so it can report that it ran.
#[derive(Clone)]
pub struct FiredMarker(Rc<RefCell<Vec<i32>>>);

impl FiredMarker {
    pub fn mark(&self, handle: i32) {
        self.0.borrow_mut().push(handle);
    }
}

impl<T> TimerSlots<T> {
    pub fn new() -> Self {
        Self {
            live: RefCell::new(HashMap::new()),
            fired: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn marker(&self) -> FiredMarker {
        FiredMarker(Rc::clone(&self.fired))
    }

    pub fn insert(&self, handle: i32, value: T) {
        self.live.borrow_mut().insert(handle, value);
    }

    /// Release the value of a cancelled timer.
    pub fn cancel(&self, handle: i32) -> Option<T> {
        self.live.borrow_mut().remove(&handle)
    }

    /// Release values of timers that have fired.
    pub fn sweep(&self) {
        let fired = std::mem::take(&mut *self.fired.borrow_mut());
        let mut live = self.live.borrow_mut();
        for handle in fired {
            live.remove(&handle);
        }
    }

    pub fn len(&self) -> usize {
        self.live.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_releases_value() {
        let slots = TimerSlots::new();
        for handle in 1..=5 {
            slots.insert(handle, format!("closure {handle}"));
            if handle > 1 {
                assert!(slots.cancel(handle - 1).is_some());
            }
        }
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.cancel(5).as_deref(), Some("closure 5"));
        assert_eq!(slots.len(), 0);
    }

    #[test]
    fn test_fired_released_on_sweep() {
        let slots = TimerSlots::new();
        slots.insert(7, ());
        slots.insert(8, ());

        slots.marker().mark(7);
        assert_eq!(slots.len(), 2);

        slots.sweep();
        assert_eq!(slots.len(), 1);
        assert!(slots.cancel(8).is_some());
    }
}
