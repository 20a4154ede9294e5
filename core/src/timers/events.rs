//! Timer event subscribers

use std::cell::{Cell, RefCell};
use std::fmt;

/// Subscriber list for one event.
///
/// Emission runs with the list detached, so a callback may subscribe more
/// listeners (they fire from the next emission on) or clear the list (the
/// remaining listeners of the current emission still run, then are dropped).
/// A list is never re-entered: an emission nested inside one of its own
/// callbacks reaches no one.
pub struct Listeners<T> {
    slots: RefCell<Vec<Box<dyn FnMut(T)>>>,
    generation: Cell<u64>,
}

impl<T: Copy> Listeners<T> {
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
            generation: Cell::new(0),
        }
    }

    pub fn subscribe(&self, listener: impl FnMut(T) + 'static) {
        self.slots.borrow_mut().push(Box::new(listener));
    }

    pub fn emit(&self, value: T) {
        let generation = self.generation.get();
        let mut running = std::mem::take(&mut *self.slots.borrow_mut());

        for listener in running.iter_mut() {
            listener(value);
        }

        if self.generation.get() != generation {
            // Cleared by one of the callbacks
            return;
        }

        let mut slots = self.slots.borrow_mut();
        let added = std::mem::replace(&mut *slots, running);
        slots.extend(added);
    }

    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Copy> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.slots.borrow().len())
            .finish()
    }
}

/// All subscriber lists of one timer.
#[derive(Debug, Default)]
pub struct TimerEvents {
    pub started: Listeners<()>,
    pub stopped: Listeners<()>,
    /// Carries the timer's `current_time` after the tick
    pub updated: Listeners<f64>,
    /// Frequency pulses
    pub ticked: Listeners<()>,
}

impl TimerEvents {
    pub fn clear(&self) {
        self.started.clear();
        self.stopped.clear();
        self.updated.clear();
        self.ticked.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.started.len() + self.stopped.len() + self.updated.len() + self.ticked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn emit_reaches_every_listener() {
        let listeners = Listeners::<f64>::new();
        let sum = Rc::new(Cell::new(0.0));
        for _ in 0..3 {
            let sum = Rc::clone(&sum);
            listeners.subscribe(move |v| sum.set(sum.get() + v));
        }

        listeners.emit(1.5);
        assert_eq!(sum.get(), 4.5);
        assert_eq!(listeners.len(), 3);
    }

    #[test]
    fn listener_added_during_emit_fires_next_time() {
        let listeners = Rc::new(Listeners::<()>::new());
        let late_calls = Rc::new(Cell::new(0));

        {
            let inner = Rc::clone(&listeners);
            let late_calls = Rc::clone(&late_calls);
            let mut added = false;
            listeners.subscribe(move |()| {
                if !added {
                    added = true;
                    let late_calls = Rc::clone(&late_calls);
                    inner.subscribe(move |()| late_calls.set(late_calls.get() + 1));
                }
            });
        }

        listeners.emit(());
        assert_eq!(late_calls.get(), 0);
        assert_eq!(listeners.len(), 2);

        listeners.emit(());
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn clear_during_emit_drops_listeners() {
        let listeners = Rc::new(Listeners::<()>::new());
        let calls = Rc::new(Cell::new(0));

        {
            let inner = Rc::clone(&listeners);
            listeners.subscribe(move |()| inner.clear());
        }
        {
            let calls = Rc::clone(&calls);
            listeners.subscribe(move |()| calls.set(calls.get() + 1));
        }

        listeners.emit(());
        assert_eq!(calls.get(), 1, "remaining listeners of the running emit still fire");
        assert!(listeners.is_empty());

        listeners.emit(());
        assert_eq!(calls.get(), 1);
    }
}
