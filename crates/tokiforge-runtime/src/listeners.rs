//! A single-threaded callback list that tolerates re-entrant use.
//!
//! Callbacks may add or cancel listeners, or trigger another emit, while an
//! emit is in progress. Emits work on a snapshot of the list, so listeners
//! added during an emit wait for the next one. A callback that is already
//! running is skipped instead of being called again.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::warn;

use crate::subscription::Subscription;

type Callback<T> = Rc<RefCell<Box<dyn FnMut(&T)>>>;

struct Slots<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

pub(crate) struct Listeners<T> {
    slots: Rc<RefCell<Slots<T>>>,
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<T: 'static> Listeners<T> {
    pub(crate) fn add(&self, callback: Box<dyn FnMut(&T)>) -> Subscription {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.entries.push((id, Rc::new(RefCell::new(callback))));
            id
        };
        let weak: Weak<RefCell<Slots<T>>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = weak.upgrade() {
                slots.borrow_mut().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Calls every listener with `value`, returning how many were called.
    ///
    /// A listener cancelled by an earlier one during the same emit is not
    /// called.
    pub(crate) fn emit(&self, value: &T) -> usize {
        let snapshot: Vec<(u64, Callback<T>)> = self
            .slots
            .borrow()
            .entries
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();
        let mut called = 0;
        for (id, callback) in snapshot {
            if !self.is_registered(id) {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut callback) => {
                    callback(value);
                    called += 1;
                }
                Err(_) => warn!("skipping listener that is already running"),
            }
        }
        called
    }

    fn is_registered(&self, id: u64) -> bool {
        self.slots.borrow().entries.iter().any(|(entry, _)| *entry == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.borrow().entries.len()
    }

    pub(crate) fn clear(&self) {
        self.slots.borrow_mut().entries.clear();
    }
}
