use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Cancel = Box<dyn FnOnce()>;

/// Handle to a registered callback.
///
/// Calling [`cancel`](Subscription::cancel) unregisters the callback; later
/// calls do nothing. Clones share the registration, so cancelling any clone
/// cancels all of them. Dropping the last clone does not run the cancel
/// callback, but releases everything it captured.
#[derive(Clone, Default)]
pub struct Subscription {
    cancel: Rc<RefCell<Option<Cancel>>>,
}

impl Subscription {
    /// A subscription that runs `cancel` once, on the first call to
    /// [`cancel`](Subscription::cancel).
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Rc::new(RefCell::new(Some(Box::new(cancel)))),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let cancel = self.cancel.borrow_mut().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.borrow().is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
