//! The host document a [`ThemeRuntime`](crate::ThemeRuntime) writes into.
//!
//! The runtime never inspects its environment. Instead it is given a
//! [`DocumentSink`]: [`NoopDocument`] for server contexts, [`MemoryDocument`]
//! for headless rendering and tests, and `DomDocument` in the browser.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::change::ThemeChange;
use crate::error::HostError;
use crate::listeners::Listeners;
use crate::mode::ColorMode;
use crate::subscription::Subscription;

/// Capabilities the theme runtime needs from its host.
pub trait DocumentSink {
    /// Creates the style element `id`, or replaces its text if it exists.
    fn inject(&self, id: &str, css: &str) -> Result<(), HostError>;

    /// Removes the style element `id`. Missing elements are ignored.
    fn remove(&self, id: &str);

    /// The host's own colour-mode preference, if it has one.
    fn system_theme(&self) -> Option<ColorMode> {
        None
    }

    /// Calls `callback` on every later colour-mode change.
    fn observe_system_theme(&self, _callback: Box<dyn FnMut(ColorMode)>) -> Subscription {
        Subscription::noop()
    }

    /// Publishes a theme change to the host, after the style write.
    fn dispatch_theme_change(&self, _change: &ThemeChange) {}
}

/// A document that does nothing. Used where there is no live document.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDocument;

impl DocumentSink for NoopDocument {
    fn inject(&self, _id: &str, _css: &str) -> Result<(), HostError> {
        Ok(())
    }

    fn remove(&self, _id: &str) {}
}

#[derive(Default)]
struct MemoryState {
    styles: IndexMap<String, String>,
    events: Vec<ThemeChange>,
    mode: Option<ColorMode>,
    writes: usize,
}

/// An in-memory document.
///
/// Clones share one document, so a test or server renderer can keep a handle
/// while the runtime owns another. Style elements are kept by id in creation
/// order; theme changes are recorded; the host pushes colour-mode changes
/// with [`set_system_theme`](MemoryDocument::set_system_theme).
///
/// # Example
///
/// ```rust
/// use tokiforge_runtime::{ColorMode, DocumentSink, MemoryDocument};
///
/// let document = MemoryDocument::new();
/// document.inject("theme", ":root {\n}").unwrap();
/// assert_eq!(document.style("theme").as_deref(), Some(":root {\n}"));
///
/// document.set_system_theme(ColorMode::Dark);
/// assert_eq!(document.system_theme(), Some(ColorMode::Dark));
/// ```
#[derive(Clone, Default)]
pub struct MemoryDocument {
    state: Rc<RefCell<MemoryState>>,
    watchers: Listeners<ColorMode>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose host prefers `mode`.
    pub fn with_system_theme(mode: ColorMode) -> Self {
        let document = Self::new();
        document.state.borrow_mut().mode = Some(mode);
        document
    }

    /// Text of the style element `id`.
    pub fn style(&self, id: &str) -> Option<String> {
        self.state.borrow().styles.get(id).cloned()
    }

    /// Ids of every style element, in creation order.
    pub fn style_ids(&self) -> Vec<String> {
        self.state.borrow().styles.keys().cloned().collect()
    }

    /// How many times any style element was written.
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    /// Every theme change dispatched so far.
    pub fn events(&self) -> Vec<ThemeChange> {
        self.state.borrow().events.clone()
    }

    /// Number of active colour-mode observers.
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    /// Changes the host preference and notifies every observer.
    pub fn set_system_theme(&self, mode: ColorMode) {
        self.state.borrow_mut().mode = Some(mode);
        self.watchers.emit(&mode);
    }
}

impl DocumentSink for MemoryDocument {
    fn inject(&self, id: &str, css: &str) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        state.styles.insert(id.to_string(), css.to_string());
        state.writes += 1;
        Ok(())
    }

    fn remove(&self, id: &str) {
        self.state.borrow_mut().styles.shift_remove(id);
    }

    fn system_theme(&self) -> Option<ColorMode> {
        self.state.borrow().mode
    }

    fn observe_system_theme(&self, mut callback: Box<dyn FnMut(ColorMode)>) -> Subscription {
        self.watchers.add(Box::new(move |mode: &ColorMode| callback(*mode)))
    }

    fn dispatch_theme_change(&self, change: &ThemeChange) {
        self.state.borrow_mut().events.push(change.clone());
    }
}
