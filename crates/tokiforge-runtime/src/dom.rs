//! Browser document and storage, available when compiled for `wasm32`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CustomEvent, CustomEventInit, Document, MediaQueryList, MediaQueryListEvent, Storage, Window,
};

use crate::change::{ThemeChange, THEME_CHANGE_EVENT};
use crate::document::DocumentSink;
use crate::error::HostError;
use crate::mode::ColorMode;
use crate::store::ThemeStore;
use crate::subscription::Subscription;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn host_error(context: &str, err: JsValue) -> HostError {
    HostError::new(format!("{}: {:?}", context, err))
}

fn window() -> Result<Window, HostError> {
    web_sys::window().ok_or_else(|| HostError::new("no global window"))
}

fn dark_query(window: &Window) -> Option<MediaQueryList> {
    window.match_media(DARK_QUERY).ok().flatten()
}

/// Whether the browser reports a dark colour-scheme preference.
pub(crate) fn prefers_dark() -> Option<bool> {
    let window = web_sys::window()?;
    dark_query(&window).map(|query| query.matches())
}

/// A `change` listener on a media query, removed when dropped.
///
/// The closure must stay alive for as long as the browser can call it, so the
/// two are released together.
struct MediaListener {
    query: MediaQueryList,
    listener: Closure<dyn FnMut(MediaQueryListEvent)>,
}

impl MediaListener {
    fn attach(query: MediaQueryList, mut callback: Box<dyn FnMut(ColorMode)>) -> Option<Self> {
        let listener =
            Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
                callback(ColorMode::from_prefers_dark(event.matches()));
            });
        if let Err(err) =
            query.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?err, "failed to observe colour-scheme changes");
            return None;
        }
        Some(Self { query, listener })
    }
}

impl Drop for MediaListener {
    fn drop(&mut self) {
        let result = self
            .query
            .remove_event_listener_with_callback("change", self.listener.as_ref().unchecked_ref());
        if let Err(err) = result {
            tracing::warn!(error = ?err, "failed to stop observing colour-scheme changes");
        }
    }
}

/// The page the code runs in.
///
/// Style elements are `<style id=…>` children of `document.head`; changes are
/// dispatched on `window` as a `tokiforge:theme-change` `CustomEvent` whose
/// `detail` is `{theme, tokens}`.
#[derive(Debug, Clone)]
pub struct DomDocument {
    window: Window,
    document: Document,
}

impl DomDocument {
    /// The current page, if there is one.
    pub fn new() -> Result<Self, HostError> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| HostError::new("window has no document"))?;
        Ok(Self { window, document })
    }
}

impl DocumentSink for DomDocument {
    fn inject(&self, id: &str, css: &str) -> Result<(), HostError> {
        if let Some(existing) = self.document.get_element_by_id(id) {
            existing.set_text_content(Some(css));
            return Ok(());
        }
        let style = self
            .document
            .create_element("style")
            .map_err(|err| host_error("failed to create style element", err))?;
        style.set_id(id);
        style.set_text_content(Some(css));
        let head = self
            .document
            .head()
            .ok_or_else(|| HostError::new("document has no head"))?;
        head.append_child(&style)
            .map_err(|err| host_error("failed to attach style element", err))?;
        Ok(())
    }

    fn remove(&self, id: &str) {
        if let Some(element) = self.document.get_element_by_id(id) {
            element.remove();
        }
    }

    fn system_theme(&self) -> Option<ColorMode> {
        dark_query(&self.window).map(|query| ColorMode::from_prefers_dark(query.matches()))
    }

    /// The listener stays registered until the subscription is cancelled or
    /// its last clone is dropped.
    fn observe_system_theme(&self, callback: Box<dyn FnMut(ColorMode)>) -> Subscription {
        let Some(query) = dark_query(&self.window) else {
            return Subscription::noop();
        };
        match MediaListener::attach(query, callback) {
            Some(listener) => Subscription::new(move || drop(listener)),
            None => Subscription::noop(),
        }
    }

    fn dispatch_theme_change(&self, change: &ThemeChange) {
        let detail = match serde_json::to_string(change)
            .map_err(|err| HostError::new(err.to_string()))
            .and_then(|json| {
                js_sys::JSON::parse(&json).map_err(|err| host_error("invalid event detail", err))
            }) {
            Ok(detail) => detail,
            Err(err) => {
                tracing::warn!(error = %err, "failed to build theme change event");
                return;
            }
        };
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        match CustomEvent::new_with_event_init_dict(THEME_CHANGE_EVENT, &init) {
            Ok(event) => {
                if let Err(err) = self.window.dispatch_event(&event) {
                    tracing::warn!(error = ?err, "failed to dispatch theme change event");
                }
            }
            Err(err) => tracing::warn!(error = ?err, "failed to create theme change event"),
        }
    }
}

/// `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn new() -> Result<Self, HostError> {
        let storage = window()?
            .local_storage()
            .map_err(|err| host_error("local storage unavailable", err))?
            .ok_or_else(|| HostError::new("local storage unavailable"))?;
        Ok(Self { storage })
    }
}

impl ThemeStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set_item(key, value) {
            tracing::warn!(key, error = ?err, "failed to persist theme name");
        }
    }
}
