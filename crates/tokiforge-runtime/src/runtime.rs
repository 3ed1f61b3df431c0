//! The theme runtime state machine.
//!
//! ```text
//! Uninitialized --init / apply_theme--> Initialized --destroy--> Destroyed
//! ```
//!
//! Every theme is resolved when the runtime is built, so switching themes only
//! flattens, exports and writes CSS. Resolved trees are cached; the themes of
//! the configuration are never modified.

use indexmap::IndexMap;
use tokiforge_core::{export_css, flatten, resolve, ExportFormat, ExportOptions, TokenTree};
use tracing::{debug, warn};

use crate::change::ThemeChange;
use crate::config::ThemeConfig;
use crate::document::{DocumentSink, NoopDocument};
use crate::error::RuntimeError;
use crate::listeners::Listeners;
use crate::mode::{detect_system_theme, ColorMode};
use crate::store::{ThemeStore, DEFAULT_STORAGE_KEY};
use crate::subscription::Subscription;

/// Id of the style element when none is configured.
pub const DEFAULT_STYLE_ID: &str = "tokiforge-theme";

/// Where and how the CSS variables are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTarget {
    /// Selector of the generated rule, `:root` by default.
    pub selector: String,
    /// Variable name prefix, `hf` by default.
    pub prefix: String,
}

impl Default for StyleTarget {
    fn default() -> Self {
        let options = ExportOptions::default();
        Self {
            selector: options.selector,
            prefix: options.prefix,
        }
    }
}

impl StyleTarget {
    pub fn new(selector: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            prefix: prefix.into(),
        }
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions::new(ExportFormat::Css)
            .selector(self.selector.clone())
            .prefix(self.prefix.clone())
    }
}

/// State of a [`ThemeRuntime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Built, nothing written to the document yet.
    Uninitialized,
    /// The style element holds the current theme.
    Initialized,
    /// The style element has been removed. Only queries still work.
    Destroyed,
}

/// Applies themes to a document and tracks which one is active.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tokiforge_core::TokenTree;
/// use tokiforge_runtime::{MemoryDocument, Theme, ThemeConfig, ThemeRuntime};
///
/// let tokens = |bg: &str| TokenTree::from_value(json!({"color": {"bg": {"value": bg}}})).unwrap();
/// let config = ThemeConfig::new(vec![
///     Theme::new("light", tokens("#ffffff")),
///     Theme::new("dark", tokens("#000000")),
/// ]).unwrap();
///
/// let document = MemoryDocument::new();
/// let mut runtime = ThemeRuntime::builder(config)
///     .document(document.clone())
///     .build()
///     .unwrap();
///
/// runtime.init().unwrap();
/// assert!(document.style("tokiforge-theme").unwrap().contains("--hf-color-bg: #ffffff;"));
///
/// runtime.next_theme().unwrap();
/// assert_eq!(runtime.current_theme(), "dark");
/// assert!(document.style("tokiforge-theme").unwrap().contains("--hf-color-bg: #000000;"));
///
/// runtime.destroy();
/// assert!(document.style("tokiforge-theme").is_none());
/// ```
pub struct ThemeRuntime {
    config: ThemeConfig,
    resolved: IndexMap<String, TokenTree>,
    current: String,
    lifecycle: Lifecycle,
    target: StyleTarget,
    style_id: String,
    document: Box<dyn DocumentSink>,
    store: Option<Box<dyn ThemeStore>>,
    storage_key: String,
    changes: Listeners<ThemeChange>,
    system_watch: Option<Subscription>,
}

impl std::fmt::Debug for ThemeRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeRuntime")
            .field("current", &self.current)
            .field("lifecycle", &self.lifecycle)
            .field("themes", &self.resolved.keys().collect::<Vec<_>>())
            .field("style_id", &self.style_id)
            .field("target", &self.target)
            .finish()
    }
}

impl ThemeRuntime {
    /// A runtime with default settings and no live document.
    pub fn new(config: ThemeConfig) -> Result<Self, RuntimeError> {
        Self::builder(config).build()
    }

    pub fn builder(config: ThemeConfig) -> ThemeRuntimeBuilder {
        ThemeRuntimeBuilder::new(config)
    }

    /// Writes the current theme into the document using the configured target.
    pub fn init(&mut self) -> Result<(), RuntimeError> {
        let target = self.target.clone();
        self.init_with(target)
    }

    /// Writes the current theme into the document with `target`.
    ///
    /// Calling it again rewrites the same style element.
    pub fn init_with(&mut self, target: StyleTarget) -> Result<(), RuntimeError> {
        self.ensure_alive()?;
        let css = self.stylesheet_for(&self.current, &target)?;
        self.document.inject(&self.style_id, &css)?;
        self.target = target;
        self.lifecycle = Lifecycle::Initialized;
        debug!(theme = %self.current, id = %self.style_id, "theme runtime initialized");
        Ok(())
    }

    /// Switches to theme `name` using the current target.
    ///
    /// From [`Lifecycle::Uninitialized`] this initializes the runtime as well.
    pub fn apply_theme(&mut self, name: &str) -> Result<(), RuntimeError> {
        let target = self.target.clone();
        self.apply_theme_with(name, target)
    }

    /// Switches to theme `name`, writing its variables with `target`.
    ///
    /// An unknown name fails with [`RuntimeError::ThemeNotFound`] before
    /// anything changes. On success the style element is rewritten, the name
    /// is persisted, and then observers are notified once.
    pub fn apply_theme_with(
        &mut self,
        name: &str,
        target: StyleTarget,
    ) -> Result<(), RuntimeError> {
        self.ensure_alive()?;
        let tokens = self
            .resolved
            .get(name)
            .ok_or_else(|| self.not_found(name))?
            .clone();
        let css = export_css(&flatten(&tokens), &target.export_options());
        self.document.inject(&self.style_id, &css)?;

        self.current = name.to_string();
        self.target = target;
        self.lifecycle = Lifecycle::Initialized;
        if let Some(store) = &self.store {
            store.set(&self.storage_key, name);
        }
        debug!(theme = %name, "applied theme");

        let change = ThemeChange {
            theme: self.current.clone(),
            tokens,
        };
        self.changes.emit(&change);
        self.document.dispatch_theme_change(&change);
        Ok(())
    }

    /// Applies the theme after the current one, wrapping to the first, and
    /// returns its name.
    pub fn next_theme(&mut self) -> Result<String, RuntimeError> {
        self.ensure_alive()?;
        let index = self.resolved.get_index_of(&self.current).unwrap_or(0);
        let next = (index + 1) % self.resolved.len();
        let name = match self.resolved.get_index(next) {
            Some((name, _)) => name.clone(),
            None => return Err(self.not_found(&self.current)),
        };
        self.apply_theme(&name)?;
        Ok(name)
    }

    /// Removes the style element and stops watching the system theme.
    ///
    /// Further calls do nothing. Afterwards [`init`](Self::init),
    /// [`apply_theme`](Self::apply_theme), [`next_theme`](Self::next_theme)
    /// and [`watch_system_theme`](Self::watch_system_theme) fail with
    /// [`RuntimeError::AlreadyDestroyed`].
    pub fn destroy(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        if let Some(watch) = self.system_watch.take() {
            watch.cancel();
        }
        if self.lifecycle == Lifecycle::Initialized {
            self.document.remove(&self.style_id);
        }
        self.changes.clear();
        self.lifecycle = Lifecycle::Destroyed;
        debug!(id = %self.style_id, "theme runtime destroyed");
    }

    /// Registers `callback` for every successful theme change.
    pub fn subscribe(&self, callback: impl FnMut(&ThemeChange) + 'static) -> Subscription {
        self.changes.add(Box::new(callback))
    }

    /// The colour mode preferred by the document's host, or by the platform
    /// when the document has no opinion.
    pub fn detect_system_theme(&self) -> ColorMode {
        self.document
            .system_theme()
            .unwrap_or_else(detect_system_theme)
    }

    /// Calls `callback` with the current colour mode now and on every change.
    ///
    /// The runtime keeps one watch: starting another cancels the previous
    /// one, and [`destroy`](Self::destroy) cancels it. The returned handle
    /// cancels it too.
    pub fn watch_system_theme(
        &mut self,
        mut callback: impl FnMut(ColorMode) + 'static,
    ) -> Result<Subscription, RuntimeError> {
        self.ensure_alive()?;
        callback(self.detect_system_theme());
        Ok(self.install_system_watch(Box::new(callback)))
    }

    /// Like [`watch_system_theme`](Self::watch_system_theme) without the
    /// immediate call.
    pub(crate) fn observe_system_theme(
        &mut self,
        callback: Box<dyn FnMut(ColorMode)>,
    ) -> Result<Subscription, RuntimeError> {
        self.ensure_alive()?;
        Ok(self.install_system_watch(callback))
    }

    fn install_system_watch(&mut self, callback: Box<dyn FnMut(ColorMode)>) -> Subscription {
        if let Some(previous) = self.system_watch.take() {
            previous.cancel();
        }
        let watch = self.document.observe_system_theme(callback);
        self.system_watch = Some(watch.clone());
        watch
    }

    pub fn current_theme(&self) -> &str {
        &self.current
    }

    /// Theme names in configuration order.
    pub fn theme_names(&self) -> Vec<&str> {
        self.resolved.keys().map(String::as_str).collect()
    }

    pub fn has_theme(&self, name: &str) -> bool {
        self.resolved.contains_key(name)
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// Resolved tokens of theme `name`.
    pub fn tokens(&self, name: &str) -> Option<&TokenTree> {
        self.resolved.get(name)
    }

    /// Resolved tokens of the current theme.
    pub fn current_tokens(&self) -> &TokenTree {
        &self.resolved[self.current.as_str()]
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Initialized
    }

    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    pub fn style_target(&self) -> &StyleTarget {
        &self.target
    }

    /// The CSS that [`apply_theme`](Self::apply_theme) would write for `name`.
    pub fn stylesheet(&self, name: &str) -> Result<String, RuntimeError> {
        self.stylesheet_for(name, &self.target)
    }

    fn stylesheet_for(&self, name: &str, target: &StyleTarget) -> Result<String, RuntimeError> {
        let tokens = self.resolved.get(name).ok_or_else(|| self.not_found(name))?;
        Ok(export_css(&flatten(tokens), &target.export_options()))
    }

    fn not_found(&self, name: &str) -> RuntimeError {
        RuntimeError::ThemeNotFound {
            name: name.to_string(),
            available: self.resolved.keys().cloned().collect(),
        }
    }

    pub(crate) fn ensure_alive(&self) -> Result<(), RuntimeError> {
        if self.lifecycle == Lifecycle::Destroyed {
            return Err(RuntimeError::AlreadyDestroyed);
        }
        Ok(())
    }
}

/// Builder for [`ThemeRuntime`].
pub struct ThemeRuntimeBuilder {
    config: ThemeConfig,
    style_id: String,
    target: StyleTarget,
    document: Box<dyn DocumentSink>,
    store: Option<Box<dyn ThemeStore>>,
    storage_key: String,
    restore_persisted: bool,
}

impl ThemeRuntimeBuilder {
    fn new(config: ThemeConfig) -> Self {
        Self {
            config,
            style_id: DEFAULT_STYLE_ID.to_string(),
            target: StyleTarget::default(),
            document: Box::new(NoopDocument),
            store: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            restore_persisted: false,
        }
    }

    /// Id of the owned style element. Runtimes sharing a document need
    /// distinct ids.
    pub fn style_id(mut self, id: impl Into<String>) -> Self {
        self.style_id = id.into();
        self
    }

    pub fn target(mut self, target: StyleTarget) -> Self {
        self.target = target;
        self
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.target.selector = selector.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target.prefix = prefix.into();
        self
    }

    pub fn document(mut self, document: impl DocumentSink + 'static) -> Self {
        self.document = Box::new(document);
        self
    }

    /// Persists the theme name to `store` on every successful change.
    pub fn store(mut self, store: impl ThemeStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Starts on the persisted theme when the store holds a known name.
    pub fn restore_persisted(mut self, restore: bool) -> Self {
        self.restore_persisted = restore;
        self
    }

    /// Validates the configuration and resolves every theme.
    pub fn build(self) -> Result<ThemeRuntime, RuntimeError> {
        self.config.validate()?;

        let mut resolved = IndexMap::with_capacity(self.config.themes().len());
        for theme in self.config.themes() {
            let tokens = resolve(&theme.tokens).map_err(|source| RuntimeError::Resolve {
                theme: theme.name.clone(),
                source,
            })?;
            resolved.insert(theme.name.clone(), tokens);
        }

        let mut current = self.config.default_theme().to_string();
        if self.restore_persisted {
            if let Some(stored) = self.store.as_ref().and_then(|s| s.get(&self.storage_key)) {
                if resolved.contains_key(&stored) {
                    current = stored;
                } else {
                    warn!(theme = %stored, "ignoring persisted theme that is not configured");
                }
            }
        }
        debug!(themes = resolved.len(), current = %current, "theme runtime created");

        Ok(ThemeRuntime {
            config: self.config,
            resolved,
            current,
            lifecycle: Lifecycle::Uninitialized,
            target: self.target,
            style_id: self.style_id,
            document: self.document,
            store: self.store,
            storage_key: self.storage_key,
            changes: Listeners::default(),
            system_watch: None,
        })
    }
}
