//! TokiForge runtime - live theme switching for design tokens.
//!
//! A [`ThemeRuntime`] holds a [`ThemeConfig`] of named token trees, resolves
//! each of them once, and writes the active theme as CSS custom properties
//! into a single style element of its document.
//!
//! ## Core Concepts
//!
//! - [`ThemeConfig`]: named themes plus an optional default
//! - [`ThemeRuntime`]: the `Uninitialized -> Initialized -> Destroyed` state machine
//! - [`DocumentSink`]: where styles go ([`NoopDocument`], [`MemoryDocument`], or
//!   `DomDocument` on `wasm32`)
//! - [`ThemeStore`]: optional persistence of the last applied theme name
//! - [`ColorMode`] and [`detect_system_theme`]: the user's light/dark preference
//! - [`Subscription`]: handle returned by every observer registration
//!
//! ## Quick Start
//!
//! ```rust
//! use tokiforge_runtime::{MemoryDocument, ThemeConfig, ThemeRuntime};
//!
//! let config = ThemeConfig::from_json(r##"{
//!     "themes": [
//!         {"name": "light", "tokens": {"color": {"bg": {"value": "#ffffff"}}}},
//!         {"name": "dark", "tokens": {"color": {"bg": {"value": "#0f172a"}}}}
//!     ]
//! }"##).unwrap();
//!
//! let document = MemoryDocument::new();
//! let mut runtime = ThemeRuntime::builder(config)
//!     .document(document.clone())
//!     .build()
//!     .unwrap();
//!
//! runtime.subscribe(|change| println!("now using {}", change.theme));
//! runtime.apply_theme("dark").unwrap();
//!
//! assert_eq!(
//!     document.style("tokiforge-theme").as_deref(),
//!     Some(":root {\n  --hf-color-bg: #0f172a;\n}")
//! );
//! ```
//!
//! ## Following the System Theme
//!
//! [`ThemeRuntime::watch_system_theme`] reports colour-mode changes to a
//! callback. To have a runtime switch by itself, share it and use
//! [`follow_system_theme`].
//!
//! ## Threading
//!
//! Runtimes, documents and subscriptions are single-threaded (`!Send`), like
//! the browser main thread they model. Only the system theme detector is
//! process-wide.

mod change;
mod config;
mod document;
#[cfg(target_arch = "wasm32")]
mod dom;
mod error;
mod listeners;
mod mode;
mod runtime;
mod shared;
mod store;
mod subscription;

pub use change::{ThemeChange, THEME_CHANGE_EVENT};
pub use config::{Theme, ThemeConfig};
pub use document::{DocumentSink, MemoryDocument, NoopDocument};
#[cfg(target_arch = "wasm32")]
pub use dom::{DomDocument, LocalStorageStore};
pub use error::{ConfigError, HostError, RuntimeError};
pub use mode::{detect_system_theme, reset_theme_detector, set_theme_detector, ColorMode};
pub use runtime::{Lifecycle, StyleTarget, ThemeRuntime, ThemeRuntimeBuilder, DEFAULT_STYLE_ID};
pub use shared::follow_system_theme;
pub use store::{MemoryStore, ThemeStore, DEFAULT_STORAGE_KEY};
pub use subscription::Subscription;
