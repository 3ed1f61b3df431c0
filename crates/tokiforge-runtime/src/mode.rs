//! System colour-mode detection.
//!
//! [`detect_system_theme`] asks the platform whether the user prefers a dark
//! or light appearance: through the `dark-light` crate on native targets and
//! through `matchMedia('(prefers-color-scheme: dark)')` in the browser. When
//! the platform gives no answer the result is [`ColorMode::Light`].
//!
//! Use [`set_theme_detector`] to override detection, for example in tests:
//!
//! ```rust
//! use tokiforge_runtime::{detect_system_theme, set_theme_detector, ColorMode};
//!
//! set_theme_detector(|| ColorMode::Dark);
//! assert_eq!(detect_system_theme(), ColorMode::Dark);
//! # tokiforge_runtime::reset_theme_detector();
//! ```

use std::fmt;
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The user's preferred colour mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light background, dark text.
    #[default]
    Light,
    /// Dark background, light text.
    Dark,
}

impl ColorMode {
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type ThemeDetector = fn() -> ColorMode;

static THEME_DETECTOR: Lazy<Mutex<ThemeDetector>> = Lazy::new(|| Mutex::new(platform_detector));

/// Overrides the process-wide detector used by [`detect_system_theme`].
pub fn set_theme_detector(detector: ThemeDetector) {
    let mut guard = THEME_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = detector;
}

/// Restores platform detection after [`set_theme_detector`].
pub fn reset_theme_detector() {
    set_theme_detector(platform_detector);
}

/// The platform's current colour-mode preference, `Light` when unknown.
pub fn detect_system_theme() -> ColorMode {
    let detector = *THEME_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    detector()
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_detector() -> ColorMode {
    match dark_light::detect() {
        Ok(dark_light::Mode::Dark) => ColorMode::Dark,
        Ok(dark_light::Mode::Light) | Ok(dark_light::Mode::Unspecified) => ColorMode::Light,
        Err(err) => {
            tracing::debug!(error = %err, "system colour mode unavailable, assuming light");
            ColorMode::Light
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn platform_detector() -> ColorMode {
    crate::dom::prefers_dark()
        .map(ColorMode::from_prefers_dark)
        .unwrap_or_default()
}
