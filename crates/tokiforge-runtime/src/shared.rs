//! Driving a shared runtime from system colour-mode changes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::error::RuntimeError;
use crate::mode::ColorMode;
use crate::runtime::ThemeRuntime;
use crate::subscription::Subscription;

/// Applies `light` or `dark` now and whenever the system colour mode changes.
///
/// Both names are checked before anything happens. A change that arrives
/// while the runtime is already borrowed (for instance from inside one of
/// its own observers) is skipped with a warning instead of re-entering
/// [`ThemeRuntime::apply_theme`].
///
/// The watch replaces any earlier system watch of the runtime and ends with
/// [`ThemeRuntime::destroy`] or the returned handle.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use tokiforge_core::TokenTree;
/// use tokiforge_runtime::{
///     follow_system_theme, ColorMode, MemoryDocument, Theme, ThemeConfig, ThemeRuntime,
/// };
///
/// let config = ThemeConfig::new(vec![
///     Theme::new("day", TokenTree::new()),
///     Theme::new("night", TokenTree::new()),
/// ]).unwrap();
/// let document = MemoryDocument::with_system_theme(ColorMode::Dark);
/// let runtime = Rc::new(RefCell::new(
///     ThemeRuntime::builder(config).document(document.clone()).build().unwrap(),
/// ));
///
/// follow_system_theme(&runtime, "day", "night").unwrap();
/// assert_eq!(runtime.borrow().current_theme(), "night");
///
/// document.set_system_theme(ColorMode::Light);
/// assert_eq!(runtime.borrow().current_theme(), "day");
/// ```
pub fn follow_system_theme(
    runtime: &Rc<RefCell<ThemeRuntime>>,
    light: &str,
    dark: &str,
) -> Result<Subscription, RuntimeError> {
    let mut guard = runtime.borrow_mut();
    guard.ensure_alive()?;
    for name in [light, dark] {
        if !guard.has_theme(name) {
            return Err(RuntimeError::ThemeNotFound {
                name: name.to_string(),
                available: guard.theme_names().into_iter().map(str::to_string).collect(),
            });
        }
    }

    let pick = {
        let (light, dark) = (light.to_string(), dark.to_string());
        move |mode: ColorMode| match mode {
            ColorMode::Light => light.clone(),
            ColorMode::Dark => dark.clone(),
        }
    };

    let initial = pick(guard.detect_system_theme());
    guard.apply_theme(&initial)?;

    let weak: Weak<RefCell<ThemeRuntime>> = Rc::downgrade(runtime);
    let watch = guard.observe_system_theme(Box::new(move |mode| {
        let Some(runtime) = weak.upgrade() else {
            return;
        };
        let Ok(mut runtime) = runtime.try_borrow_mut() else {
            warn!(%mode, "runtime busy, skipping system theme change");
            return;
        };
        let name = pick(mode);
        match runtime.apply_theme(&name) {
            Ok(()) => debug!(%mode, theme = %name, "followed system theme"),
            Err(err) => warn!(%mode, error = %err, "failed to follow system theme"),
        }
    }))?;
    Ok(watch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Theme, ThemeConfig};
    use crate::document::MemoryDocument;
    use tokiforge_core::TokenTree;

    fn shared(document: &MemoryDocument) -> Rc<RefCell<ThemeRuntime>> {
        let config = ThemeConfig::new(vec![
            Theme::new("light", TokenTree::new()),
            Theme::new("dark", TokenTree::new()),
        ])
        .unwrap();
        Rc::new(RefCell::new(
            ThemeRuntime::builder(config)
                .document(document.clone())
                .build()
                .unwrap(),
        ))
    }

    #[test]
    fn test_follows_changes_until_cancelled() {
        let document = MemoryDocument::with_system_theme(ColorMode::Light);
        let runtime = shared(&document);
        let sub = follow_system_theme(&runtime, "light", "dark").unwrap();
        assert_eq!(runtime.borrow().current_theme(), "light");
        assert!(runtime.borrow().is_initialized());

        document.set_system_theme(ColorMode::Dark);
        assert_eq!(runtime.borrow().current_theme(), "dark");

        sub.cancel();
        document.set_system_theme(ColorMode::Light);
        assert_eq!(runtime.borrow().current_theme(), "dark");
    }

    #[test]
    fn test_unknown_names_rejected_up_front() {
        let document = MemoryDocument::new();
        let runtime = shared(&document);
        let err = follow_system_theme(&runtime, "light", "midnight").unwrap_err();
        assert!(matches!(err, RuntimeError::ThemeNotFound { ref name, .. } if name == "midnight"));
        assert_eq!(document.watcher_count(), 0);
        assert!(!runtime.borrow().is_initialized());
    }

    #[test]
    fn test_reentrant_change_is_skipped() {
        let document = MemoryDocument::with_system_theme(ColorMode::Light);
        let runtime = shared(&document);
        follow_system_theme(&runtime, "light", "dark").unwrap();

        // An observer that flips the system mode while the runtime is mid-apply.
        let doc = document.clone();
        runtime.borrow().subscribe(move |change| {
            if change.theme == "dark" {
                doc.set_system_theme(ColorMode::Light);
            }
        });

        document.set_system_theme(ColorMode::Dark);
        assert_eq!(runtime.borrow().current_theme(), "dark");
    }

    #[test]
    fn test_change_while_borrowed_is_skipped() {
        let document = MemoryDocument::with_system_theme(ColorMode::Light);
        let runtime = shared(&document);
        follow_system_theme(&runtime, "light", "dark").unwrap();

        {
            let _reader = runtime.borrow();
            document.set_system_theme(ColorMode::Dark);
        }
        assert_eq!(runtime.borrow().current_theme(), "light");

        document.set_system_theme(ColorMode::Dark);
        assert_eq!(runtime.borrow().current_theme(), "dark");
    }

    #[test]
    fn test_destroy_stops_following() {
        let document = MemoryDocument::with_system_theme(ColorMode::Light);
        let runtime = shared(&document);
        follow_system_theme(&runtime, "light", "dark").unwrap();
        runtime.borrow_mut().destroy();
        assert_eq!(document.watcher_count(), 0);

        document.set_system_theme(ColorMode::Dark);
        assert_eq!(runtime.borrow().current_theme(), "light");
    }

    #[test]
    fn test_dropped_runtime_is_ignored() {
        let document = MemoryDocument::with_system_theme(ColorMode::Light);
        let runtime = shared(&document);
        follow_system_theme(&runtime, "light", "dark").unwrap();
        drop(runtime);
        document.set_system_theme(ColorMode::Dark);
    }
}
