use serde::Serialize;
use tokiforge_core::TokenTree;

/// Name of the DOM event dispatched on every theme change.
pub const THEME_CHANGE_EVENT: &str = "tokiforge:theme-change";

/// Delivered to observers after every successful
/// [`apply_theme`](crate::ThemeRuntime::apply_theme).
///
/// Serializes as `{"theme": …, "tokens": …}`, the `detail` of the DOM event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeChange {
    pub theme: String,
    /// The resolved tokens of the new theme.
    pub tokens: TokenTree,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_event_detail() {
        let change = ThemeChange {
            theme: "dark".into(),
            tokens: TokenTree::from_value(json!({"bg": {"value": "#000"}})).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({"theme": "dark", "tokens": {"bg": {"value": "#000"}}})
        );
    }
}
