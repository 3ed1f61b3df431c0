//! Token documents through to generated files and live themes.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use insta::assert_snapshot;
use serial_test::serial;
use tempfile::TempDir;
use tokiforge::prelude::*;
use tokiforge::{check_file, reset_theme_detector, set_theme_detector, ExportTarget};

const TOKENS: &str = r##"{
    "color": {
        "primary": {"value": "#7C3AED", "type": "color"},
        "text": {"value": "{color.primary}"}
    },
    "spacing": {
        "md": {"value": 16, "type": "dimension"}
    }
}"##;

fn resolved() -> TokenTree {
    parse_tokens(TOKENS, SourceFormat::Json, ParseOptions::default()).unwrap()
}

#[test]
fn default_theme_is_injected_on_init() {
    let config = ThemeConfig::from_json(
        r##"{
            "themes": [{"name": "light", "tokens": {"color": {"primary": {"value": "#7C3AED", "type": "color"}}}}],
            "defaultTheme": "light"
        }"##,
    )
    .unwrap();
    let document = MemoryDocument::new();
    let mut runtime = ThemeRuntime::builder(config)
        .document(document.clone())
        .build()
        .unwrap();
    runtime.init().unwrap();

    let css = document.style(DEFAULT_STYLE_ID).unwrap();
    assert!(css.contains(":root {"));
    assert!(css.contains("--hf-color-primary: #7C3AED;"));
}

#[test]
fn css_export() {
    let css = export(&resolved(), &ExportOptions::new(ExportFormat::Css)).unwrap();
    assert_snapshot!(css, @r###"
:root {
  --hf-color-primary: #7C3AED;
  --hf-color-text: #7C3AED;
  --hf-spacing-md: 16;
}
"###);
}

#[test]
fn css_export_with_custom_target() {
    let options = ExportOptions::new(ExportFormat::Css)
        .selector("[data-theme=\"dark\"]")
        .prefix("brandKit");
    let css = export(&resolved(), &options).unwrap();
    assert_snapshot!(css, @r###"
[data-theme="dark"] {
  --brand-kit-color-primary: #7C3AED;
  --brand-kit-color-text: #7C3AED;
  --brand-kit-spacing-md: 16;
}
"###);
}

#[test]
fn scss_export_keeps_unresolved_aliases_as_variables() {
    let raw = parse_tokens(TOKENS, SourceFormat::Json, ParseOptions::raw()).unwrap();
    let scss = export(&raw, &ExportOptions::new(ExportFormat::Scss)).unwrap();
    assert_snapshot!(scss, @r###"
$hf-color-primary: #7C3AED;
$hf-color-text: $hf-color-primary;
$hf-spacing-md: 16;
"###);
}

#[test]
fn ts_export() {
    let ts = export(&resolved(), &ExportOptions::new(ExportFormat::Ts)).unwrap();
    assert_snapshot!(ts, @r###"
export type DesignTokens = {
  color: {
    primary: string;
    text: string;
  };
  spacing: {
    md: number;
  };
};

const tokens: DesignTokens = {
  "color": {
    "primary": "#7C3AED",
    "text": "#7C3AED"
  },
  "spacing": {
    "md": 16
  }
};

export default tokens;
"###);
}

#[test]
fn js_export_with_variables() {
    let js = export(
        &resolved(),
        &ExportOptions::new(ExportFormat::Js).variables(true),
    )
    .unwrap();
    assert_snapshot!(js, @r###"
export default {
  "color": {
    "primary": "var(--hf-color-primary)",
    "text": "var(--hf-color-text)"
  },
  "spacing": {
    "md": "var(--hf-spacing-md)"
  }
};
"###);
}

#[test]
fn check_report_for_orphaned_alias() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tokens.yaml");
    std::fs::write(
        &path,
        "color:\n  base:\n    value: '#000'\n  text:\n    value: '{color.missing}'\n",
    )
    .unwrap();

    let report = check_file(&path, CheckOptions::default());
    assert_eq!(report.exit_code(), 0);
    assert_snapshot!(report.render().trim_end(), @r###"
Token Check Report
==================================================
Status: PASSED

Checks:
  ✓ Token Validation
  ✗ Alias Validation: 1 alias error(s) found

Warnings:
  ⚠ color.text references non-existent token color.missing
"###);

    let strict = check_file(&path, CheckOptions::strict());
    assert_eq!(strict.exit_code(), 1);
    assert_eq!(
        strict.errors,
        vec!["color.text references non-existent token color.missing"]
    );
}

fn write_outputs(plan: &[ExportTarget], tokens: &TokenTree) {
    for target in plan {
        let text = export(tokens, &target.options).unwrap();
        if let Some(parent) = target.path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&target.path, text).unwrap();
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn project_config_drives_batch_export() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::write(root.join("tokens.json"), TOKENS).unwrap();
    std::fs::write(
        root.join("tokiforge.config.json"),
        r#"{
            "input": "tokens.json",
            "output": {"ts": "dist/tokens.ts", "css": "dist/tokens.css", "json": "dist/tokens.json"},
            "prefix": "ds"
        }"#,
    )
    .unwrap();

    let config = ProjectConfig::discover(root).unwrap().unwrap();
    let tokens = load_tokens(config.input_path(root), ParseOptions::default()).unwrap();
    let plan = config.export_plan(root);
    let formats: Vec<ExportFormat> = plan.iter().map(|t| t.options.format).collect();
    assert_eq!(
        formats,
        vec![ExportFormat::Css, ExportFormat::Ts, ExportFormat::Json]
    );

    write_outputs(&plan, &tokens);

    let css = read(&root.join("dist/tokens.css"));
    assert!(css.contains("--ds-color-text: #7C3AED;"));

    let ts = read(&root.join("dist/tokens.ts"));
    assert!(ts.contains("\"primary\": \"var(--ds-color-primary)\""));
    assert!(ts.contains("md: string;"));

    let json: TokenTree = serde_json::from_str(&read(&root.join("dist/tokens.json"))).unwrap();
    assert_eq!(json, tokens);
}

#[test]
fn theme_switching_round_trip() {
    let config = ThemeConfig::from_yaml(
        "themes:\n  - name: light\n    tokens:\n      surface: { value: '#ffffff' }\n      card: { value: '{surface}' }\n  - name: dark\n    tokens:\n      surface: { value: '#111111' }\n      card: { value: '{surface}' }\ndefaultTheme: dark\n",
    )
    .unwrap();
    let document = MemoryDocument::new();
    let store = MemoryStore::new();
    let mut runtime = ThemeRuntime::builder(config)
        .document(document.clone())
        .store(store.clone())
        .selector("[data-theme]")
        .build()
        .unwrap();

    let names = Rc::new(RefCell::new(Vec::new()));
    let n = names.clone();
    let sub = runtime.subscribe(move |change| n.borrow_mut().push(change.theme.clone()));

    runtime.init().unwrap();
    assert_snapshot!(document.style(DEFAULT_STYLE_ID).unwrap(), @r###"
[data-theme] {
  --hf-surface: #111111;
  --hf-card: #111111;
}
"###);

    assert_eq!(runtime.next_theme().unwrap(), "light");
    assert_eq!(runtime.next_theme().unwrap(), "dark");
    sub.cancel();
    runtime.apply_theme("light").unwrap();

    assert_eq!(*names.borrow(), vec!["light", "dark"]);
    assert_eq!(document.events().len(), 3);
    assert_eq!(store.get(tokiforge::DEFAULT_STORAGE_KEY).as_deref(), Some("light"));

    runtime.destroy();
    assert!(document.style_ids().is_empty());
}

#[test]
fn follows_system_theme_on_a_shared_runtime() {
    let config = ThemeConfig::from_json(
        r##"{"themes": [
            {"name": "paper", "tokens": {"bg": {"value": "#fff"}}},
            {"name": "ink", "tokens": {"bg": {"value": "#000"}}}
        ]}"##,
    )
    .unwrap();
    let document = MemoryDocument::with_system_theme(ColorMode::Dark);
    let runtime = Rc::new(RefCell::new(
        ThemeRuntime::builder(config)
            .document(document.clone())
            .build()
            .unwrap(),
    ));

    let watch = follow_system_theme(&runtime, "paper", "ink").unwrap();
    assert_eq!(runtime.borrow().current_theme(), "ink");
    assert_eq!(document.style(DEFAULT_STYLE_ID).unwrap(), ":root {\n  --hf-bg: #000;\n}");

    document.set_system_theme(ColorMode::Light);
    assert_eq!(runtime.borrow().current_theme(), "paper");

    watch.cancel();
    document.set_system_theme(ColorMode::Dark);
    assert_eq!(runtime.borrow().current_theme(), "paper");
}

#[test]
#[serial]
fn headless_runtime_uses_process_detector() {
    set_theme_detector(|| ColorMode::Dark);
    let config = ThemeConfig::from_json(
        r##"{"themes": [
            {"name": "light", "tokens": {"bg": {"value": "#fff"}}},
            {"name": "dark", "tokens": {"bg": {"value": "#000"}}}
        ]}"##,
    )
    .unwrap();
    let runtime = Rc::new(RefCell::new(ThemeRuntime::new(config).unwrap()));
    follow_system_theme(&runtime, "light", "dark").unwrap();
    assert_eq!(runtime.borrow().current_theme(), "dark");
    reset_theme_detector();
}
