//! Layering guardrails to keep the front end crates free of the driver stack.
//!
//! `cflat_core` holds pure vocabulary and must stay dependency-free. `cflat_syntax` may use the diagnostics and
//! logging crates, but the CLI and subscriber crates belong to the `cflat` driver only.
//! These tests scan the crate manifests and fail if a forbidden dependency appears in `[dependencies]`.

fn main_dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_has_no_dependencies() {
    let deps = main_dependencies(include_str!("../crates/cflat_core/Cargo.toml"));
    assert!(deps.is_empty(), "`cflat_core` must stay dependency-free, found {deps:?}");
}

#[test]
fn syntax_does_not_depend_on_driver_stack() {
    let deps = main_dependencies(include_str!("../crates/cflat_syntax/Cargo.toml"));
    assert!(deps.iter().any(|d| d == "cflat_core"), "`cflat_syntax` should build on `cflat_core`");
    for forbidden in ["cflat", "clap", "tracing-subscriber", "insta"] {
        assert!(
            !deps.iter().any(|d| d == forbidden),
            "`{forbidden}` must not appear in cflat_syntax [dependencies]"
        );
    }
}

#[test]
fn driver_depends_on_both_front_end_crates() {
    let deps = main_dependencies(include_str!("../Cargo.toml"));
    assert!(deps.iter().any(|d| d == "cflat_core"));
    assert!(deps.iter().any(|d| d == "cflat_syntax"));
    assert!(!deps.iter().any(|d| d == "proptest"), "proptest belongs in [dev-dependencies]");
}
