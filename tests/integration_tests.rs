//! Integration tests for the C-Flat front end

use std::fs;
use std::path::{Path, PathBuf};

use cflat::ast::{Declaration, Statement, Type};
use cflat::diagnostics::{CompileError, ErrorKind};
use cflat::format::{FormatConfig, format_source, format_tree};
use cflat::{annotate, parse_source};

/// Helper to run the whole front end on a source file
fn check_file(path: &Path) -> Result<usize, Vec<String>> {
    let source = fs::read_to_string(path).map_err(|e| vec![e.to_string()])?;
    let parsed = parse_source(&source);
    if parsed.has_errors() {
        return Err(parsed.errors().map(CompileError::to_string).collect());
    }
    Ok(parsed.program.declarations.len())
}

fn fixtures(kind: &str) -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(kind);
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().map(|e| e == "cb").unwrap_or(false))
        .collect();
    paths.sort();
    paths
}

/// Test that all valid fixtures parse without errors
#[test]
fn test_valid_fixtures() {
    let paths = fixtures("valid");
    assert!(!paths.is_empty());
    for path in paths {
        let result = check_file(&path);
        assert!(
            result.is_ok(),
            "Expected {} to parse cleanly, got errors: {:?}",
            path.display(),
            result.unwrap_err()
        );
    }
}

/// Test that invalid fixtures produce errors
#[test]
fn test_invalid_fixtures() {
    let paths = fixtures("invalid");
    assert!(!paths.is_empty());
    for path in paths {
        assert!(
            check_file(&path).is_err(),
            "Expected {} to fail, but it parsed cleanly",
            path.display()
        );
    }
}

#[test]
fn test_valid_fixtures_survive_formatting() {
    for path in fixtures("valid") {
        let source = fs::read_to_string(&path).unwrap();
        let formatted = format_source(&source).unwrap();
        let reparsed = parse_source(&formatted);
        assert!(!reparsed.has_errors(), "{} formatted badly:\n{}", path.display(), formatted);
        assert_eq!(
            parse_source(&source).program.declarations.len(),
            reparsed.program.declarations.len(),
            "{}",
            path.display()
        );
        assert_eq!(format_source(&formatted).unwrap(), formatted, "{}", path.display());
    }
}

#[test]
fn test_shapes_fixture_structure() {
    let source = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/valid/shapes.cb")).unwrap();
    let parsed = parse_source(&source);
    let kinds: Vec<&str> = parsed
        .program
        .declarations
        .iter()
        .map(|d| match &d.kind {
            Declaration::Enum(_) => "enum",
            Declaration::Struct(_) => "struct",
            Declaration::Class(_) => "class",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["enum", "struct", "class", "class", "class"]);

    let Declaration::Enum(kind) = &parsed.program.declarations[0].kind else {
        panic!("expected enum");
    };
    let values: Vec<i64> = kind.members.iter().map(|m| m.value).collect();
    assert_eq!(values, vec![0, 4, 5]);

    let Declaration::Class(badge) = &parsed.program.declarations[4].kind else {
        panic!("expected class");
    };
    assert_eq!(badge.inherits, vec!["Shape".to_string(), "Point".to_string()]);
}

#[test]
fn test_recovery_keeps_declarations_after_errors() {
    let source = "var a: int = 1;\nvar b: int = ;\nfun f(!) : int { return 1 }\nvar c: int = 2;\n";
    let parsed = parse_source(source);
    assert_eq!(parsed.errors().count(), 2);
    let names: Vec<&str> = parsed
        .program
        .declarations
        .iter()
        .filter_map(|d| match &d.kind {
            Declaration::Var(v) => Some(v.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["a", "c"]);
}

#[test]
fn test_errors_are_reported_in_source_order() {
    let parsed = parse_source("var s: string = \"open;\nvar x: int = ;\nwhile (go()) { }\n");
    let lines: Vec<usize> = parsed.errors().map(|e| e.pos.line).collect();
    assert_eq!(parsed.errors().next().map(|e| e.kind), Some(ErrorKind::Lex));
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
}

#[test]
fn test_warnings_do_not_block_output() {
    let parsed = parse_source("var x = 3;\nif (true) x = 1;\n");
    assert!(!parsed.has_errors());
    assert_eq!(parsed.warnings().count(), 3);
    let formatted = format_source("var x = 3;\nif (true) x = 1;\n").unwrap();
    assert_eq!(formatted, "var x = 3;\n\nif (true)\n    x = 1;\n");
}

#[test]
fn test_annotate_then_dump() {
    let parsed = parse_source("var x: float = 1 + 2.5;\nwhile (x > 0) { x = x - 1; }\n");
    assert!(!parsed.has_errors());
    assert!(annotate(&parsed.program) > 0);

    let Declaration::Stmt(Statement::While(w)) = &parsed.program.declarations[1].kind else {
        panic!("expected while");
    };
    assert_eq!(w.condition.ty.get(), Some(&Type::Bool));

    let dump = format_tree(&parsed.program, &FormatConfig::new().with_positions(false));
    assert!(dump.contains("annotation=float"), "{dump}");
    assert!(dump.contains("annotation=bool"), "{dump}");
}

#[test]
fn test_tree_dump_positions_follow_source() {
    let parsed = parse_source("var a: int;\n  a = 2;\n");
    let dump = format_tree(&parsed.program, &FormatConfig::new());
    assert!(dump.contains("}@(1, 0)"), "{dump}");
    assert!(dump.contains("}@(2, 2)"), "{dump}");
}
