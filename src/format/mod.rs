//! C-Flat Code Formatter
//!
//! Two renderings of a parsed program:
//! - [`Formatter`] prints C-Flat source with brace blocks and one declaration per line. Printing, lexing and
//!   parsing again yields a tree of the same shape.
//! - [`format_tree`] prints the brace-delimited debug dump (`Kind{field=value}@(line, col)`), laid out by
//!   [`indent_tree_text`].

mod config;
mod formatter;
mod tree;
mod writer;

pub use config::{FormatConfig, IndentStyle};
pub use formatter::Formatter;
pub use tree::{TreePrinter, indent_tree_text};

use cflat_syntax::ast::Program;
use cflat_syntax::diagnostics::CompileError;

/// Format C-Flat source code with default settings
pub fn format_source(source: &str) -> Result<String, Vec<CompileError>> {
    format_source_with_config(source, FormatConfig::default())
}

/// Format C-Flat source code with custom configuration
///
/// ## Errors
/// Returns every lex and syntax error when the source does not parse cleanly. Warnings do not block formatting.
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn format_source_with_config(source: &str, config: FormatConfig) -> Result<String, Vec<CompileError>> {
    let parsed = cflat_syntax::parse_source(source);
    if parsed.has_errors() {
        return Err(parsed.errors().cloned().collect());
    }
    Ok(Formatter::new(config).format(&parsed.program))
}

/// Check if source code is already formatted
pub fn check_formatted(source: &str) -> Result<bool, Vec<CompileError>> {
    let formatted = format_source(source)?;
    Ok(source == formatted)
}

/// Debug dump of `program`, one laid-out tree per top-level declaration.
pub fn format_tree(program: &Program, config: &FormatConfig) -> String {
    let unit = config.indent_unit();
    let mut out = String::new();
    for line in TreePrinter::new(config).program(program) {
        out.push_str(&indent_tree_text(&line, &unit));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_source_invalid_syntax() {
        let errors = format_source("var x: int = ;").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Unexpected token"));
    }

    #[test]
    fn test_format_source_empty() {
        assert_eq!(format_source("").unwrap(), "");
    }

    #[test]
    fn test_format_source_normalizes_layout() {
        let source = "fun add(a:int,b:int):int{return a+b;}";
        insta::assert_snapshot!(format_source(source).unwrap().trim_end(), @r"
        fun add(a: int, b: int): int {
            return a + b;
        }
        ");
    }

    #[test]
    fn test_format_source_control_flow() {
        let source = "fun main(!): void { var i: int = 0; \
                      for (i = 0; i < 10; i++) { if (i % 2 == 0) continue; else { print(i); } } \
                      do { i -= 1; } while (i > 0); \
                      switch (i) { case 0: break; default: i = 1; } }";
        insta::assert_snapshot!(format_source(source).unwrap().trim_end(), @r"
        fun main(!): void {
            var i: int = 0;
            for (i = 0; i < 10; i++) {
                if (i % 2 == 0)
                    continue;
                else {
                    print(i);
                }
            }
            do {
                i = i - 1;
            } while (i > 0);
            switch (i) {
                case 0: break;
                default: i = 1;
            }
        }
        ");
    }

    #[test]
    fn test_format_source_declarations() {
        let source = "enum Color { Red, Green: 5, Blue } array xs[3]: int = {1, 2, 3}; \
                      class Dog : (Animal, Pet) { var name: string = \"rex\\n\"; }";
        insta::assert_snapshot!(format_source(source).unwrap().trim_end(), @r#"
        enum Color {
            Red,
            Green: 5,
            Blue
        }

        array xs[3]: int = {1, 2, 3};

        class Dog : (Animal, Pet) {
            var name: string = "rex\n";
        }
        "#);
    }

    #[test]
    fn test_format_source_parenthesizes_only_where_needed() {
        let source = "var x: int = (a - (b - c)) * -(d + 1) ** 2 + (p.q);";
        assert_eq!(format_source(source).unwrap(), format!("{source}\n"));
    }

    #[test]
    fn test_format_source_is_idempotent() {
        let source = "struct P { var x: float = 1.50; } fun f(!): int { return x ? 1 : 2; }";
        let once = format_source(source).unwrap();
        assert!(check_formatted(&once).unwrap());
    }

    #[test]
    fn test_format_source_with_tabs() {
        let config = FormatConfig::new()
            .with_indent_width(1)
            .with_indent_style(IndentStyle::Tabs)
            .with_blank_lines_top_level(0);
        let out = format_source_with_config("fun f(!): void { return; } var y: int;", config).unwrap();
        assert_eq!(out, "fun f(!): void {\n\treturn;\n}\nvar y: int;\n");
    }

    #[test]
    fn test_format_tree_without_positions() {
        let parsed = cflat_syntax::parse_source("var x: int = 1 + 2;");
        let config = FormatConfig::new().with_indent_width(2).with_positions(false);
        insta::assert_snapshot!(format_tree(&parsed.program, &config).trim_end(), @r"
        SimpleVarDeclaration{
          name=x,
          type=int,
          init=BinaryOp{
            op=+,
            left=Integer{
              value=1
            },
            right=Integer{
              value=2
            }
          }
        }
        ");
    }

    #[test]
    fn test_format_tree_with_positions() {
        let parsed = cflat_syntax::parse_source("x++;");
        let dump = format_tree(&parsed.program, &FormatConfig::new().with_indent_width(1));
        assert_eq!(
            dump,
            "Modify{\n target=VariableAccess{\n  name=x\n }@(1, 0),\n delta=Integer{\n  value=1\n }@(1, 1),\n \
             returnPrevious=true\n}@(1, 0)\n"
        );
    }
}
