//! Output writer with indentation tracking
//!
//! Handles writing formatted code with proper indentation.

use super::config::FormatConfig;

/// Writer that tracks indentation and builds formatted output
pub struct FormatWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// One level of indentation, precomputed from the config
    unit: String,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl FormatWriter {
    /// Create a new format writer with the given config
    pub fn new(config: &FormatConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            unit: config.indent_unit(),
            at_line_start: true,
        }
    }

    /// Get the formatted output
    pub fn finish(self) -> String {
        self.output
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.unit);
            }
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a string and newline
    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write just a newline
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write multiple blank lines (for spacing between declarations)
    pub fn blank_lines(&mut self, count: usize) {
        for _ in 0..count {
            self.newline();
        }
    }

    pub fn current_indent(&self) -> usize {
        self.indent_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::config::IndentStyle;

    fn default_writer() -> FormatWriter {
        FormatWriter::new(&FormatConfig::default())
    }

    #[test]
    fn test_write_empty_string() {
        let mut writer = default_writer();
        writer.write("");
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_writeln_multiple() {
        let mut writer = default_writer();
        writer.writeln("line1");
        writer.writeln("line2");
        assert_eq!(writer.finish(), "line1\nline2\n");
    }

    #[test]
    fn test_dedent_at_zero_stays_zero() {
        let mut writer = default_writer();
        writer.dedent();
        assert_eq!(writer.current_indent(), 0);
    }

    #[test]
    fn test_blank_lines_between_content() {
        let mut writer = default_writer();
        writer.writeln("line1");
        writer.blank_lines(2);
        writer.writeln("line2");
        assert_eq!(writer.finish(), "line1\n\n\nline2\n");
    }

    #[test]
    fn test_blank_lines_carry_no_indent() {
        let mut writer = default_writer();
        writer.indent();
        writer.writeln("a");
        writer.newline();
        writer.writeln("b");
        assert_eq!(writer.finish(), "    a\n\n    b\n");
    }

    #[test]
    fn test_nested_indentation() {
        let config = FormatConfig::new().with_indent_width(2);
        let mut writer = FormatWriter::new(&config);

        writer.writeln("fun main(!) {");
        writer.indent();
        writer.writeln("if (x < 1) {");
        writer.indent();
        writer.writeln("f(x);");
        writer.dedent();
        writer.writeln("}");
        writer.dedent();
        writer.writeln("}");

        let expected = "fun main(!) {\n  if (x < 1) {\n    f(x);\n  }\n}\n";
        assert_eq!(writer.finish(), expected);
    }

    #[test]
    fn test_tab_indentation() {
        let config = FormatConfig::new()
            .with_indent_width(1)
            .with_indent_style(IndentStyle::Tabs);
        let mut writer = FormatWriter::new(&config);
        writer.indent();
        writer.indent();
        writer.write("x");
        assert_eq!(writer.finish(), "\t\tx");
    }
}
