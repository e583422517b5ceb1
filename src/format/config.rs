//! Formatting configuration for C-Flat
//!
//! Brace-delimited blocks, one declaration per line, configurable indentation.

/// Formatting configuration
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Number of indent characters per level
    pub indent_width: usize,
    /// Character used for indentation
    pub indent_style: IndentStyle,
    /// Number of blank lines between top-level declarations
    pub blank_lines_top_level: usize,
    /// Append `@(line, col)` to every node in tree dumps
    pub show_positions: bool,
}

/// Indentation character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Spaces,
    Tabs,
}

impl IndentStyle {
    pub fn unit(self) -> char {
        match self {
            IndentStyle::Spaces => ' ',
            IndentStyle::Tabs => '\t',
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            indent_style: IndentStyle::Spaces,
            blank_lines_top_level: 1,
            show_positions: true,
        }
    }
}

impl FormatConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the indentation character
    pub fn with_indent_style(mut self, style: IndentStyle) -> Self {
        self.indent_style = style;
        self
    }

    pub fn with_blank_lines_top_level(mut self, count: usize) -> Self {
        self.blank_lines_top_level = count;
        self
    }

    /// Toggle `@(line, col)` annotations in tree dumps
    pub fn with_positions(mut self, show: bool) -> Self {
        self.show_positions = show;
        self
    }

    /// One level of indentation as text.
    pub fn indent_unit(&self) -> String {
        std::iter::repeat_n(self.indent_style.unit(), self.indent_width).collect()
    }
}
