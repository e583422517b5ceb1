//! Define the reserved keyword vocabulary for the C-Flat language.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings,
//! categories and usage hints.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**. C-Flat has no keyword aliases.
//! - Every keyword lexes to its own token kind, so `true`/`false` are keywords here and become boolean
//!   literals in the parser.
//!
//! ## Examples
//! ```rust
//! use cflat_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("fun"), Some(KeywordId::Fun));
//! assert_eq!(keywords::from_str("Fun"), None);
//! assert_eq!(keywords::as_str(KeywordId::Fun), "fun");
//! ```

use super::registry::{Since, Stability};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Control flow / statements
    If,
    Else,
    For,
    Foreach,
    While,
    Do,
    Switch,
    Case,
    Default,
    Try,
    Catch,
    Throw,
    Return,
    Goto,
    Break,
    Continue,

    // Declarations
    Var,
    Array,
    Enum,
    Class,
    Struct,
    Fun,
    Lambda,

    // Literals
    True,
    False,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; they do not enforce parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    ControlFlow,
    Declaration,
    Literal,
}

/// Usage context hint (not enforced here; the parser owns context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordUsage {
    /// Introduces or continues a statement.
    Statement,
    /// Introduces a declaration.
    Declaration,
    /// Appears in expression position.
    Expression,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub usage: KeywordUsage,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Control flow / statements
    info(KeywordId::If, "if", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Foreach, "foreach", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Do, "do", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Switch, "switch", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Case, "case", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Default, "default", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Try, "try", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Catch, "catch", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Throw, "throw", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Goto, "goto", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow, KeywordUsage::Statement),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow, KeywordUsage::Statement),

    // Declarations
    info(KeywordId::Var, "var", KeywordCategory::Declaration, KeywordUsage::Declaration),
    info(KeywordId::Array, "array", KeywordCategory::Declaration, KeywordUsage::Declaration),
    info(KeywordId::Enum, "enum", KeywordCategory::Declaration, KeywordUsage::Declaration),
    info(KeywordId::Class, "class", KeywordCategory::Declaration, KeywordUsage::Declaration),
    info(KeywordId::Struct, "struct", KeywordCategory::Declaration, KeywordUsage::Declaration),
    info(KeywordId::Fun, "fun", KeywordCategory::Declaration, KeywordUsage::Declaration),
    info(KeywordId::Lambda, "lambda", KeywordCategory::Declaration, KeywordUsage::Expression),

    // Literals
    info(KeywordId::True, "true", KeywordCategory::Literal, KeywordUsage::Expression),
    info(KeywordId::False, "false", KeywordCategory::Literal, KeywordUsage::Expression),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The canonical spelling for `id`.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Usage hint.
pub fn usage(id: KeywordId) -> KeywordUsage {
    info_for(id).usage
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if `s` is a reserved word, `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory, usage: KeywordUsage) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        usage,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(from_str("while"), Some(KeywordId::While));
        assert_eq!(from_str("While"), None);
        assert_eq!(from_str("WHILE"), None);
    }

    #[test]
    fn literal_keywords_are_expressions() {
        for id in [KeywordId::True, KeywordId::False] {
            assert_eq!(category(id), KeywordCategory::Literal);
            assert_eq!(usage(id), KeywordUsage::Expression);
        }
    }
}
