//! Operator vocabulary.
//!
//! This module defines the canonical operator set along with the metadata the parser and printer share:
//! binary precedence level, associativity, fixity, and the base operator of each compound assignment.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Binary precedence is expressed as a *level* in `0..BINARY_LEVELS`, where `0` (logical-or) binds loosest
//!   and `BINARY_LEVELS - 1` (power) binds tightest. The parser climbs these levels in order.
//! - Every binary level is left-associative, `**` included.
//!
//! ## Examples
//! ```rust
//! use cflat_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("+"), Some(OperatorId::Plus));
//! assert_eq!(operators::binary_level(OperatorId::Plus), Some(8));
//! assert_eq!(operators::compound_base(OperatorId::ShlEq), Some(OperatorId::Shl));
//! ```

use super::registry::{Since, Stability};

/// Number of binary precedence levels (`0..BINARY_LEVELS`).
pub const BINARY_LEVELS: u8 = 11;

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// Define the syntactic positions an operator may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    /// Binary operator between two operands.
    Infix,
    /// Unary operator before its operand.
    Prefix,
    /// Unary operator after its operand.
    Postfix,
    /// Statement-level assignment (`=` and the compound forms).
    Assignment,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Logical
    OrOr,
    AndAnd,
    Bang,

    // Bitwise
    Pipe,
    Caret,
    Amp,
    Tilde,
    Shl,
    Shr,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,

    // Increment / decrement
    PlusPlus,
    MinusMinus,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    StarStarEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `binary_level` is `Some` only for operators usable as infix binary operators.
/// - `compound_of` is `Some` only for compound assignments; it names the binary operator the assignment desugars to.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub binary_level: Option<u8>,
    pub associativity: Associativity,
    pub fixity: &'static [Fixity],
    pub compound_of: Option<OperatorId>,
    pub since: Since,
    pub stability: Stability,
}

const INFIX: &[Fixity] = &[Fixity::Infix];
const INFIX_PREFIX: &[Fixity] = &[Fixity::Infix, Fixity::Prefix];
const PREFIX: &[Fixity] = &[Fixity::Prefix];
const AFFIX: &[Fixity] = &[Fixity::Prefix, Fixity::Postfix];
const ASSIGN: &[Fixity] = &[Fixity::Assignment];

/// Registry of all operators.
///
/// ## Notes
/// - Binary entries are listed from the loosest to the tightest level.
pub const OPERATORS: &[OperatorInfo] = &[
    // Binary, loosest first
    binary(OperatorId::OrOr, "||", 0, INFIX),
    binary(OperatorId::AndAnd, "&&", 1, INFIX),
    binary(OperatorId::Pipe, "|", 2, INFIX),
    binary(OperatorId::Caret, "^", 3, INFIX),
    binary(OperatorId::Amp, "&", 4, INFIX),
    binary(OperatorId::EqEq, "==", 5, INFIX),
    binary(OperatorId::NotEq, "!=", 5, INFIX),
    binary(OperatorId::Lt, "<", 6, INFIX),
    binary(OperatorId::LtEq, "<=", 6, INFIX),
    binary(OperatorId::Gt, ">", 6, INFIX),
    binary(OperatorId::GtEq, ">=", 6, INFIX),
    binary(OperatorId::Shl, "<<", 7, INFIX),
    binary(OperatorId::Shr, ">>", 7, INFIX),
    binary(OperatorId::Plus, "+", 8, INFIX),
    binary(OperatorId::Minus, "-", 8, INFIX_PREFIX),
    binary(OperatorId::Star, "*", 9, INFIX),
    binary(OperatorId::Slash, "/", 9, INFIX),
    binary(OperatorId::Percent, "%", 9, INFIX),
    binary(OperatorId::StarStar, "**", 10, INFIX),
    // Unary
    unary(OperatorId::Bang, "!", PREFIX),
    unary(OperatorId::Tilde, "~", PREFIX),
    unary(OperatorId::PlusPlus, "++", AFFIX),
    unary(OperatorId::MinusMinus, "--", AFFIX),
    // Assignment
    assign(OperatorId::Eq, "=", None),
    assign(OperatorId::PlusEq, "+=", Some(OperatorId::Plus)),
    assign(OperatorId::MinusEq, "-=", Some(OperatorId::Minus)),
    assign(OperatorId::StarEq, "*=", Some(OperatorId::Star)),
    assign(OperatorId::SlashEq, "/=", Some(OperatorId::Slash)),
    assign(OperatorId::PercentEq, "%=", Some(OperatorId::Percent)),
    assign(OperatorId::StarStarEq, "**=", Some(OperatorId::StarStar)),
    assign(OperatorId::AmpEq, "&=", Some(OperatorId::Amp)),
    assign(OperatorId::PipeEq, "|=", Some(OperatorId::Pipe)),
    assign(OperatorId::CaretEq, "^=", Some(OperatorId::Caret)),
    assign(OperatorId::ShlEq, "<<=", Some(OperatorId::Shl)),
    assign(OperatorId::ShrEq, ">>=", Some(OperatorId::Shr)),
];

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Binary precedence level, or `None` if `id` is not a binary operator.
pub fn binary_level(id: OperatorId) -> Option<u8> {
    info_for(id).binary_level
}

/// All binary operators that live on `level`.
///
/// ## Examples
/// ```rust
/// use cflat_core::lang::operators::{self, OperatorId};
///
/// let equality: Vec<_> = operators::ops_at_level(5).collect();
/// assert_eq!(equality, vec![OperatorId::EqEq, OperatorId::NotEq]);
/// ```
pub fn ops_at_level(level: u8) -> impl Iterator<Item = OperatorId> {
    OPERATORS
        .iter()
        .filter(move |o| o.binary_level == Some(level))
        .map(|o| o.id)
}

/// The binary operator a compound assignment desugars to (`+=` -> `+`).
pub fn compound_base(id: OperatorId) -> Option<OperatorId> {
    info_for(id).compound_of
}

/// Whether `id` is `=` or one of the compound assignment operators.
pub fn is_assignment(id: OperatorId) -> bool {
    info_for(id).fixity.contains(&Fixity::Assignment)
}

/// Whether a binary operator yields a boolean (comparison or logical).
///
/// ## Notes
/// - Levels `0`, `1`, `5` and `6` are the logical, equality and relational levels.
pub fn is_boolean_producing(id: OperatorId) -> bool {
    matches!(binary_level(id), Some(0 | 1 | 5 | 6))
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Lookup by spelling.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spelling: &'static str,
    binary_level: Option<u8>,
    associativity: Associativity,
    fixity: &'static [Fixity],
    compound_of: Option<OperatorId>,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        binary_level,
        associativity,
        fixity,
        compound_of,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

const fn binary(id: OperatorId, spelling: &'static str, level: u8, fixity: &'static [Fixity]) -> OperatorInfo {
    op(id, spelling, Some(level), Associativity::Left, fixity, None)
}

const fn unary(id: OperatorId, spelling: &'static str, fixity: &'static [Fixity]) -> OperatorInfo {
    op(id, spelling, None, Associativity::None, fixity, None)
}

const fn assign(id: OperatorId, spelling: &'static str, compound_of: Option<OperatorId>) -> OperatorInfo {
    op(id, spelling, None, Associativity::Right, ASSIGN, compound_of)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_is_populated() {
        for level in 0..BINARY_LEVELS {
            assert!(ops_at_level(level).next().is_some(), "binary level {level} has no operators");
        }
        assert!(ops_at_level(BINARY_LEVELS).next().is_none());
    }

    #[test]
    fn power_binds_tightest_and_associates_left() {
        assert_eq!(binary_level(OperatorId::StarStar), Some(BINARY_LEVELS - 1));
        assert_eq!(info_for(OperatorId::StarStar).associativity, Associativity::Left);
    }

    #[test]
    fn compound_assignments_point_at_binary_operators() {
        for info in OPERATORS {
            if let Some(base) = info.compound_of {
                assert!(is_assignment(info.id));
                assert!(binary_level(base).is_some(), "{:?} desugars to non-binary {:?}", info.id, base);
                assert_eq!(info.spelling, format!("{}=", as_str(base)));
            }
        }
    }

    #[test]
    fn boolean_producing_levels() {
        assert!(is_boolean_producing(OperatorId::OrOr));
        assert!(is_boolean_producing(OperatorId::LtEq));
        assert!(is_boolean_producing(OperatorId::NotEq));
        assert!(!is_boolean_producing(OperatorId::Amp));
        assert!(!is_boolean_producing(OperatorId::Plus));
        assert!(!is_boolean_producing(OperatorId::Bang));
    }
}
