//! Longest-match symbol table.
//!
//! The lexer recognizes operators and punctuation by scanning [`SYMBOLS`] in order and taking the first entry whose
//! spelling is a prefix of the remaining input. The table is ordered longest spelling first, so the first hit is
//! also the longest match (`<<=` before `<<` before `<`).
//!
//! ## Examples
//! ```rust
//! use cflat_core::lang::operators::OperatorId;
//! use cflat_core::lang::symbols::{self, Symbol};
//!
//! assert_eq!(symbols::longest_match("<<= 1"), Some((Symbol::Operator(OperatorId::ShlEq), 3)));
//! assert_eq!(symbols::longest_match("x"), None);
//! ```

use super::operators::OperatorId;
use super::punctuation::PunctuationId;

/// A recognized operator or punctuation symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Operator(OperatorId),
    Punctuation(PunctuationId),
}

use super::operators::OperatorId as O;
use super::punctuation::PunctuationId as P;
use self::Symbol::{Operator as Op, Punctuation as Pu};

/// Every operator and punctuation spelling, longest first.
pub const SYMBOLS: &[(&str, Symbol)] = &[
    // Three characters
    ("<<=", Op(O::ShlEq)),
    (">>=", Op(O::ShrEq)),
    ("**=", Op(O::StarStarEq)),
    // Two characters
    ("**", Op(O::StarStar)),
    ("+=", Op(O::PlusEq)),
    ("-=", Op(O::MinusEq)),
    ("*=", Op(O::StarEq)),
    ("/=", Op(O::SlashEq)),
    ("%=", Op(O::PercentEq)),
    ("&=", Op(O::AmpEq)),
    ("|=", Op(O::PipeEq)),
    ("^=", Op(O::CaretEq)),
    ("++", Op(O::PlusPlus)),
    ("--", Op(O::MinusMinus)),
    ("<<", Op(O::Shl)),
    (">>", Op(O::Shr)),
    ("||", Op(O::OrOr)),
    ("&&", Op(O::AndAnd)),
    ("<=", Op(O::LtEq)),
    (">=", Op(O::GtEq)),
    ("==", Op(O::EqEq)),
    ("!=", Op(O::NotEq)),
    // One character
    ("<", Op(O::Lt)),
    (">", Op(O::Gt)),
    ("^", Op(O::Caret)),
    ("~", Op(O::Tilde)),
    ("|", Op(O::Pipe)),
    ("&", Op(O::Amp)),
    ("!", Op(O::Bang)),
    ("+", Op(O::Plus)),
    ("-", Op(O::Minus)),
    ("*", Op(O::Star)),
    ("/", Op(O::Slash)),
    ("%", Op(O::Percent)),
    ("=", Op(O::Eq)),
    ("?", Pu(P::Question)),
    (":", Pu(P::Colon)),
    (".", Pu(P::Dot)),
    (",", Pu(P::Comma)),
    (";", Pu(P::Semicolon)),
    ("{", Pu(P::LBrace)),
    ("}", Pu(P::RBrace)),
    ("[", Pu(P::LBracket)),
    ("]", Pu(P::RBracket)),
    ("(", Pu(P::LParen)),
    (")", Pu(P::RParen)),
];

/// Longest symbol that prefixes `rest`, with its byte length.
pub fn longest_match(rest: &str) -> Option<(Symbol, usize)> {
    SYMBOLS
        .iter()
        .find(|(spelling, _)| rest.starts_with(spelling))
        .map(|(spelling, symbol)| (*symbol, spelling.len()))
}

/// Whether `c` can begin some symbol.
pub fn starts_symbol(c: char) -> bool {
    SYMBOLS.iter().any(|(spelling, _)| spelling.starts_with(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered_longest_first() {
        for pair in SYMBOLS.windows(2) {
            assert!(
                pair[0].0.len() >= pair[1].0.len(),
                "{:?} must come before {:?}",
                pair[1].0,
                pair[0].0
            );
        }
    }

    #[test]
    fn prefers_longest_spelling() {
        assert_eq!(longest_match("**=2"), Some((Op(O::StarStarEq), 3)));
        assert_eq!(longest_match("**2"), Some((Op(O::StarStar), 2)));
        assert_eq!(longest_match("*2"), Some((Op(O::Star), 1)));
        assert_eq!(longest_match("+++"), Some((Op(O::PlusPlus), 2)));
        assert_eq!(longest_match(">>"), Some((Op(O::Shr), 2)));
        assert_eq!(longest_match("< <"), Some((Op(O::Lt), 1)));
    }

    #[test]
    fn non_symbols_do_not_match() {
        assert_eq!(longest_match(""), None);
        assert_eq!(longest_match("abc"), None);
        assert_eq!(longest_match("@"), None);
        assert!(!starts_symbol('$'));
        assert!(starts_symbol('>'));
    }
}
