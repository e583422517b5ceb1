use std::collections::HashMap;

use cflat_core::lang::keywords;
use cflat_core::lang::operators;
use cflat_core::lang::punctuation;
use cflat_core::lang::symbols::{self, Symbol};

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            keywords::as_str(info.id),
            info.canonical,
            "keyword as_str mismatch for {:?}",
            info.id
        );
        assert!(
            info.canonical.chars().all(|c| c.is_ascii_lowercase()),
            "keyword {:?} must be lowercase ascii so the identifier scanner can produce it",
            info.canonical
        );

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();

    for info in operators::OPERATORS {
        assert_eq!(operators::from_str(info.spelling), Some(info.id));
        assert_eq!(operators::as_str(info.id), info.spelling);

        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!(
                "duplicate operator spelling {:?}: {:?} and {:?}",
                info.spelling, prev, info.id
            );
        }
    }
}

#[test]
fn punctuation_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, punctuation::PunctuationId> = HashMap::new();

    for info in punctuation::PUNCTUATION {
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        assert_eq!(punctuation::as_str(info.id), info.canonical);

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate punctuation spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn operators_and_punctuation_do_not_overlap() {
    for info in operators::OPERATORS {
        assert_eq!(
            punctuation::from_str(info.spelling),
            None,
            "operator spelling {:?} is also registered as punctuation",
            info.spelling
        );
    }
}

#[test]
fn symbol_table_covers_every_registry_entry() {
    for info in operators::OPERATORS {
        assert_eq!(
            symbols::longest_match(info.spelling),
            Some((Symbol::Operator(info.id), info.spelling.len())),
            "operator {:?} is not lexed as itself",
            info.spelling
        );
    }
    for info in punctuation::PUNCTUATION {
        assert_eq!(
            symbols::longest_match(info.canonical),
            Some((Symbol::Punctuation(info.id), info.canonical.len())),
            "punctuation {:?} is not lexed as itself",
            info.canonical
        );
    }
    assert_eq!(
        symbols::SYMBOLS.len(),
        operators::OPERATORS.len() + punctuation::PUNCTUATION.len()
    );
}

#[test]
fn symbol_table_agrees_with_registries() {
    for (spelling, symbol) in symbols::SYMBOLS {
        match symbol {
            Symbol::Operator(id) => assert_eq!(operators::as_str(*id), *spelling),
            Symbol::Punctuation(id) => assert_eq!(punctuation::as_str(*id), *spelling),
        }
    }
}
