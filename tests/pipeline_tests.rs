// Tests for the lexing and classification halves of the pipeline.

use subc::error::{ClassifyError, CompileError};
use subc::{Keyword, Kind, OpFamily, Token};

fn finalized(source: &str) -> Vec<Token> {
    subc::tokenize(source).expect("tokenize failed")
}

#[test]
fn token_texts_and_whitespace_reconstruct_the_source() {
    let source =
        "#include <stdio.h>\nint main ( ) { /* body */ return 0 ; } // done\n";
    let tokens = finalized(source);

    let mut position = 0;
    for token in &tokens {
        let gap = &source[position..token.position];
        assert!(
            gap.chars().all(char::is_whitespace),
            "dropped non-whitespace span {:?} before token {}",
            gap,
            token.id
        );
        assert_eq!(
            &source[token.position..token.position + token.text.len()],
            token.text
        );
        position = token.position + token.text.len();
    }
    assert!(source[position..].chars().all(char::is_whitespace));
}

#[test]
fn finalized_ids_match_their_index() {
    let tokens = finalized("int add ( int a , int b ) { return a + b ; }");
    for (index, token) in tokens.iter().enumerate() {
        assert_eq!(token.id, index);
    }
}

#[test]
fn no_word_survives_classification() {
    let tokens = finalized("static int counter ; void tick ( ) ;");
    assert!(tokens.iter().all(|token| token.kind != Kind::Word));
    for token in &tokens {
        match token.kind {
            Kind::Keyword(_) | Kind::Identifier => {
                assert!(Keyword::from_word(&token.text).is_some() ^ (token.kind == Kind::Identifier));
            }
            Kind::Operator(family) => assert!(family.is_some()),
            Kind::Delimiter(delim) => assert!(delim.is_some()),
            _ => {}
        }
    }
}

#[test]
fn lexical_errors_are_deterministic() {
    let source = "int x = `garbage` ;";
    let first = subc::tokenize(source).unwrap_err();
    let second = subc::tokenize(source).unwrap_err();
    match (&first, &second) {
        (CompileError::Lex(a), CompileError::Lex(b)) => {
            assert_eq!(a, b);
            assert_eq!(a.offset, 8);
            assert_eq!(a.text, "`");
        }
        other => panic!("expected lex errors, got {:?}", other),
    }
}

#[test]
fn unknown_operator_run_fails_classification() {
    let err = subc::tokenize("a =! b").unwrap_err();
    match err {
        CompileError::Classify(ClassifyError::UnknownOperator { symbol, .. }) => {
            assert_eq!(symbol, "=!");
        }
        other => panic!("expected an unknown operator, got {:?}", other),
    }
}

#[test]
fn ambiguous_symbols_keep_their_special_family() {
    let tokens = finalized("a & b * c : d");
    let families: Vec<_> = tokens
        .iter()
        .filter_map(|token| match token.kind {
            Kind::Operator(family) => family,
            _ => None,
        })
        .collect();
    assert_eq!(
        families,
        vec![OpFamily::Special, OpFamily::Special, OpFamily::Special]
    );
}

#[test]
fn comments_and_directives_are_kept_in_the_pool() {
    let tokens = finalized("#define MAX 10\n// count\nint x ; /* note */");
    let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
    assert!(kinds.contains(&Kind::Preprocessor));
    assert!(kinds.contains(&Kind::SingleLineComment));
    assert!(kinds.contains(&Kind::MultiLineComment));
}
