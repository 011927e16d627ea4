use crate::error::ClassifyError;
use crate::token::{Delim, Keyword, Kind, OpFamily, Token};
use log::debug;

// Second pass over the raw token pool: every Word is promoted to a keyword
// or an identifier, and operator/delimiter symbols are looked up in their
// tables. Literals, comments and directives pass through unchanged.
pub fn classify(mut tokens: Vec<Token>) -> Result<Vec<Token>, ClassifyError> {
    for token in &mut tokens {
        match token.kind {
            Kind::Word => {
                token.kind = match Keyword::from_word(&token.text) {
                    Some(keyword) => Kind::Keyword(keyword),
                    None => Kind::Identifier,
                };
            }
            Kind::Operator(None) => match OpFamily::from_symbol(&token.text) {
                Some(family) => token.kind = Kind::Operator(Some(family)),
                None => {
                    return Err(ClassifyError::UnknownOperator {
                        symbol: token.text.clone(),
                        position: token.position,
                    });
                }
            },
            Kind::Delimiter(None) => match Delim::from_symbol(&token.text) {
                Some(delim) => token.kind = Kind::Delimiter(Some(delim)),
                None => {
                    return Err(ClassifyError::UnknownDelimiter {
                        symbol: token.text.clone(),
                        position: token.position,
                    });
                }
            },
            _ => {}
        }
    }
    debug!("classified {} tokens", tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn finalized(source: &str) -> Vec<Token> {
        classify(Lexer::new(source).tokenize().unwrap()).unwrap()
    }

    #[test]
    fn words_are_promoted_exclusively() {
        let tokens = finalized("int main while foo");
        assert_eq!(tokens[0].kind, Kind::Keyword(Keyword::Int));
        assert_eq!(tokens[1].kind, Kind::Identifier);
        assert_eq!(tokens[2].kind, Kind::Keyword(Keyword::While));
        assert_eq!(tokens[3].kind, Kind::Identifier);
        assert!(tokens.iter().all(|token| token.kind != Kind::Word));
    }

    #[test]
    fn operator_families_follow_the_table() {
        let tokens = finalized("a + b == c && d & e");
        assert_eq!(tokens[1].kind, Kind::Operator(Some(OpFamily::Arithmetic)));
        assert_eq!(tokens[3].kind, Kind::Operator(Some(OpFamily::Relational)));
        assert_eq!(tokens[5].kind, Kind::Operator(Some(OpFamily::Logical)));
        assert_eq!(tokens[7].kind, Kind::Operator(Some(OpFamily::Special)));
    }

    #[test]
    fn unknown_operator_run_is_an_error() {
        let raw = Lexer::new("a =! b").tokenize().unwrap();
        let err = classify(raw).unwrap_err();
        assert_eq!(
            err,
            ClassifyError::UnknownOperator {
                symbol: "=!".to_string(),
                position: 2,
            }
        );
    }

    #[test]
    fn trivia_and_literals_pass_through() {
        let tokens = finalized("// note\n42");
        assert_eq!(tokens[0].kind, Kind::SingleLineComment);
        assert_eq!(tokens[1].kind, Kind::Literal);
    }
}
