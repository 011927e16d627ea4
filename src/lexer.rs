use crate::error::LexError;
use crate::token::{Kind, Token};
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

// One composite pattern, evaluated left to right over the whole input.
// Alternative order is load-bearing: comment markers must be tried before
// the operator run (`/*` and `//` both prefix-match `/`), the directive
// before anything else that could start at `#`, and literals before words
// (`true` would otherwise lex as an identifier).
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let ml_comment = r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/";
    let sl_comment = r"//[^\n]*";
    let directive = r"#[ \t]*\w+[^\n]*\n?";
    let newline = r"\n";
    let literal = r#"(?:0b)?\d[.\d]?\d*|"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|(?:true|false)\b"#;
    let word = r"[A-Za-z_][A-Za-z0-9_]*";
    let operator = r"[+\-*/%=!<>&|^~?:]+";
    let delimiter = r"[{}()\[\],.;]";

    Regex::new(&format!(
        "({ml_comment})|({sl_comment})|({directive})|({newline})|({literal})|({word})|({operator})|({delimiter})"
    ))
    .expect("token pattern must compile")
});

// Capture group index to base category. Group 4 is a bare newline, which is
// discarded along with all other whitespace.
const GROUP_KINDS: [(usize, Kind); 7] = [
    (1, Kind::MultiLineComment),
    (2, Kind::SingleLineComment),
    (3, Kind::Preprocessor),
    (5, Kind::Literal),
    (6, Kind::Word),
    (7, Kind::Operator(None)),
    (8, Kind::Delimiter(None)),
];

pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        debug!("lexing {} bytes", self.source.len());
        let mut tokens = Vec::new();
        let mut last_end = 0;

        for caps in TOKEN_PATTERN.captures_iter(self.source) {
            let whole = caps.get(0).unwrap();
            self.check_gap(last_end, whole.start())?;
            last_end = whole.end();

            for (group, kind) in GROUP_KINDS {
                if let Some(matched) = caps.get(group) {
                    let token = Token {
                        id: tokens.len(),
                        kind,
                        text: matched.as_str().to_string(),
                        position: matched.start(),
                    };
                    trace!("{}", token);
                    tokens.push(token);
                    break;
                }
            }
        }

        self.check_gap(last_end, self.source.len())?;
        debug!("lexed {} raw tokens", tokens.len());
        Ok(tokens)
    }

    // Everything between two matches must be whitespace; anything else is a
    // span no alternative covers, surfaced as a hard error rather than
    // silently dropped.
    fn check_gap(&self, from: usize, to: usize) -> Result<(), LexError> {
        let gap = &self.source[from..to];
        if let Some(at) = gap.find(|c: char| !c.is_whitespace()) {
            return Err(LexError {
                offset: from + at,
                text: gap[at..].trim_end().to_string(),
            });
        }
        Ok(())
    }
}
