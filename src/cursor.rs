use crate::error::ParseError;
use crate::token::{Kind, Token};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookaheadHit {
    Low,
    High,
}

// Random-access view over a finalized token sequence. Past the last token,
// `current` yields an end-of-stream sentinel instead of panicking.
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
    eof: Token,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map(|token| token.position + token.text.len())
            .unwrap_or(0);
        let eof = Token {
            id: tokens.len(),
            kind: Kind::Eof,
            text: "EndOfFile".to_string(),
            position: end,
        };
        Self {
            tokens,
            position: 0,
            eof,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn current(&self) -> &Token {
        self.token_at(0)
    }

    pub fn token_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.position + offset).unwrap_or(&self.eof)
    }

    pub fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    // Consume the current token if it has the expected kind; on mismatch the
    // cursor stays put and the caller gets the offending token back.
    pub fn expect(&mut self, expected: Kind) -> Result<Token, ParseError> {
        let current = self.current();
        if current.kind == expected {
            let token = current.clone();
            trace!("match {:?} at offset {}", expected, token.position);
            self.advance();
            Ok(token)
        } else {
            trace!(
                "match failed: expecting {:?}, found {:?} at offset {}",
                expected,
                current.kind,
                current.position
            );
            Err(ParseError::UnexpectedToken {
                expected,
                found: current.kind,
                text: current.text.clone(),
                position: current.position,
            })
        }
    }

    pub fn peek(&self, expected: Kind, offset: usize) -> bool {
        let hit = self.token_at(offset).kind == expected;
        trace!("peek {:?} (+{}) -> {}", expected, offset, hit);
        hit
    }

    // Scan forward without consuming until one of the two targets appears.
    // Low-first and high-first are the two branch outcomes; reaching the end
    // of the stream first is None.
    pub fn lookahead<L, H>(&self, low: L, high: H) -> Option<LookaheadHit>
    where
        L: Fn(&Kind) -> bool,
        H: Fn(&Kind) -> bool,
    {
        let mut scan = self.position;
        while scan < self.tokens.len() {
            let kind = &self.tokens[scan].kind;
            if low(kind) {
                trace!("lookahead hit low at index {}", scan);
                return Some(LookaheadHit::Low);
            }
            if high(kind) {
                trace!("lookahead hit high at index {}", scan);
                return Some(LookaheadHit::High);
            }
            scan += 1;
        }
        trace!("lookahead ran off the end of the stream");
        None
    }
}
