pub mod classifier;
pub mod config;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use crate::classifier::classify;
pub use crate::error::{ClassifyError, CompileError, LexError, ParseError};
pub use crate::lexer::Lexer;
pub use crate::parser::{AstNode, Diagnostics, Parser};
pub use crate::token::{Delim, Keyword, Kind, OpFamily, Token};

use log::debug;

// Lex then classify: the finalized token sequence, ready for the parser.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let raw = Lexer::new(source).tokenize().map_err(CompileError::Lex)?;
    let tokens = classify(raw).map_err(CompileError::Classify)?;
    debug!("finalized {} tokens", tokens.len());
    Ok(tokens)
}

pub fn parse(tokens: Vec<Token>) -> Result<AstNode, CompileError> {
    let mut parser = Parser::new(tokens);
    let program = parser.parse().map_err(CompileError::Syntax)?;
    debug!("parse complete ({})", parser.diagnostics());
    Ok(program)
}

pub fn parse_source(source: &str) -> Result<AstNode, CompileError> {
    parse(tokenize(source)?)
}
