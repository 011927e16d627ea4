use crate::parser::Diagnostics;
use crate::token::Kind;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum CompileError {
    FileNotFound(String),
    Io(std::io::Error),
    Lex(LexError),
    Classify(ClassifyError),
    Syntax(ParseError),
}

impl Error for CompileError {}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompileError::FileNotFound(err) => writeln!(f, "FileNotFoundError: {}", err),
            CompileError::Io(err) => writeln!(f, "IOError: {}", err),
            CompileError::Lex(err) => writeln!(f, "LexError: {}", err),
            CompileError::Classify(err) => writeln!(f, "ClassificationError: {}", err),
            CompileError::Syntax(err) => writeln!(f, "SyntaxError: {}", err),
        }
    }
}

// A span of source text matched by none of the lexical alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub offset: usize,
    pub text: String,
}

impl Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "no lexical rule matches {:?} at offset {}",
            self.text, self.offset
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyError {
    UnknownOperator { symbol: String, position: usize },
    UnknownDelimiter { symbol: String, position: usize },
}

impl Error for ClassifyError {}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifyError::UnknownOperator { symbol, position } => write!(
                f,
                "operator symbol {:?} has no table entry (offset {})",
                symbol, position
            ),
            ClassifyError::UnknownDelimiter { symbol, position } => write!(
                f,
                "delimiter symbol {:?} has no table entry (offset {})",
                symbol, position
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedToken {
        expected: Kind,
        found: Kind,
        text: String,
        position: usize,
    },
    ForwardProgress {
        position: usize,
    },
    UnresolvedConstruct {
        found: Kind,
        text: String,
        position: usize,
    },
    Halted {
        statement: usize,
        position: usize,
        text: String,
        diagnostics: Diagnostics,
    },
}

impl Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken {
                expected,
                found,
                text,
                position,
            } => write!(
                f,
                "expecting {:?} but got {:?} ({:?}) at offset {}",
                expected, found, text, position
            ),
            ParseError::ForwardProgress { position } => write!(
                f,
                "statement loop failed to advance past offset {}",
                position
            ),
            ParseError::UnresolvedConstruct {
                found,
                text,
                position,
            } => write!(
                f,
                "{:?} ({:?}) cannot be resolved in this context (offset {})",
                found, text, position
            ),
            ParseError::Halted {
                statement,
                position,
                text,
                diagnostics,
            } => write!(
                f,
                "halted after statement {} at {:?} (offset {}): {}",
                statement, text, position, diagnostics
            ),
        }
    }
}
