use crate::cursor::{LookaheadHit, TokenCursor};
use crate::error::ParseError;
use crate::token::{Keyword, Kind, OpFamily, Token};
use log::{debug, trace};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum AstNode {
    Program {
        body: Vec<AstNode>,
    },
    FunctionDeclaration {
        return_type: String,
        name: String,
        parameters: Vec<AstNode>,
    },
    FunctionDefinition {
        return_type: String,
        name: String,
        parameters: Vec<AstNode>,
        body: Box<AstNode>,
    },
    StructDeclaration {
        name: String,
        fields: Vec<AstNode>,
    },
    Parameter {
        param_type: String,
        name: String,
    },
    Declaration {
        var_type: String,
        name: String,
    },
    Assignment {
        target: Box<AstNode>,
        operator: String,
        value: Box<AstNode>,
    },
    IfStatement {
        condition: Box<AstNode>,
        #[serde(rename = "then")]
        then_branch: Box<AstNode>,
        #[serde(rename = "else")]
        else_branch: Option<Box<AstNode>>,
    },
    WhileStatement {
        condition: Box<AstNode>,
        body: Box<AstNode>,
    },
    ReturnStatement {
        expression: Box<AstNode>,
    },
    BlockStatement {
        body: Vec<AstNode>,
    },
    ExpressionStatement {
        expression: Box<AstNode>,
    },
    FunctionCall {
        name: String,
        arguments: Vec<AstNode>,
    },
    BinaryOperation {
        left: Box<AstNode>,
        operator: String,
        right: Box<AstNode>,
    },
    Literal {
        value: String,
    },
    Identifier {
        name: String,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    pub errors: u32,
    pub failed_peeks: u32,
    pub failed_matches: u32,
    pub unresolved: u32,
}

impl Diagnostics {
    // Failed peeks steer branch selection; they are recorded but never fatal
    // on their own.
    pub fn is_fatal(&self) -> bool {
        self.errors > 0 || self.failed_matches > 0 || self.unresolved > 0
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} errors, {} failed matches, {} failed peeks, {} unresolved",
            self.errors, self.failed_matches, self.failed_peeks, self.unresolved
        )
    }
}

pub struct Parser {
    cursor: TokenCursor,
    diagnostics: Diagnostics,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        // Comments and directives belong to the token pool but not to the
        // grammar; the cursor runs over the significant subsequence.
        let significant = tokens
            .into_iter()
            .filter(|token| !token.kind.is_trivia())
            .collect();
        Self {
            cursor: TokenCursor::new(significant),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    pub fn parse(&mut self) -> Result<AstNode, ParseError> {
        let mut body = Vec::new();
        let mut statement = 0;

        while !self.cursor.at_end() {
            let before = self.cursor.position();
            body.push(self.parse_statement()?);
            trace!("statement {} parsed", statement);

            // Errors gathered softly inside a statement escalate hard here.
            if self.diagnostics.is_fatal() {
                let current = self.cursor.current();
                return Err(ParseError::Halted {
                    statement,
                    position: current.position,
                    text: current.text.clone(),
                    diagnostics: self.diagnostics,
                });
            }
            self.ensure_progress(before)?;
            statement += 1;
        }

        debug!("parsed {} top-level statements", body.len());
        Ok(AstNode::Program { body })
    }

    fn ensure_progress(&mut self, before: usize) -> Result<(), ParseError> {
        if self.cursor.position() == before {
            self.diagnostics.errors += 1;
            return Err(ParseError::ForwardProgress { position: before });
        }
        Ok(())
    }

    fn eat(&mut self, expected: Kind) -> Result<Token, ParseError> {
        self.cursor.expect(expected).map_err(|err| {
            self.diagnostics.failed_matches += 1;
            err
        })
    }

    fn peek(&mut self, expected: Kind, offset: usize) -> bool {
        let hit = self.cursor.peek(expected, offset);
        if !hit {
            self.diagnostics.failed_peeks += 1;
        }
        hit
    }

    // Type positions accept a type keyword as well as an identifier: after
    // classification `int` is a keyword, yet `int main ( ) ;` must parse.
    fn is_name(kind: &Kind) -> bool {
        match kind {
            Kind::Identifier => true,
            Kind::Keyword(keyword) => keyword.is_type(),
            _ => false,
        }
    }

    fn peek_name(&mut self, offset: usize) -> bool {
        let hit = Self::is_name(&self.cursor.token_at(offset).kind);
        if !hit {
            self.diagnostics.failed_peeks += 1;
        }
        hit
    }

    fn eat_name(&mut self) -> Result<String, ParseError> {
        let current = self.cursor.current().clone();
        if Self::is_name(&current.kind) {
            self.cursor.advance();
            Ok(current.text)
        } else {
            self.diagnostics.failed_matches += 1;
            Err(ParseError::UnexpectedToken {
                expected: Kind::Identifier,
                found: current.kind,
                text: current.text,
                position: current.position,
            })
        }
    }

    fn unresolved(&mut self, token: Token) -> ParseError {
        self.diagnostics.unresolved += 1;
        ParseError::UnresolvedConstruct {
            found: token.kind,
            text: token.text,
            position: token.position,
        }
    }

    // A top-level statement is a struct declaration or a function, and the
    // two function forms share an arbitrarily long prefix. Only the first
    // terminator decides: `;` before `{` means declaration, `{` first means
    // definition.
    fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        let current = self.cursor.current().clone();
        match current.kind {
            Kind::Keyword(Keyword::Struct) => self.parse_struct_declaration(),
            kind if Self::is_name(&kind) => {
                match self
                    .cursor
                    .lookahead(|k| *k == Kind::SEMICOLON, |k| *k == Kind::LBRACE)
                {
                    Some(LookaheadHit::Low) => self.parse_function_declaration(),
                    Some(LookaheadHit::High) => self.parse_function_definition(),
                    None => Err(self.unresolved(current)),
                }
            }
            _ => {
                self.diagnostics.failed_matches += 1;
                Err(ParseError::UnexpectedToken {
                    expected: Kind::Identifier,
                    found: current.kind,
                    text: current.text,
                    position: current.position,
                })
            }
        }
    }

    fn parse_function_declaration(&mut self) -> Result<AstNode, ParseError> {
        let return_type = self.eat_name()?;
        let name = self.eat(Kind::Identifier)?.text;
        self.eat(Kind::LPAREN)?;
        let parameters = if self.peek_name(0) {
            self.parse_parameters()?
        } else {
            Vec::new()
        };
        self.eat(Kind::RPAREN)?;
        self.eat(Kind::SEMICOLON)?;
        Ok(AstNode::FunctionDeclaration {
            return_type,
            name,
            parameters,
        })
    }

    fn parse_function_definition(&mut self) -> Result<AstNode, ParseError> {
        let return_type = self.eat_name()?;
        let name = self.eat(Kind::Identifier)?.text;
        self.eat(Kind::LPAREN)?;
        let parameters = if self.peek_name(0) {
            self.parse_parameters()?
        } else {
            Vec::new()
        };
        self.eat(Kind::RPAREN)?;
        let body = self.parse_block_statement()?;
        Ok(AstNode::FunctionDefinition {
            return_type,
            name,
            parameters,
            body: Box::new(body),
        })
    }

    fn parse_parameters(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut parameters = Vec::new();
        loop {
            let before = self.cursor.position();
            parameters.push(self.parse_parameter()?);
            self.ensure_progress(before)?;
            if self.peek(Kind::COMMA, 0) {
                self.eat(Kind::COMMA)?;
            } else {
                break;
            }
        }
        Ok(parameters)
    }

    fn parse_parameter(&mut self) -> Result<AstNode, ParseError> {
        let param_type = self.eat_name()?;
        let name = self.eat(Kind::Identifier)?.text;
        Ok(AstNode::Parameter { param_type, name })
    }

    fn parse_struct_declaration(&mut self) -> Result<AstNode, ParseError> {
        self.eat(Kind::Keyword(Keyword::Struct))?;
        let name = self.eat(Kind::Identifier)?.text;
        self.eat(Kind::LBRACE)?;
        let mut fields = Vec::new();
        while !self.peek(Kind::RBRACE, 0) && !self.cursor.at_end() {
            let before = self.cursor.position();
            fields.push(self.parse_declaration()?);
            self.ensure_progress(before)?;
        }
        self.eat(Kind::RBRACE)?;
        self.eat(Kind::SEMICOLON)?;
        Ok(AstNode::StructDeclaration { name, fields })
    }

    fn parse_block_statement(&mut self) -> Result<AstNode, ParseError> {
        self.eat(Kind::LBRACE)?;
        let mut body = Vec::new();
        while !self.peek(Kind::RBRACE, 0) && !self.cursor.at_end() {
            let before = self.cursor.position();
            body.push(self.parse_block_item()?);
            self.ensure_progress(before)?;
        }
        self.eat(Kind::RBRACE)?;
        Ok(AstNode::BlockStatement { body })
    }

    fn parse_block_item(&mut self) -> Result<AstNode, ParseError> {
        let current = self.cursor.current().clone();
        match current.kind {
            Kind::Keyword(Keyword::Return) => self.parse_return_statement(),
            Kind::Keyword(Keyword::If) => self.parse_if_statement(),
            Kind::Keyword(Keyword::While) => self.parse_while_statement(),
            kind if Self::is_name(&kind) => self.parse_simple_statement(),
            _ => Err(self.unresolved(current)),
        }
    }

    // Call, declaration, assignment, or bare expression: all of them open
    // with a name. An opening paren before any operator means a call; after
    // that, the token following the name decides. A second name is a
    // declaration, an assignment operator is an assignment, anything else
    // falls through to an expression statement.
    fn parse_simple_statement(&mut self) -> Result<AstNode, ParseError> {
        let call_first = matches!(
            self.cursor
                .lookahead(|k| matches!(k, Kind::Operator(_)), |k| *k == Kind::LPAREN),
            Some(LookaheadHit::High)
        );
        if call_first {
            let call = self.parse_function_call()?;
            self.eat(Kind::SEMICOLON)?;
            return Ok(call);
        }
        if self.peek_name(1) {
            return self.parse_declaration();
        }
        if self.peek(Kind::ASSIGN, 1) {
            return self.parse_assignment();
        }
        let expression = self.parse_expression()?;
        self.eat(Kind::SEMICOLON)?;
        Ok(AstNode::ExpressionStatement {
            expression: Box::new(expression),
        })
    }

    fn parse_declaration(&mut self) -> Result<AstNode, ParseError> {
        let var_type = self.eat_name()?;
        let name = self.eat(Kind::Identifier)?.text;
        self.eat(Kind::SEMICOLON)?;
        Ok(AstNode::Declaration { var_type, name })
    }

    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let target = self.eat(Kind::Identifier)?;
        let operator = self.eat(Kind::ASSIGN)?.text;
        let value = self.parse_expression()?;
        self.eat(Kind::SEMICOLON)?;
        Ok(AstNode::Assignment {
            target: Box::new(AstNode::Identifier { name: target.text }),
            operator,
            value: Box::new(value),
        })
    }

    fn parse_function_call(&mut self) -> Result<AstNode, ParseError> {
        let name = self.eat(Kind::Identifier)?.text;
        self.eat(Kind::LPAREN)?;
        let mut arguments = Vec::new();
        while !self.peek(Kind::RPAREN, 0) && !self.cursor.at_end() {
            if !arguments.is_empty() {
                self.eat(Kind::COMMA)?;
            }
            arguments.push(self.parse_expression()?);
        }
        self.eat(Kind::RPAREN)?;
        Ok(AstNode::FunctionCall { name, arguments })
    }

    fn parse_if_statement(&mut self) -> Result<AstNode, ParseError> {
        self.eat(Kind::Keyword(Keyword::If))?;
        self.eat(Kind::LPAREN)?;
        let condition = self.parse_expression()?;
        self.eat(Kind::RPAREN)?;
        let then_branch = self.parse_block_statement()?;
        let else_branch = if self.peek(Kind::Keyword(Keyword::Else), 0) {
            self.eat(Kind::Keyword(Keyword::Else))?;
            Some(Box::new(self.parse_block_statement()?))
        } else {
            None
        };
        Ok(AstNode::IfStatement {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch,
        })
    }

    fn parse_while_statement(&mut self) -> Result<AstNode, ParseError> {
        self.eat(Kind::Keyword(Keyword::While))?;
        self.eat(Kind::LPAREN)?;
        let condition = self.parse_expression()?;
        self.eat(Kind::RPAREN)?;
        let body = self.parse_block_statement()?;
        Ok(AstNode::WhileStatement {
            condition: Box::new(condition),
            body: Box::new(body),
        })
    }

    fn parse_return_statement(&mut self) -> Result<AstNode, ParseError> {
        self.eat(Kind::Keyword(Keyword::Return))?;
        let expression = self.parse_expression()?;
        self.eat(Kind::SEMICOLON)?;
        Ok(AstNode::ReturnStatement {
            expression: Box::new(expression),
        })
    }

    // The expression form is deliberately minimal: an operand, optionally
    // followed by one binary operator and a second operand.
    fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        let left = self.parse_operand()?;
        match self.cursor.current().kind {
            Kind::Operator(Some(family)) if family != OpFamily::Assignment => {
                let operator = self.binary_operator(family)?;
                let right = self.parse_operand()?;
                Ok(AstNode::BinaryOperation {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                })
            }
            _ => Ok(left),
        }
    }

    // The table leaves `&`, `*` and `:` in the Special family; their meaning
    // is re-derived here, at the point of grammatical use. Between two
    // operands `&` is bitwise-and and `*` is multiplication, while `:` has
    // no binary reading at all.
    fn binary_operator(&mut self, family: OpFamily) -> Result<String, ParseError> {
        let token = self.cursor.current().clone();
        let accepted = match family {
            OpFamily::Arithmetic
            | OpFamily::Relational
            | OpFamily::Logical
            | OpFamily::Bitwise => true,
            OpFamily::Special => token.text == "&" || token.text == "*",
            _ => false,
        };
        if accepted {
            self.cursor.advance();
            Ok(token.text)
        } else {
            Err(self.unresolved(token))
        }
    }

    fn parse_operand(&mut self) -> Result<AstNode, ParseError> {
        let current = self.cursor.current().clone();
        match current.kind {
            Kind::Identifier => {
                self.cursor.advance();
                Ok(AstNode::Identifier { name: current.text })
            }
            Kind::Literal => {
                self.cursor.advance();
                Ok(AstNode::Literal {
                    value: current.text,
                })
            }
            // e.g. a `return` inside a bare expression
            Kind::Keyword(_) => Err(self.unresolved(current)),
            _ => {
                self.diagnostics.failed_matches += 1;
                Err(ParseError::UnexpectedToken {
                    expected: Kind::Identifier,
                    found: current.kind,
                    text: current.text,
                    position: current.position,
                })
            }
        }
    }
}
