//! Recursive-descent parser for strand notation
//!
//! ```text
//! chain   := element+
//! element := LABEL
//!          | LABEL_OPEN chain RPAREN
//!          | LABEL_OPEN chain? PLUS chain? RPAREN
//! ```

use crate::complex::{Chain, Domain, Hairpin, Node, SplitComplex};
use crate::lex::{tokenise, LexError, Token, TokenType};
use thiserror::Error;

/// Errors raised while parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Unexpected {kind} '{value}' at position {pos}")]
    UnexpectedToken {
        kind: TokenType,
        value: String,
        pos: usize,
    },

    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Empty hairpin '{name}( )' at position {pos}")]
    EmptyHairpin { name: String, pos: usize },

    #[error("Nothing to parse")]
    Empty,
}

impl ParseError {
    fn unexpected(token: &Token) -> Self {
        ParseError::UnexpectedToken {
            kind: token.kind,
            value: token.value.clone(),
            pos: token.pos,
        }
    }
}

/// Tokenise and parse `input`
pub fn parse(input: &str) -> Result<Chain, ParseError> {
    let tokens = tokenise(input)?;
    parse_tokens(&tokens)
}

/// Parse an already tokenised input. The whole token stream must form one chain.
pub fn parse_tokens(tokens: &[Token]) -> Result<Chain, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser { tokens, current: 0 };
    let chain = parser.chain()?;
    match parser.peek() {
        None => Ok(chain),
        Some(token) => Err(ParseError::unexpected(token)),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.current)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.current);
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn at_element(&self) -> bool {
        matches!(
            self.peek().map(|t| t.kind),
            Some(TokenType::Label) | Some(TokenType::LabelOpen)
        )
    }

    /// One or more elements, stopping at `+`, `)` or end of input
    fn chain(&mut self) -> Result<Chain, ParseError> {
        let mut within = vec![self.element()?];
        while self.at_element() {
            within.push(self.element()?);
        }
        Ok(Chain::new(within))
    }

    /// `chain?`: only parse if an element starts here
    fn optional_chain(&mut self) -> Result<Option<Chain>, ParseError> {
        if self.at_element() {
            self.chain().map(Some)
        } else {
            Ok(None)
        }
    }

    fn element(&mut self) -> Result<Node, ParseError> {
        let token = self.advance().ok_or(ParseError::UnexpectedEnd)?;
        match token.kind {
            TokenType::Label => Ok(Node::Domain(Domain::new(token.label()))),
            TokenType::LabelOpen => self.bracket(token),
            _ => Err(ParseError::unexpected(token)),
        }
    }

    /// Everything after `label(` up to and including the matching `)`
    fn bracket(&mut self, open: &Token) -> Result<Node, ParseError> {
        let pre = Domain::new(open.label());
        let left = self.optional_chain()?;

        let token = self.advance().ok_or(ParseError::UnexpectedEnd)?;
        match token.kind {
            TokenType::RParen => match left {
                Some(inner) => Ok(Node::Hairpin(Hairpin::new(pre, inner))),
                None => Err(ParseError::EmptyHairpin {
                    name: pre.name,
                    pos: open.pos,
                }),
            },
            TokenType::Plus => {
                let right = self.optional_chain()?;
                let close = self.advance().ok_or(ParseError::UnexpectedEnd)?;
                if close.kind != TokenType::RParen {
                    return Err(ParseError::unexpected(close));
                }
                Ok(Node::SplitComplex(SplitComplex::new(pre, left, right)))
            }
            _ => Err(ParseError::unexpected(token)),
        }
    }
}
