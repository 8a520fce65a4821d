//! Tokeniser for domain-level strand notation
//!
//! The notation has four token kinds: plain domain labels, labels that open a
//! bracket (`a(`), closing brackets and the strand break `+`.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised while tokenising
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Illegal character '{ch}' at position {pos}")]
    IllegalCharacter { ch: char, pos: usize },
}

/// Kind of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenType {
    #[serde(rename = "LABEL")]
    Label,
    #[serde(rename = "LABEL_OPEN")]
    LabelOpen,
    #[serde(rename = "RPAREN")]
    RParen,
    #[serde(rename = "PLUS")]
    Plus,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Label => write!(f, "LABEL"),
            TokenType::LabelOpen => write!(f, "LABEL_OPEN"),
            TokenType::RParen => write!(f, "RPAREN"),
            TokenType::Plus => write!(f, "PLUS"),
        }
    }
}

/// A single token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenType,
    /// Source text of the token. `LABEL_OPEN` keeps its trailing `(`.
    pub value: String,
    /// Byte offset into the input
    #[serde(skip)]
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenType, value: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            pos,
        }
    }

    /// Label name with any opening bracket stripped
    pub fn label(&self) -> &str {
        self.value.strip_suffix('(').unwrap_or(&self.value)
    }
}

fn is_label_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_label_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split `input` into tokens.
///
/// Nesting is not checked here; `a( b` tokenises fine and fails in the parser.
pub fn tokenise(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            ' ' | '\t' => {}
            ')' => tokens.push(Token::new(TokenType::RParen, ")", pos)),
            '+' => tokens.push(Token::new(TokenType::Plus, "+", pos)),
            c if is_label_start(c) => {
                let mut end = pos + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if !is_label_continue(next) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }

                if let Some(&(i, '(')) = chars.peek() {
                    chars.next();
                    tokens.push(Token::new(TokenType::LabelOpen, &input[pos..=i], pos));
                } else {
                    tokens.push(Token::new(TokenType::Label, &input[pos..end], pos));
                }
            }
            ch => return Err(LexError::IllegalCharacter { ch, pos }),
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenType::*;

    fn kinds(input: &str) -> Vec<TokenType> {
        tokenise(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_plain_labels() {
        assert_eq!(kinds("a"), vec![Label]);
        assert_eq!(kinds("a b c d"), vec![Label, Label, Label, Label]);
        assert_eq!(kinds("foo_1 _bar"), vec![Label, Label]);
    }

    #[test]
    fn test_nested_brackets() {
        assert_eq!(
            kinds("a( b c( d ) e f( g ) h )"),
            vec![
                LabelOpen, Label, LabelOpen, Label, RParen, Label, LabelOpen, Label, RParen,
                Label, RParen
            ]
        );
        assert_eq!(
            kinds("a( b + c d( + ) )"),
            vec![LabelOpen, Label, Plus, Label, LabelOpen, Plus, RParen, RParen]
        );
    }

    #[test]
    fn test_erratic_whitespace() {
        assert_eq!(kinds("a(b )"), vec![LabelOpen, Label, RParen]);
        assert_eq!(kinds("a(b+c)"), vec![LabelOpen, Label, Plus, Label, RParen]);
        assert_eq!(
            kinds("a(b( +) c + d )"),
            vec![LabelOpen, LabelOpen, Plus, RParen, Label, Plus, Label, RParen]
        );
        assert_eq!(kinds("\ta(+)\t"), vec![LabelOpen, Plus, RParen]);
    }

    #[test]
    fn test_label_values() {
        let values: Vec<String> = tokenise("a( b c( d e f( g h ")
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect();
        assert_eq!(values, vec!["a(", "b", "c(", "d", "e", "f(", "g", "h"]);
    }

    #[test]
    fn test_positions_and_label() {
        let tokens = tokenise("ab( cd )").unwrap();
        assert_eq!(tokens[0].pos, 0);
        assert_eq!(tokens[0].label(), "ab");
        assert_eq!(tokens[1].pos, 4);
        assert_eq!(tokens[2].pos, 7);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenise("").unwrap().is_empty());
        assert!(tokenise("   ").unwrap().is_empty());
    }

    #[test]
    fn test_illegal_characters() {
        for input in ["*", "a b *", "a( * )", "a( + * )", "a (", "a\nb"] {
            let err = tokenise(input).unwrap_err();
            assert!(err.to_string().contains("Illegal character"), "{input}");
        }
        assert_eq!(
            tokenise("a b *").unwrap_err(),
            LexError::IllegalCharacter { ch: '*', pos: 4 }
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(tokenise("a( +").unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"type": "LABEL_OPEN", "value": "a("},
                {"type": "PLUS", "value": "+"}
            ])
        );
    }
}
