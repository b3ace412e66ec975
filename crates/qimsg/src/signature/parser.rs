// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parser for the compact signature grammar.
//!
//! A signature is an ASCII string describing the shape of zero or more
//! values: one character per scalar, `[..]` for lists, `{kv}` for maps,
//! `(..)` for tuples. A `*` suffix qualifies the preceding token as a
//! pointer/optional. The empty string is a valid zero-token signature.

use std::fmt;

/// Errors raised while parsing a signature string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    UnterminatedContainer { open: char, pos: usize },
    UnexpectedClose { close: char, pos: usize },
    UnknownToken { token: char, pos: usize },
    BareQualifier { pos: usize },
    ContainerArity { open: char, pos: usize, count: usize },
    MissingSeparator,
    MethodLayout,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedContainer { open, pos } => {
                write!(f, "Unterminated container '{}' opened at byte {}", open, pos)
            }
            Self::UnexpectedClose { close, pos } => {
                write!(f, "Unexpected '{}' at byte {}", close, pos)
            }
            Self::UnknownToken { token, pos } => {
                write!(f, "Unknown signature token '{}' at byte {}", token, pos)
            }
            Self::BareQualifier { pos } => {
                write!(f, "Qualifier '*' without a preceding token at byte {}", pos)
            }
            Self::ContainerArity { open, pos, count } => {
                write!(
                    f,
                    "Container '{}' at byte {} holds {} tokens, wrong arity",
                    open, pos, count
                )
            }
            Self::MissingSeparator => write!(f, "Method signature is missing the '::' separator"),
            Self::MethodLayout => {
                write!(f, "Method signature must be of the form name::ret(params)")
            }
        }
    }
}

impl std::error::Error for SignatureError {}

/// Kind of a single signature token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Void,
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    String,
    Raw,
    Dynamic,
    Object,
    Unknown,
    List,
    Map,
    Tuple,
}

impl Kind {
    /// Map a leaf character of the grammar to its kind.
    pub(crate) fn from_leaf(c: char) -> Option<Self> {
        Some(match c {
            'v' => Self::Void,
            'b' => Self::Bool,
            'c' => Self::Int8,
            'C' => Self::UInt8,
            'w' => Self::Int16,
            'W' => Self::UInt16,
            'i' => Self::Int32,
            'I' => Self::UInt32,
            'l' => Self::Int64,
            'L' => Self::UInt64,
            'f' => Self::Float32,
            'd' => Self::Float64,
            's' => Self::String,
            'r' => Self::Raw,
            'm' => Self::Dynamic,
            'o' => Self::Object,
            'X' => Self::Unknown,
            _ => return None,
        })
    }

    /// Leaf character for non-container kinds.
    pub(crate) fn leaf_char(self) -> Option<char> {
        Some(match self {
            Self::Void => 'v',
            Self::Bool => 'b',
            Self::Int8 => 'c',
            Self::UInt8 => 'C',
            Self::Int16 => 'w',
            Self::UInt16 => 'W',
            Self::Int32 => 'i',
            Self::UInt32 => 'I',
            Self::Int64 => 'l',
            Self::UInt64 => 'L',
            Self::Float32 => 'f',
            Self::Float64 => 'd',
            Self::String => 's',
            Self::Raw => 'r',
            Self::Dynamic => 'm',
            Self::Object => 'o',
            Self::Unknown => 'X',
            Self::List | Self::Map | Self::Tuple => return None,
        })
    }

    /// True for every integer and floating-point kind.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::UInt8
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Int64
                | Self::UInt64
                | Self::Float32
                | Self::Float64
        )
    }

    /// True for list, map and tuple.
    pub fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Map | Self::Tuple)
    }

    /// Encoded size in bytes for fixed-width kinds (None for variable-size).
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Void => Some(0),
            Self::Bool | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            _ => None,
        }
    }
}

/// One parsed token of a signature, possibly a container with children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: Kind,
    text: String,
    pointer: bool,
    children: Vec<Token>,
}

impl Token {
    pub(crate) fn leaf(kind: Kind) -> Self {
        let c = kind
            .leaf_char()
            .unwrap_or_else(|| unreachable!("container kind has no leaf character"));
        Self {
            kind,
            text: c.to_string(),
            pointer: false,
            children: Vec::new(),
        }
    }

    pub(crate) fn list(element: Token) -> Self {
        let text = format!("[{}]", element.text);
        Self {
            kind: Kind::List,
            text,
            pointer: false,
            children: vec![element],
        }
    }

    pub(crate) fn map(key: Token, value: Token) -> Self {
        let text = format!("{{{}{}}}", key.text, value.text);
        Self {
            kind: Kind::Map,
            text,
            pointer: false,
            children: vec![key, value],
        }
    }

    pub(crate) fn tuple(members: Vec<Token>) -> Self {
        let mut text = String::from("(");
        for member in &members {
            text.push_str(&member.text);
        }
        text.push(')');
        Self {
            kind: Kind::Tuple,
            text,
            pointer: false,
            children: members,
        }
    }

    pub(crate) fn with_pointer(mut self) -> Self {
        if !self.pointer {
            self.pointer = true;
            self.text.push('*');
        }
        self
    }

    /// The token's kind tag.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Raw sub-signature text of this token, qualifier included.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True if the token carries the `*` pointer/optional qualifier.
    pub fn is_pointer(&self) -> bool {
        self.pointer
    }

    /// True for container tokens with at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Signature view over the container body (owned, independent lifetime).
    pub fn children(&self) -> Signature {
        Signature::from_tokens(self.children.clone())
    }
}

/// An immutable, parsed signature: an ordered sequence of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    text: String,
    tokens: Vec<Token>,
}

impl Signature {
    /// Parse a signature string.
    pub fn parse(text: &str) -> Result<Self, SignatureError> {
        let bytes = text.as_bytes();
        let mut pos = 0usize;
        let mut tokens = Vec::new();
        while pos < bytes.len() {
            match bytes[pos] {
                b']' | b'}' | b')' => {
                    return Err(SignatureError::UnexpectedClose {
                        close: bytes[pos] as char,
                        pos,
                    })
                }
                _ => tokens.push(Self::parse_token(bytes, &mut pos)?),
            }
        }
        Ok(Self::from_tokens(tokens))
    }

    /// Assemble a signature from already-built tokens (canonical text).
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let mut text = String::new();
        for token in &tokens {
            text.push_str(&token.text);
        }
        Self { text, tokens }
    }

    fn parse_token(bytes: &[u8], pos: &mut usize) -> Result<Token, SignatureError> {
        let start = *pos;
        let c = bytes[*pos] as char;
        let mut token = match c {
            '[' => {
                *pos += 1;
                let mut children = Self::parse_body(bytes, pos, b']', '[', start)?;
                if children.len() != 1 {
                    return Err(SignatureError::ContainerArity {
                        open: '[',
                        pos: start,
                        count: children.len(),
                    });
                }
                Token::list(children.remove(0))
            }
            '{' => {
                *pos += 1;
                let mut children = Self::parse_body(bytes, pos, b'}', '{', start)?;
                if children.len() != 2 {
                    return Err(SignatureError::ContainerArity {
                        open: '{',
                        pos: start,
                        count: children.len(),
                    });
                }
                let value = children.remove(1);
                let key = children.remove(0);
                Token::map(key, value)
            }
            '(' => {
                *pos += 1;
                let children = Self::parse_body(bytes, pos, b')', '(', start)?;
                Token::tuple(children)
            }
            '*' => return Err(SignatureError::BareQualifier { pos: start }),
            other => {
                let kind = Kind::from_leaf(other).ok_or(SignatureError::UnknownToken {
                    token: other,
                    pos: start,
                })?;
                *pos += 1;
                Token::leaf(kind)
            }
        };
        if *pos < bytes.len() && bytes[*pos] == b'*' {
            token.pointer = true;
            token.text.push('*');
            *pos += 1;
        }
        Ok(token)
    }

    fn parse_body(
        bytes: &[u8],
        pos: &mut usize,
        close: u8,
        open: char,
        open_pos: usize,
    ) -> Result<Vec<Token>, SignatureError> {
        let mut children = Vec::new();
        loop {
            if *pos >= bytes.len() {
                return Err(SignatureError::UnterminatedContainer {
                    open,
                    pos: open_pos,
                });
            }
            let b = bytes[*pos];
            if b == close {
                *pos += 1;
                return Ok(children);
            }
            if matches!(b, b']' | b'}' | b')') {
                return Err(SignatureError::UnexpectedClose {
                    close: b as char,
                    pos: *pos,
                });
            }
            children.push(Self::parse_token(bytes, pos)?);
        }
    }

    /// Number of top-level tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True for the zero-token signature.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Restartable iteration over the token sequence.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Token at a top-level position.
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// First top-level token.
    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scalars() {
        let sig = Signature::parse("ibsd").expect("parse");
        assert_eq!(sig.len(), 4);
        let kinds: Vec<Kind> = sig.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![Kind::Int32, Kind::Bool, Kind::String, Kind::Float64]
        );
    }

    #[test]
    fn parse_empty_is_valid() {
        let sig = Signature::parse("").expect("parse");
        assert_eq!(sig.len(), 0);
        assert!(sig.is_empty());
        assert!(sig.iter().next().is_none());
    }

    #[test]
    fn parse_containers() {
        let sig = Signature::parse("[s]{si}(id)").expect("parse");
        assert_eq!(sig.len(), 3);
        assert_eq!(sig.token(0).map(Token::kind), Some(Kind::List));
        assert_eq!(sig.token(1).map(Token::kind), Some(Kind::Map));
        assert_eq!(sig.token(2).map(Token::kind), Some(Kind::Tuple));

        let map = sig.token(1).expect("map token");
        assert!(map.has_children());
        let children = map.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children.token(0).map(Token::kind), Some(Kind::String));
        assert_eq!(children.token(1).map(Token::kind), Some(Kind::Int32));
    }

    #[test]
    fn parse_nested() {
        let sig = Signature::parse("{s[(ii)]}").expect("parse");
        assert_eq!(sig.len(), 1);
        let value = sig.first().expect("map").children();
        let list = value.token(1).expect("list");
        assert_eq!(list.kind(), Kind::List);
        let tuple = list.children();
        assert_eq!(tuple.first().map(Token::kind), Some(Kind::Tuple));
    }

    #[test]
    fn parse_render_roundtrip() {
        for text in ["", "i", "[s]", "{si}", "(is)", "{s[i]}", "m", "o", "(i[{sd}]s)"] {
            let sig = Signature::parse(text).expect("parse");
            assert_eq!(sig.as_str(), text);
            assert_eq!(sig.to_string(), text);
        }
    }

    #[test]
    fn pointer_qualifier() {
        let sig = Signature::parse("o*").expect("parse");
        assert_eq!(sig.len(), 1);
        let token = sig.first().expect("token");
        assert_eq!(token.kind(), Kind::Object);
        assert!(token.is_pointer());
        assert_eq!(sig.as_str(), "o*");
    }

    #[test]
    fn unknown_leaf_parses() {
        let sig = Signature::parse("X").expect("parse");
        assert_eq!(sig.first().map(Token::kind), Some(Kind::Unknown));
    }

    #[test]
    fn malformed_inputs() {
        assert!(matches!(
            Signature::parse("[i"),
            Err(SignatureError::UnterminatedContainer { open: '[', pos: 0 })
        ));
        assert!(matches!(
            Signature::parse("i]"),
            Err(SignatureError::UnexpectedClose { close: ']', pos: 1 })
        ));
        assert!(matches!(
            Signature::parse("{i}"),
            Err(SignatureError::ContainerArity {
                open: '{',
                count: 1,
                ..
            })
        ));
        assert!(matches!(
            Signature::parse("{sii}"),
            Err(SignatureError::ContainerArity {
                open: '{',
                count: 3,
                ..
            })
        ));
        assert!(matches!(
            Signature::parse("[is]"),
            Err(SignatureError::ContainerArity {
                open: '[',
                count: 2,
                ..
            })
        ));
        assert!(matches!(
            Signature::parse("*i"),
            Err(SignatureError::BareQualifier { pos: 0 })
        ));
        assert!(matches!(
            Signature::parse("iQ"),
            Err(SignatureError::UnknownToken { token: 'Q', pos: 1 })
        ));
        assert!(matches!(
            Signature::parse("[i}"),
            Err(SignatureError::UnexpectedClose { close: '}', pos: 2 })
        ));
    }

    #[test]
    fn iteration_is_restartable() {
        let sig = Signature::parse("is[d]").expect("parse");
        let first: Vec<Kind> = sig.iter().map(Token::kind).collect();
        let second: Vec<Kind> = sig.iter().map(Token::kind).collect();
        assert_eq!(first, second);
    }
}
