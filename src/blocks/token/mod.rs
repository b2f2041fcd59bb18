//! Token types shared by the lexer, the tree builder, and tooling.
//!
//! Token Layers
//!
//!     Scan Tokens:
//!         Produced by the logos scanner, see [core]. They only separate candidate
//!         delimiters from everything else and carry no payload.
//!
//!     Block Tokens:
//!         The [Token] stream consumed by the tree builder. Text runs are coalesced and
//!         every delimiter carries its decoded [Delimiter]. Each token is paired with the
//!         byte range of its source text; the ranges tile the source exactly, which is
//!         what makes lossless reconstruction possible.

pub mod core;

pub use self::core::ScanToken;

use crate::blocks::ast::Attributes;
use std::ops::Range;

/// Namespace assumed when a delimiter names a block without one.
pub const DEFAULT_NAMESPACE: &str = "core";

/// Decoded contents of a block delimiter comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Delimiter {
    /// Fully qualified block name, e.g. `core/paragraph`.
    pub name: String,
    /// The JSON object embedded in the delimiter, if any.
    pub attributes: Option<Attributes>,
}

impl Delimiter {
    pub fn new(name: impl Into<String>, attributes: Option<Attributes>) -> Self {
        Delimiter {
            name: name.into(),
            attributes,
        }
    }
}

/// Block-level token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A run of literal text (HTML, or anything that is not a well-formed delimiter).
    Text,
    /// `<!-- wp:name {attrs} -->`
    BlockOpen(Delimiter),
    /// `<!-- /wp:name -->`
    BlockClose(Delimiter),
    /// `<!-- wp:name {attrs} /-->`
    BlockSelfClosing(Delimiter),
}

impl Token {
    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text)
    }

    pub fn delimiter(&self) -> Option<&Delimiter> {
        match self {
            Token::Text => None,
            Token::BlockOpen(d) | Token::BlockClose(d) | Token::BlockSelfClosing(d) => Some(d),
        }
    }

    /// Short kind name, used by logs and test output.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Text => "Text",
            Token::BlockOpen(_) => "BlockOpen",
            Token::BlockClose(_) => "BlockClose",
            Token::BlockSelfClosing(_) => "BlockSelfClosing",
        }
    }
}

/// Flat token stream with source byte ranges.
pub type TokenStream = Vec<(Token, Range<usize>)>;

/// Reassemble source text from a token stream.
///
/// Because token ranges tile the source, this is the identity on the original text.
pub fn detokenize(tokens: &[(Token, Range<usize>)], source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for (_, range) in tokens {
        out.push_str(&source[range.clone()]);
    }
    out
}
