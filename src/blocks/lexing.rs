//! Lexer
//!
//!     This module turns source text into the flat block token stream consumed by the tree
//!     builder.
//!
//! The Lexing Pipeline
//!
//!     1. Scanning with the logos lexer, see [ScanToken](crate::blocks::token::ScanToken).
//!        The scanner splits the source at every `<`.
//!
//!     2. Decoding, see [delimiter]. At each `<` the exact grammar is tried against the
//!        rest of the source. On a match the scanner is bumped past the delimiter and its
//!        JSON payload is parsed. Invalid JSON makes the whole delimiter inert text: the
//!        lexer never fails.
//!
//!     3. Coalescing. Consecutive text (scanner text runs, lone `<`, inert delimiters) is
//!        merged into a single `Text` token.
//!
//! Source Preservation
//!
//!     Every token carries the byte range of its source text and the ranges tile the input
//!     without gaps or overlaps. Nothing downstream may alter them: the byte-exact round
//!     trip depends on it.

pub mod delimiter;

pub use delimiter::{decode, DelimiterError};

use crate::blocks::ast::{Diagnostic, DiagnosticKind};
use crate::blocks::token::{ScanToken, Token, TokenStream};
use logos::Logos;
use std::ops::Range;

/// Tokenize source text into block tokens.
pub fn tokenize(source: &str) -> TokenStream {
    tokenize_with_diagnostics(source).0
}

/// Tokenize source text, also reporting delimiters that degraded to text.
pub fn tokenize_with_diagnostics(source: &str) -> (TokenStream, Vec<Diagnostic>) {
    let mut tokens: TokenStream = Vec::new();
    let mut diagnostics = Vec::new();
    let mut pending_text: Option<Range<usize>> = None;

    let mut lexer = ScanToken::lexer(source);
    while let Some(scanned) = lexer.next() {
        let decoded = match scanned {
            Ok(ScanToken::Angle) => {
                let angle = lexer.span();
                match delimiter::delimiter_len(&source[angle.start..]) {
                    Some(len) => {
                        lexer.bump(len - angle.len());
                        decode_at(source, lexer.span(), &mut diagnostics)
                    }
                    None => None,
                }
            }
            Ok(ScanToken::Text) | Err(_) => None,
        };
        let span = lexer.span();

        match decoded {
            Some(token) => {
                if let Some(text) = pending_text.take() {
                    tokens.push((Token::Text, text));
                }
                log::trace!("{} at {}..{}", token.kind(), span.start, span.end);
                tokens.push((token, span));
            }
            None => {
                pending_text = Some(match pending_text {
                    Some(text) => text.start..span.end,
                    None => span,
                });
            }
        }
    }

    if let Some(text) = pending_text {
        tokens.push((Token::Text, text));
    }

    (tokens, diagnostics)
}

fn decode_at(
    source: &str,
    span: Range<usize>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Token> {
    match delimiter::decode(&source[span.clone()]) {
        Ok(token) => Some(token),
        Err(DelimiterError::InvalidJson(msg)) => {
            log::debug!("delimiter at {}..{} kept as text: {}", span.start, span.end, msg);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::InvalidDelimiterJson,
                span,
                format!("delimiter JSON does not parse: {}", msg),
            ));
            None
        }
        Err(DelimiterError::NoMatch) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::token::{detokenize, Delimiter};

    fn kinds(tokens: &TokenStream) -> Vec<&'static str> {
        tokens.iter().map(|(t, _)| t.kind()).collect()
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_paragraph_block() {
        let source = "<!-- wp:core/paragraph {\"dropCap\":true} -->\n<p class=\"has-drop-cap\">Hi</p>\n<!-- /wp:core/paragraph -->";
        let tokens = tokenize(source);

        assert_eq!(kinds(&tokens), vec!["BlockOpen", "Text", "BlockClose"]);
        assert_eq!(&source[tokens[1].1.clone()], "\n<p class=\"has-drop-cap\">Hi</p>\n");
        match &tokens[0].0 {
            Token::BlockOpen(Delimiter { name, attributes }) => {
                assert_eq!(name, "core/paragraph");
                assert_eq!(
                    attributes.as_ref().and_then(|a| a.get("dropCap")),
                    Some(&serde_json::Value::Bool(true))
                );
            }
            other => panic!("expected BlockOpen, got {:?}", other),
        }
    }

    #[test]
    fn test_text_is_coalesced() {
        let source = "<div>a < b</div><!-- plain comment -->";
        let tokens = tokenize(source);
        assert_eq!(tokens, vec![(Token::Text, 0..source.len())]);
    }

    #[test]
    fn test_invalid_json_degrades_to_text_with_diagnostic() {
        let source = "<!-- wp:paragraph {\"a\":} --><p>x</p>";
        let (tokens, diagnostics) = tokenize_with_diagnostics(source);
        assert_eq!(tokens, vec![(Token::Text, 0..source.len())]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::InvalidDelimiterJson);
        assert_eq!(diagnostics[0].span, 0..28);
    }

    #[test]
    fn test_ranges_tile_source() {
        let source = "a<!-- wp:x /-->b<!-- wp:y -->c<!-- /wp:y --><!-- wp:bad";
        let tokens = tokenize(source);
        let mut cursor = 0;
        for (_, range) in &tokens {
            assert_eq!(range.start, cursor);
            cursor = range.end;
        }
        assert_eq!(cursor, source.len());
        assert_eq!(detokenize(&tokens, source), source);
    }

    #[test]
    fn test_multibyte_text() {
        let source = "héllo <!-- wp:x /--> wörld";
        let tokens = tokenize(source);
        assert_eq!(kinds(&tokens), vec!["Text", "BlockSelfClosing", "Text"]);
        assert_eq!(detokenize(&tokens, source), source);
    }

    #[test]
    fn test_delimiter_kinds() {
        let source = "<!-- wp:paragraph --><p>a</p><!-- /wp:paragraph --><!-- wp:core/separator /-->";
        let tokens = tokenize(source);
        assert_eq!(
            kinds(&tokens),
            vec!["BlockOpen", "Text", "BlockClose", "BlockSelfClosing"]
        );
        assert_eq!(&source[tokens[3].1.clone()], "<!-- wp:core/separator /-->");
    }

    #[test]
    fn test_adjacent_self_closers() {
        let tokens = tokenize("<!-- wp:x /--><!-- wp:y /-->");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].1, 0..14);
        assert_eq!(tokens[1].1, 14..28);
        assert_eq!(tokens[1].0.delimiter().map(|d| d.name.as_str()), Some("core/y"));
    }

    #[test]
    fn test_whitespace_variants() {
        let cases = [
            ("<!--\twp:x\n/-->", "BlockSelfClosing"),
            ("<!-- wp:x/-->", "BlockSelfClosing"),
            ("<!--\n\twp:x\n-->", "BlockOpen"),
            ("<!-- wp:p {} -->", "BlockOpen"),
            ("<!-- wp:p\t{\"a\":1}\n/-->", "BlockSelfClosing"),
            ("<!--  /wp:acme/x  -->", "BlockClose"),
        ];
        for (source, kind) in cases {
            let tokens = tokenize(source);
            assert_eq!(kinds(&tokens), vec![kind], "{:?}", source);
        }
    }

    #[test]
    fn test_unregistered_names_still_tokenize() {
        let source = "<!-- wp:acme/widget {\"mode\":\"dark\"} --><div>Custom</div><!-- /wp:acme/widget -->";
        let tokens = tokenize(source);
        assert_eq!(kinds(&tokens), vec!["BlockOpen", "Text", "BlockClose"]);
        assert_eq!(
            tokens[2].0.delimiter().map(|d| d.name.as_str()),
            Some("acme/widget")
        );
    }

    #[test]
    fn test_near_miss_comments_are_text() {
        let source = "<!-- wp:Paragraph --><!--wp:x --><!-- wp:x -><!<!-- wp:x /-->";
        let tokens = tokenize(source);
        assert_eq!(kinds(&tokens), vec!["Text", "BlockSelfClosing"]);
        assert_eq!(detokenize(&tokens, source), source);
    }
}
