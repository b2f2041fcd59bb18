//! Parsing module for block documents
//!
//!     This module builds the raw block tree from source text:
//!         1. Lexing: delimiter scanning into a flat token stream. See
//!            [lexing](crate::blocks::lexing).
//!         2. Tree building: an explicit-stack machine over that stream. See [tree_builder].
//!
//!     The result is a forest of [RawBlockNode]s. Raw nodes know nothing about the
//!     registry: attribute resolution, validation and migration happen later, in
//!     [parser](crate::blocks::parser).
//!
//! Inner Content
//!
//!     A block's markup is interrupted by its nested blocks. The tree builder records the
//!     interleaving in `inner_content`: literal chunks, and one `None` slot where each
//!     child sat. `inner_html` is the concatenation of the literal chunks only.
//!
//!         <!-- wp:group --><div>a<!-- wp:separator /-->b</div><!-- /wp:group -->
//!
//!         inner_content: [Some("<div>a"), None, Some("b</div>")]
//!         inner_html:    "<div>ab</div>"
//!
//! Depth
//!
//!     Construction never recurses. Nesting depth is still bounded (see
//!     [DEFAULT_MAX_DEPTH]) so later tree walks stay cheap on adversarial input.

pub mod node;
pub mod tree_builder;

pub use node::RawBlockNode;
pub use tree_builder::{TreeBuilder, DEFAULT_MAX_DEPTH};

use crate::blocks::ast::Diagnostic;
use crate::blocks::lexing::tokenize_with_diagnostics;

/// Raw forest of one source text with lexer and recovery diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDocument {
    pub nodes: Vec<RawBlockNode>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RawDocument {
    pub fn parse(source: &str, max_depth: usize) -> Self {
        let (nodes, diagnostics) = parse_raw_with_diagnostics(source, max_depth);
        RawDocument { nodes, diagnostics }
    }
}

/// Parse source text into raw block nodes.
pub fn parse_raw(source: &str) -> Vec<RawBlockNode> {
    parse_raw_with_diagnostics(source, DEFAULT_MAX_DEPTH).0
}

/// Parse source text into raw block nodes, keeping lexer and recovery diagnostics.
pub fn parse_raw_with_diagnostics(
    source: &str,
    max_depth: usize,
) -> (Vec<RawBlockNode>, Vec<Diagnostic>) {
    let (tokens, mut diagnostics) = tokenize_with_diagnostics(source);
    let (nodes, recovery) = TreeBuilder::with_max_depth(source, max_depth).build(&tokens);
    diagnostics.extend(recovery);
    (nodes, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(parse_raw("").is_empty());
    }

    #[test]
    fn test_self_closing_block() {
        let nodes = parse_raw("<!-- wp:core/separator /-->");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name.as_deref(), Some("core/separator"));
        assert!(nodes[0].inner_blocks.is_empty());
        assert_eq!(nodes[0].inner_html, "");
        assert!(nodes[0].inner_content.is_empty());
    }

    #[test]
    fn test_truncated_comment_is_freeform() {
        let nodes = parse_raw("<!-- wp:paragraph");
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_freeform());
        assert_eq!(nodes[0].inner_html, "<!-- wp:paragraph");
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        let depth = 10_000;
        let source = format!(
            "{}{}",
            "<!-- wp:group -->".repeat(depth),
            "<!-- /wp:group -->".repeat(depth)
        );
        let (nodes, diagnostics) = parse_raw_with_diagnostics(&source, DEFAULT_MAX_DEPTH);
        // Surplus closers run past the outermost block and end up as freeform text.
        assert_eq!(nodes.len(), 2);
        assert!(nodes[1].is_freeform());
        assert!(!diagnostics.is_empty());

        let mut levels = 0;
        let mut current = nodes.first();
        while let Some(node) = current {
            levels += 1;
            current = node.inner_blocks.first();
        }
        assert_eq!(levels, DEFAULT_MAX_DEPTH);
    }
}
