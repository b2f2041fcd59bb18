//! Individual transformation stages
//!
//! Each stage implements the `Runnable` trait.

use crate::blocks::ast::Document;
use crate::blocks::lexing;
use crate::blocks::parser::BlockParser;
use crate::blocks::parsing::{RawDocument, DEFAULT_MAX_DEPTH};
use crate::blocks::registry::BlockRegistry;
use crate::blocks::token::TokenStream;
use crate::blocks::transforms::{Runnable, TransformError};
use wp_block_parser_config::BlocksConfig;

/// Source text to block tokens.
pub struct Tokenization;

impl Tokenization {
    pub fn new() -> Self {
        Tokenization
    }
}

impl Default for Tokenization {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<String, TokenStream> for Tokenization {
    fn run(&self, input: String) -> Result<TokenStream, TransformError> {
        Ok(lexing::tokenize(&input))
    }
}

impl Runnable<&str, TokenStream> for Tokenization {
    fn run(&self, input: &str) -> Result<TokenStream, TransformError> {
        Ok(lexing::tokenize(input))
    }
}

/// Source text to the raw block forest.
pub struct TreeBuilding {
    max_depth: usize,
}

impl TreeBuilding {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        TreeBuilding { max_depth }
    }
}

impl Default for TreeBuilding {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<String, RawDocument> for TreeBuilding {
    fn run(&self, input: String) -> Result<RawDocument, TransformError> {
        Ok(RawDocument::parse(&input, self.max_depth))
    }
}

/// Raw forest to resolved document, against an owned registry.
pub struct Resolution<R> {
    registry: R,
    config: BlocksConfig,
}

impl<R: BlockRegistry> Resolution<R> {
    pub fn new(registry: R, config: BlocksConfig) -> Self {
        Resolution { registry, config }
    }
}

impl<R: BlockRegistry> Runnable<RawDocument, Document> for Resolution<R> {
    fn run(&self, input: RawDocument) -> Result<Document, TransformError> {
        let parser = BlockParser::new(&self.registry).with_config(self.config.clone());
        let mut diagnostics = input.diagnostics;
        let blocks = parser.resolve_all(input.nodes, &mut diagnostics);
        diagnostics.sort_by_key(|d| d.span.start);
        Ok(Document::new(blocks, diagnostics))
    }
}
