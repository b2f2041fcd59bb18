//! Standard transform pipelines
//!
//! Registry-free pipelines are static and lazily built on first use:
//!
//!     TOKENIZATION   String → TokenStream
//!     RAW_PARSE      String → RawDocument
//!
//! Resolution needs a registry, so the full pipeline is built per registry with
//! [resolution_pipeline].

use crate::blocks::ast::Document;
use crate::blocks::parsing::RawDocument;
use crate::blocks::registry::BlockRegistry;
use crate::blocks::token::TokenStream;
use crate::blocks::transforms::stages::{Resolution, Tokenization, TreeBuilding};
use crate::blocks::transforms::Transform;
use once_cell::sync::Lazy;
use wp_block_parser_config::BlocksConfig;

pub type TokenizationTransform = Transform<String, TokenStream>;
pub type RawParseTransform = Transform<String, RawDocument>;
pub type DocumentTransform = Transform<String, Document>;

/// Source text to block tokens.
pub static TOKENIZATION: Lazy<TokenizationTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(Tokenization::new()));

/// Source text to the raw block forest, with the default depth limit.
pub static RAW_PARSE: Lazy<RawParseTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(TreeBuilding::new()));

/// Source text to a resolved document.
pub fn resolution_pipeline<R>(registry: R, config: BlocksConfig) -> DocumentTransform
where
    R: BlockRegistry + Send + Sync + 'static,
{
    Transform::from_fn(Ok)
        .then(TreeBuilding::with_max_depth(config.parser.max_depth))
        .then(Resolution::new(registry, config))
}
