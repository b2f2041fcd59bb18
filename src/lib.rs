//! # wp-block-parser
//!
//! A lossless parser for block-delimited HTML documents.
//!
//! Documents are HTML with comment delimiters marking block boundaries:
//!
//! ```text
//! <!-- wp:paragraph {"dropCap":true} -->
//! <p class="has-drop-cap">Hi</p>
//! <!-- /wp:paragraph -->
//! <!-- wp:separator /-->
//! ```
//!
//! File Layout
//!
//! The pipeline lives under [blocks], one module per stage:
//!
//! src/blocks
//!   ├── lexing       Delimiter scanning (logos) into a flat token stream
//!   ├── parsing      Explicit-stack tree builder producing raw block nodes
//!   ├── building     Attribute extraction from comment JSON and markup
//!   ├── validation   Markup equivalence between saved and stored content
//!   ├── migration    Deprecated-version resolution
//!   ├── formats      Serializers (lossless, canonical) and treeviz
//!   ├── transforms   Composable stage pipelines
//!   └── loader       Files and strings into pipelines
//!
//! Configuration (depth limit, whitespace policy) is loaded by the
//! `wp-block-parser-config` crate and passed to [BlockParser::with_config].
//!
//! For testing guidelines and the fluent assertion API, see [blocks::testing].

#![allow(rustdoc::invalid_html_tags)]

pub mod blocks;

pub use blocks::ast::{Attributes, Document, ResolvedBlock};
pub use blocks::formats::serializer::{serialize, serialize_canonical};
pub use blocks::loader::DocumentLoader;
pub use blocks::parser::{parse, BlockParser};
pub use blocks::parsing::{parse_raw, RawBlockNode};
pub use blocks::registry::{BlockRegistry, BlockType, MapRegistry};
pub use wp_block_parser_config::{BlocksConfig, WhitespacePolicy};
