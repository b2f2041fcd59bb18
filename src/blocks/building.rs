//! Building resolved attributes
//!
//!     Raw nodes carry only the JSON of their opening delimiter. Building turns a raw node
//!     plus the schemas of its block type into the attribute map of a resolved block.
//!
//! Sources
//!
//!     Comment-sourced attributes are read from the delimiter JSON. Every other source
//!     reads the node's own `inner_html` through the [HtmlFacility](crate::blocks::html::HtmlFacility):
//!
//!         attribute   an HTML attribute of the first element matching a selector
//!         text        text content of the first match
//!         html        inner HTML of the first match (or selected children, multiline)
//!         query       one object per match, from nested schemas scoped to the match
//!         tag         tag name of the first match
//!         raw         the whole inner HTML
//!
//!     See [extraction] for fallback rules.

pub mod extraction;

pub use extraction::{extract_attributes, AttributeExtractor};
