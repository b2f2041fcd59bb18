//! HTML fragment facility
//!
//!     Attribute extraction and validation both need to look inside a block's markup.
//!     Neither parses HTML itself: they go through the [HtmlFacility] trait, which turns a
//!     fragment into a queryable [Fragment] arena and serializes nodes back to markup.
//!
//!     [Html5everFacility] is the default implementation, backed by html5ever and
//!     markup5ever_rcdom. Any other parser can be plugged into
//!     [BlockParser](crate::blocks::parser::BlockParser) by implementing the trait.
//!
//! Querying
//!
//!     Fragments are queried with a small CSS selector subset, see [selector]. Selector
//!     matching runs against the arena, never against the facility's own tree.

pub mod facility;
pub mod fragment;
pub mod selector;

pub use facility::Html5everFacility;
pub use fragment::{Fragment, FragmentNode, NodeId, NodeKind};
pub use selector::{Selector, SelectorError};

use serde::Serialize;
use std::fmt;

/// Failure of the HTML facility.
///
/// This is the only failure the parser reports to callers: a block whose markup cannot
/// be processed keeps its original content and carries the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FragmentError {
    /// The parsed document has no body to hold the fragment.
    MissingBody,
    /// A node id that does not belong to the fragment.
    UnknownNode(usize),
    /// Serialization failed.
    Serialization(String),
    /// Serialized output was not valid UTF-8.
    Encoding(String),
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentError::MissingBody => write!(f, "fragment parse produced no body element"),
            FragmentError::UnknownNode(id) => write!(f, "node {} is not part of the fragment", id),
            FragmentError::Serialization(msg) => write!(f, "HTML serialization failed: {}", msg),
            FragmentError::Encoding(msg) => write!(f, "serialized HTML is not UTF-8: {}", msg),
        }
    }
}

impl std::error::Error for FragmentError {}

/// What part of a node to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeScope {
    /// The node's children only.
    Inner,
    /// The node itself with its children.
    Outer,
}

/// Capability interface over an HTML fragment parser.
pub trait HtmlFacility {
    /// Parse markup as the body content of a document.
    fn parse_fragment(&self, html: &str) -> Result<Fragment, FragmentError>;

    /// Serialize a node of a fragment previously returned by `parse_fragment`.
    fn serialize(
        &self,
        fragment: &Fragment,
        node: NodeId,
        scope: SerializeScope,
    ) -> Result<String, FragmentError>;
}
