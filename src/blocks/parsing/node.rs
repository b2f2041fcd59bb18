//! Raw block nodes

use crate::blocks::ast::{Attributes, Delimiters};
use std::ops::Range;

/// A block as found in the source, before any registry lookup.
///
/// `inner_content` interleaves literal chunks with one `None` slot per entry of
/// `inner_blocks`. Splicing the serialized children into those slots and wrapping the
/// result in `delimiters` gives back `span` of the source, byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlockNode {
    /// Fully qualified name, `None` for a freeform run of top-level text.
    pub name: Option<String>,
    /// JSON object of the opening delimiter.
    pub attributes: Option<Attributes>,
    pub inner_blocks: Vec<RawBlockNode>,
    /// The node's own markup, nested block markup excluded.
    pub inner_html: String,
    pub inner_content: Vec<Option<String>>,
    pub delimiters: Delimiters,
    /// Byte range of the whole node in the source.
    pub span: Range<usize>,
}

impl RawBlockNode {
    /// A freeform node wrapping top-level text.
    pub fn freeform(text: impl Into<String>, span: Range<usize>) -> Self {
        let text = text.into();
        RawBlockNode {
            name: None,
            attributes: None,
            inner_blocks: Vec::new(),
            inner_html: text.clone(),
            inner_content: vec![Some(text)],
            delimiters: Delimiters::freeform(),
            span,
        }
    }

    pub fn is_freeform(&self) -> bool {
        self.name.is_none()
    }
}
