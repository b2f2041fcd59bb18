//! Source-preservation data shared by raw and resolved blocks.

use super::Attributes;
use serde::Serialize;

/// Verbatim delimiter text of a block.
///
/// Freeform runs have an empty opener and no closer. Blocks closed implicitly (end of
/// input or a mismatched outer closer) have no closer either; self-closing blocks keep
/// their whole `<!-- wp:name /-->` comment as the opener.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Delimiters {
    pub opener: String,
    pub closer: Option<String>,
}

impl Delimiters {
    pub fn new(opener: impl Into<String>, closer: Option<String>) -> Self {
        Delimiters {
            opener: opener.into(),
            closer,
        }
    }

    pub fn freeform() -> Self {
        Delimiters::default()
    }
}

/// Canonical form of a block after a successful migration.
///
/// `attributes` holds the comment-serialized attributes and `content` the current
/// `save` output. Only used when serializing canonically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockUpgrade {
    pub attributes: Attributes,
    pub content: String,
}
