//! Resolved block tree
//!
//!     The output of a full parse is a forest of [ResolvedBlock]s wrapped in a
//!     [Document] together with the diagnostics collected on the way.
//!
//!     Resolved blocks are derived from the raw tree built by
//!     [parsing](crate::blocks::parsing) and are never mutated in place: a migration
//!     produces a new block. Every block keeps its verbatim inner markup and delimiter
//!     text, so the serializer can reproduce the source byte-for-byte no matter how
//!     resolution went.

pub mod content;
pub mod diagnostics;
pub mod resolved;

pub use content::{BlockUpgrade, Delimiters};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSeverity};
pub use resolved::{Blocks, ResolvedBlock};

use serde::Serialize;

/// Attribute values of a block, keyed by attribute name.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// A fully resolved document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub blocks: Vec<ResolvedBlock>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn new(blocks: Vec<ResolvedBlock>, diagnostics: Vec<Diagnostic>) -> Self {
        Document {
            blocks,
            diagnostics,
        }
    }

    /// Depth-first iteration over every block, nested ones included.
    pub fn iter(&self) -> Blocks<'_> {
        Blocks::new(&self.blocks)
    }

    /// Blocks that failed validation and migration.
    pub fn invalid_blocks(&self) -> impl Iterator<Item = &ResolvedBlock> {
        self.iter().filter(|b| !b.is_valid)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }
}
