//! Resolved blocks

use super::{Attributes, BlockUpgrade, Delimiters};
use crate::blocks::html::FragmentError;
use serde::Serialize;

/// A block after attribute resolution, validation and migration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBlock {
    /// Fully qualified block name; `None` for freeform runs.
    pub name: Option<String>,
    pub attributes: Attributes,
    pub inner_blocks: Vec<ResolvedBlock>,
    pub is_valid: bool,
    /// Inner markup exactly as stored, nested block markup excluded.
    pub original_content: String,
    /// Index into the deprecated versions that produced `attributes`.
    pub migrated_from: Option<usize>,
    /// Literal chunks with `None` slots for `inner_blocks`, in source order.
    pub inner_content: Vec<Option<String>>,
    pub delimiters: Delimiters,
    /// Canonical replacement after a successful migration.
    pub upgrade: Option<BlockUpgrade>,
    /// HTML facility failure encountered while resolving this block.
    pub error: Option<FragmentError>,
}

impl ResolvedBlock {
    pub fn is_freeform(&self) -> bool {
        self.name.is_none()
    }

    /// Block name, or an empty string for freeform runs.
    pub fn block_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Depth-first iteration over this block and its descendants.
    pub fn iter(&self) -> Blocks<'_> {
        Blocks::new(std::slice::from_ref(self))
    }
}

/// Depth-first, pre-order iterator over a block forest.
///
/// Uses an explicit stack so deeply nested trees do not grow the call stack.
pub struct Blocks<'a> {
    stack: Vec<std::slice::Iter<'a, ResolvedBlock>>,
}

impl<'a> Blocks<'a> {
    pub fn new(blocks: &'a [ResolvedBlock]) -> Self {
        Blocks {
            stack: vec![blocks.iter()],
        }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a ResolvedBlock;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(block) => {
                    if !block.inner_blocks.is_empty() {
                        self.stack.push(block.inner_blocks.iter());
                    }
                    return Some(block);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> ResolvedBlock {
        ResolvedBlock {
            name: Some(name.to_string()),
            attributes: Attributes::new(),
            inner_blocks: vec![],
            is_valid: true,
            original_content: String::new(),
            migrated_from: None,
            inner_content: vec![],
            delimiters: Delimiters::default(),
            upgrade: None,
            error: None,
        }
    }

    #[test]
    fn test_iteration_is_pre_order() {
        let mut group = leaf("core/group");
        group.inner_blocks = vec![leaf("core/a"), leaf("core/b")];
        let forest = vec![group, leaf("core/c")];

        let names: Vec<&str> = Blocks::new(&forest).map(|b| b.block_name()).collect();
        assert_eq!(names, vec!["core/group", "core/a", "core/b", "core/c"]);
    }
}
