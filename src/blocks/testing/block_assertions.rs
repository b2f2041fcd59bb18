//! Fluent assertions over resolved block trees
//!
//!     Tests describe the blocks they expect instead of walking fields by hand. Each
//!     assertion panics with a path such as `blocks[1].inner_blocks[0]` so a failure
//!     points at the block that broke.

use super::matchers::TextMatch;
use crate::blocks::ast::ResolvedBlock;
use serde_json::Value;

/// Entry point: assertions over a block forest.
pub fn assert_blocks(blocks: &[ResolvedBlock]) -> BlocksAssertion<'_> {
    BlocksAssertion {
        blocks,
        context: "blocks".to_string(),
    }
}

pub struct BlocksAssertion<'a> {
    blocks: &'a [ResolvedBlock],
    context: String,
}

impl<'a> BlocksAssertion<'a> {
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.blocks.len(),
            expected,
            "{}: Expected {} blocks, found {}",
            self.context,
            expected,
            self.blocks.len()
        );
        self
    }

    /// Run assertions on the block at `index`.
    pub fn block<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>),
    {
        let block = self.blocks.get(index).unwrap_or_else(|| {
            panic!(
                "{}: No block at index {} (only {})",
                self.context,
                index,
                self.blocks.len()
            )
        });
        check(BlockAssertion {
            block,
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Every block, nested ones included, is valid.
    pub fn all_valid(self) -> Self {
        for (index, block) in self.blocks.iter().enumerate() {
            for nested in block.iter() {
                assert!(
                    nested.is_valid,
                    "{}[{}]: Expected every block to be valid, {} is not",
                    self.context,
                    index,
                    describe(nested)
                );
            }
        }
        self
    }
}

pub struct BlockAssertion<'a> {
    block: &'a ResolvedBlock,
    context: String,
}

impl<'a> BlockAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.block.name.as_deref(),
            Some(expected),
            "{}: Expected block {}, found {}",
            self.context,
            expected,
            describe(self.block)
        );
        self
    }

    pub fn freeform(self) -> Self {
        assert!(
            self.block.is_freeform(),
            "{}: Expected freeform content, found {}",
            self.context,
            describe(self.block)
        );
        self
    }

    pub fn valid(self) -> Self {
        assert!(self.block.is_valid, "{}: Expected a valid block", self.context);
        self
    }

    pub fn invalid(self) -> Self {
        assert!(!self.block.is_valid, "{}: Expected an invalid block", self.context);
        self
    }

    pub fn migrated_from(self, index: usize) -> Self {
        assert_eq!(
            self.block.migrated_from,
            Some(index),
            "{}: Expected migration from deprecation {}",
            self.context,
            index
        );
        self
    }

    pub fn not_migrated(self) -> Self {
        assert_eq!(
            self.block.migrated_from, None,
            "{}: Expected no migration",
            self.context
        );
        self
    }

    pub fn attribute(self, key: &str, expected: Value) -> Self {
        assert_eq!(
            self.block.attribute(key),
            Some(&expected),
            "{}: Unexpected value for attribute {:?}",
            self.context,
            key
        );
        self
    }

    pub fn no_attribute(self, key: &str) -> Self {
        assert!(
            self.block.attribute(key).is_none(),
            "{}: Expected no attribute {:?}, found {:?}",
            self.context,
            key,
            self.block.attribute(key)
        );
        self
    }

    /// Compare the full attribute map with a JSON object.
    pub fn attributes(self, expected: Value) -> Self {
        assert_eq!(
            Value::Object(self.block.attributes.clone()),
            expected,
            "{}: Unexpected attributes",
            self.context
        );
        self
    }

    pub fn content(self, expected: TextMatch) -> Self {
        expected.assert(&self.block.original_content, &self.context);
        self
    }

    pub fn content_is(self, expected: &str) -> Self {
        self.content(TextMatch::Exact(expected.to_string()))
    }

    pub fn has_error(self) -> Self {
        assert!(
            self.block.error.is_some(),
            "{}: Expected an HTML facility error",
            self.context
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        assert_eq!(
            self.block.inner_blocks.len(),
            expected,
            "{}: Expected {} inner blocks, found {}",
            self.context,
            expected,
            self.block.inner_blocks.len()
        );
        self
    }

    pub fn child<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>),
    {
        let child = self.block.inner_blocks.get(index).unwrap_or_else(|| {
            panic!(
                "{}: No inner block at index {} (only {})",
                self.context,
                index,
                self.block.inner_blocks.len()
            )
        });
        check(BlockAssertion {
            block: child,
            context: format!("{}.inner_blocks[{}]", self.context, index),
        });
        self
    }
}

fn describe(block: &ResolvedBlock) -> String {
    match &block.name {
        Some(name) => name.clone(),
        None => "freeform content".to_string(),
    }
}
