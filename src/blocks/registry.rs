//! Block type registry
//!
//!     The parser consults block definitions through the read-only [BlockRegistry]
//!     trait. The registry is always passed in by the caller; there is no global one.
//!     [MapRegistry] is a plain map implementation for hosts and tests.

pub mod block_type;
pub mod schema;

pub use block_type::{
    BlockType, CallbackError, DeprecatedVersion, EligibilityFn, MigrateFn, SaveFn,
};
pub use schema::{AttributeSchema, AttributeSchemas, AttributeSource, AttributeType};

use crate::blocks::token::DEFAULT_NAMESPACE;
use std::collections::HashMap;

/// Read-only lookup of block definitions by fully qualified name.
pub trait BlockRegistry {
    fn lookup(&self, name: &str) -> Option<&BlockType>;
}

impl<R: BlockRegistry + ?Sized> BlockRegistry for &R {
    fn lookup(&self, name: &str) -> Option<&BlockType> {
        (**self).lookup(name)
    }
}

impl BlockRegistry for HashMap<String, BlockType> {
    fn lookup(&self, name: &str) -> Option<&BlockType> {
        self.get(name)
    }
}

/// `HashMap`-backed registry.
#[derive(Debug, Clone, Default)]
pub struct MapRegistry {
    types: HashMap<String, BlockType>,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type, returning the definition it replaces.
    ///
    /// Names without a namespace are registered under `core/`.
    pub fn register(&mut self, mut block_type: BlockType) -> Option<BlockType> {
        block_type.name = qualify(&block_type.name);
        self.types.insert(block_type.name.clone(), block_type)
    }

    /// Builder form of [MapRegistry::register].
    pub fn with(mut self, block_type: BlockType) -> Self {
        self.register(block_type);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl BlockRegistry for MapRegistry {
    fn lookup(&self, name: &str) -> Option<&BlockType> {
        self.types.get(name)
    }
}

fn qualify(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("{}/{}", DEFAULT_NAMESPACE, name)
    }
}
