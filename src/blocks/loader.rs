//! Document loading utilities
//!
//! `DocumentLoader` reads source text from a file or a string and runs transforms on it.
//!
//! ```rust,ignore
//! use wp_block_parser::blocks::loader::DocumentLoader;
//! use wp_block_parser::blocks::transforms::standard::RAW_PARSE;
//!
//! let loader = DocumentLoader::from_path("post.html")?;
//! let document = loader.parse(&registry)?;
//! let raw = loader.with(&RAW_PARSE)?;
//! ```

use crate::blocks::ast::Document;
use crate::blocks::parser::BlockParser;
use crate::blocks::parsing::RawDocument;
use crate::blocks::registry::BlockRegistry;
use crate::blocks::token::TokenStream;
use crate::blocks::transforms::standard::{RAW_PARSE, TOKENIZATION};
use crate::blocks::transforms::{Transform, TransformError};
use std::fs;
use std::path::Path;
use wp_block_parser_config::BlocksConfig;

/// Error that can occur when loading documents
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// IO error when reading file
    IoError(String),
    /// Transform error
    TransformError(TransformError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::IoError(msg) => write!(f, "IO error: {}", msg),
            LoaderError::TransformError(err) => write!(f, "Transform error: {}", err),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

impl From<TransformError> for LoaderError {
    fn from(err: TransformError) -> Self {
        LoaderError::TransformError(err)
    }
}

/// Source text with transform shortcuts.
pub struct DocumentLoader {
    source: String,
}

impl DocumentLoader {
    /// Load from a file path. The file must be UTF-8.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let source = fs::read_to_string(path)?;
        Ok(DocumentLoader { source })
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
        }
    }

    /// Run a custom transform on the source
    ///
    /// This is the generic method that the shortcuts use internally.
    pub fn with<O: 'static>(&self, transform: &Transform<String, O>) -> Result<O, LoaderError> {
        Ok(transform.run(self.source.clone())?)
    }

    /// Shortcut for `.with(&TOKENIZATION)`.
    pub fn tokenize(&self) -> Result<TokenStream, LoaderError> {
        self.with(&TOKENIZATION)
    }

    /// Shortcut for `.with(&RAW_PARSE)`.
    pub fn parse_raw(&self) -> Result<RawDocument, LoaderError> {
        self.with(&RAW_PARSE)
    }

    /// Parse and resolve against `registry` with default configuration.
    pub fn parse(&self, registry: &dyn BlockRegistry) -> Result<Document, LoaderError> {
        self.parse_with_config(registry, BlocksConfig::default())
    }

    pub fn parse_with_config(
        &self,
        registry: &dyn BlockRegistry,
        config: BlocksConfig,
    ) -> Result<Document, LoaderError> {
        Ok(BlockParser::new(registry)
            .with_config(config)
            .parse_document(&self.source))
    }

    pub fn source(&self) -> String {
        self.source.clone()
    }

    /// Borrowed source, when an owned copy is not needed.
    pub fn source_ref(&self) -> &str {
        &self.source
    }
}
