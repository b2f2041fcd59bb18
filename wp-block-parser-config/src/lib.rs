//! Configuration loader for the block parser.
//!
//! `defaults/blocks.default.toml` is embedded into the crate so that documented
//! defaults and runtime behavior stay in sync. Callers layer their own files on
//! top of those defaults via [`Loader`] before deserializing into [`BlocksConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/blocks.default.toml");

/// Top-level configuration consumed by the parser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlocksConfig {
    pub parser: ParserConfig,
    pub validation: ValidationConfig,
}

/// Tree construction limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParserConfig {
    /// Maximum block nesting depth. Openers past this depth stay literal text.
    pub max_depth: usize,
}

/// Knobs of the markup equivalence used by block validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationConfig {
    pub whitespace: WhitespacePolicy,
    pub sort_classes: bool,
}

/// How whitespace-only text is treated when two markup strings are compared.
///
/// This is a versioned contract: changing it changes which stored content is
/// considered valid without any schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespacePolicy {
    /// Whitespace-only text between elements is insignificant (version 1).
    CollapseBetweenElements,
    /// Every text node is significant.
    Strict,
}

impl Default for BlocksConfig {
    fn default() -> Self {
        BlocksConfig {
            parser: ParserConfig { max_depth: 256 },
            validation: ValidationConfig {
                whitespace: WhitespacePolicy::CollapseBetweenElements,
                sort_classes: true,
            },
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer configuration given as a TOML string.
    pub fn with_toml_str(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BlocksConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BlocksConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parser.max_depth, 256);
        assert_eq!(
            config.validation.whitespace,
            WhitespacePolicy::CollapseBetweenElements
        );
        assert!(config.validation.sort_classes);
    }

    #[test]
    fn embedded_defaults_match_default_impl() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config, BlocksConfig::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("validation.whitespace", "strict")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.validation.whitespace, WhitespacePolicy::Strict);
    }

    #[test]
    fn layers_toml_strings() {
        let config = Loader::new()
            .with_toml_str("[parser]\nmax_depth = 8\n")
            .build()
            .expect("config to build");
        assert_eq!(config.parser.max_depth, 8);
        assert!(config.validation.sort_classes);
    }

    #[test]
    fn rejects_unknown_policy() {
        let result = Loader::new()
            .set_override("validation.whitespace", "loose")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
