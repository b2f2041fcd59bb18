//! Block validation
//!
//!     A block is valid when the markup its definition would save for the resolved
//!     attributes is equivalent to the markup stored in the document.
//!
//! Equivalence
//!
//!     Equivalence is a pure function of the two strings and the
//!     [ValidationConfig]. Identical strings are equivalent without parsing. Otherwise
//!     both sides go through the HTML facility and are compared as canonical token lists,
//!     see [canonical] for what is normalized.
//!
//!     The whitespace rule is a versioned contract
//!     ([WhitespacePolicy](wp_block_parser_config::WhitespacePolicy)): tightening or
//!     loosening it changes which stored content validates.

pub mod canonical;

pub use canonical::{canonicalize, CanonicalToken};

use crate::blocks::ast::Attributes;
use crate::blocks::html::{FragmentError, HtmlFacility};
use crate::blocks::registry::CallbackError;
use wp_block_parser_config::ValidationConfig;

/// Compares saved markup with stored markup.
pub struct Validator<'a> {
    facility: &'a dyn HtmlFacility,
    options: ValidationConfig,
}

impl<'a> Validator<'a> {
    pub fn new(facility: &'a dyn HtmlFacility, options: ValidationConfig) -> Self {
        Validator { facility, options }
    }

    /// Whether two markup strings are equivalent.
    pub fn is_equivalent(&self, expected: &str, actual: &str) -> Result<bool, FragmentError> {
        if expected == actual {
            return Ok(true);
        }

        let expected_tokens = canonicalize(&self.facility.parse_fragment(expected)?, &self.options);
        let actual_tokens = canonicalize(&self.facility.parse_fragment(actual)?, &self.options);
        if expected_tokens == actual_tokens {
            return Ok(true);
        }

        if log::log_enabled!(log::Level::Debug) {
            let position = expected_tokens
                .iter()
                .zip(&actual_tokens)
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| expected_tokens.len().min(actual_tokens.len()));
            let show = |tokens: &[CanonicalToken]| {
                tokens
                    .get(position)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "end of markup".to_string())
            };
            log::debug!(
                "markup differs at token {}: expected {}, found {}",
                position,
                show(&expected_tokens),
                show(&actual_tokens)
            );
        }
        Ok(false)
    }

    /// Run `save` on the attributes and compare its output with the stored markup.
    ///
    /// A failing `save` makes the block invalid.
    pub fn validate<F>(&self, save: F, attributes: &Attributes, stored: &str) -> Result<bool, FragmentError>
    where
        F: Fn(&Attributes) -> Result<String, CallbackError>,
    {
        match save(attributes) {
            Ok(saved) => self.is_equivalent(&saved, stored),
            Err(e) => {
                log::debug!("save failed during validation: {}", e);
                Ok(false)
            }
        }
    }
}
