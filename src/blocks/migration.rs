//! Deprecated-version resolution
//!
//!     When stored markup does not validate against the current definition, the
//!     deprecated versions are tried one at a time, newest first:
//!
//!         Untried(i) ── ineligible / invalid / any error ──────> Untried(i + 1)
//!         Untried(i) ── valid under version i ───────────────> Migrated(i)
//!         Untried(n) ────────────────────────────────────────> Exhausted
//!
//!     At `Untried(i)` the markup is extracted with version i's schemas. If the version
//!     has an eligibility gate it sees those attributes. The version's `save` must then
//!     reproduce the stored markup, after which `migrate` maps the attributes to the
//!     current shape.
//!
//!     A candidate that gets that far is final. Its migrated attributes are checked once
//!     more against the current definition: the current `save` output must read back,
//!     under the current schemas, to attributes that save to equivalent markup. The
//!     outcome of that check becomes the block's validity; a failed check does not
//!     resume the search.
//!
//!     Every visited index is recorded in the attempt log, in order. An HTML facility
//!     failure while trying a candidate is logged there too and the search moves on; it
//!     is returned to the caller only when no later candidate is accepted.

use crate::blocks::ast::Attributes;
use crate::blocks::building::AttributeExtractor;
use crate::blocks::html::{FragmentError, HtmlFacility};
use crate::blocks::registry::{BlockType, DeprecatedVersion};
use crate::blocks::validation::Validator;
use std::fmt;
use wp_block_parser_config::ValidationConfig;

/// Position of the resolver in the deprecated-version chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Untried(usize),
    Migrated(usize),
    Exhausted,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::Untried(i) => write!(f, "untried({})", i),
            MigrationState::Migrated(i) => write!(f, "migrated({})", i),
            MigrationState::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Why a candidate was left behind, or how it was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Ineligible,
    InvalidContent,
    MigrateFailed(String),
    FacilityFailed(FragmentError),
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationAttempt {
    pub index: usize,
    pub outcome: AttemptOutcome,
}

/// Terminal result of the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    /// `Migrated(i)` or `Exhausted`.
    pub state: MigrationState,
    /// Attributes in the current shape, present when migrated.
    pub attributes: Option<Attributes>,
    /// Result of the final check against the current definition.
    pub is_valid: bool,
    /// Output of the current `save` for the migrated attributes.
    pub saved: Option<String>,
    pub attempts: Vec<MigrationAttempt>,
}

impl MigrationOutcome {
    pub fn migrated_from(&self) -> Option<usize> {
        match self.state {
            MigrationState::Migrated(i) => Some(i),
            _ => None,
        }
    }
}

enum Candidate {
    Rejected(AttemptOutcome),
    Accepted(Attributes),
}

/// Walks the deprecated versions of one block type.
pub struct MigrationResolver<'a> {
    facility: &'a dyn HtmlFacility,
    options: ValidationConfig,
}

impl<'a> MigrationResolver<'a> {
    pub fn new(facility: &'a dyn HtmlFacility, options: ValidationConfig) -> Self {
        MigrationResolver { facility, options }
    }

    /// Resolve stored content that failed current validation.
    pub fn resolve(
        &self,
        block_type: &BlockType,
        comment: Option<&Attributes>,
        inner_html: &str,
    ) -> Result<MigrationOutcome, FragmentError> {
        let mut attempts = Vec::new();
        let mut state = MigrationState::Untried(0);
        let mut facility_error = None;

        loop {
            let index = match state {
                MigrationState::Untried(i) if i < block_type.deprecated.len() => i,
                MigrationState::Untried(_) => {
                    state = MigrationState::Exhausted;
                    continue;
                }
                MigrationState::Migrated(_) | MigrationState::Exhausted => break,
            };

            let version = &block_type.deprecated[index];
            match self.try_candidate(version, comment, inner_html) {
                Err(e) => {
                    log::warn!("{}: deprecation {} could not be checked: {}", block_type.name, index, e);
                    attempts.push(MigrationAttempt {
                        index,
                        outcome: AttemptOutcome::FacilityFailed(e.clone()),
                    });
                    facility_error.get_or_insert(e);
                    state = MigrationState::Untried(index + 1);
                }
                Ok(Candidate::Rejected(outcome)) => {
                    log::debug!("{}: deprecation {} rejected: {:?}", block_type.name, index, outcome);
                    attempts.push(MigrationAttempt { index, outcome });
                    state = MigrationState::Untried(index + 1);
                }
                Ok(Candidate::Accepted(migrated)) => {
                    attempts.push(MigrationAttempt {
                        index,
                        outcome: AttemptOutcome::Accepted,
                    });
                    let saved = block_type.save(&migrated).ok();
                    let is_valid = match &saved {
                        Some(saved) => self.revalidate(block_type, &migrated, saved)?,
                        None => false,
                    };
                    log::debug!(
                        "{}: migrated from deprecation {} (valid: {})",
                        block_type.name,
                        index,
                        is_valid
                    );
                    return Ok(MigrationOutcome {
                        state: MigrationState::Migrated(index),
                        attributes: Some(migrated),
                        is_valid,
                        saved,
                        attempts,
                    });
                }
            }
        }

        if let Some(e) = facility_error {
            return Err(e);
        }
        log::debug!("{}: no deprecation matches the stored markup", block_type.name);
        Ok(MigrationOutcome {
            state,
            attributes: None,
            is_valid: false,
            saved: None,
            attempts,
        })
    }

    fn try_candidate(
        &self,
        version: &DeprecatedVersion,
        comment: Option<&Attributes>,
        inner_html: &str,
    ) -> Result<Candidate, FragmentError> {
        let extractor = AttributeExtractor::new(self.facility);
        let attributes = extractor.extract(&version.attributes, comment, inner_html)?;

        if !version.is_eligible(&attributes) {
            return Ok(Candidate::Rejected(AttemptOutcome::Ineligible));
        }

        let validator = Validator::new(self.facility, self.options.clone());
        if !validator.validate(|a| version.save(a), &attributes, inner_html)? {
            return Ok(Candidate::Rejected(AttemptOutcome::InvalidContent));
        }

        match version.migrate(&attributes) {
            Ok(migrated) => Ok(Candidate::Accepted(migrated)),
            Err(e) => Ok(Candidate::Rejected(AttemptOutcome::MigrateFailed(e.message))),
        }
    }

    /// Whether the current `save` output reads back as current, valid content.
    fn revalidate(
        &self,
        block_type: &BlockType,
        migrated: &Attributes,
        saved: &str,
    ) -> Result<bool, FragmentError> {
        let extractor = AttributeExtractor::new(self.facility);
        let reread = extractor.extract(&block_type.attributes, Some(migrated), saved)?;
        let validator = Validator::new(self.facility, self.options.clone());
        validator.validate(|a| block_type.save(a), &reread, saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::html::{Fragment, Html5everFacility, NodeId, SerializeScope};
    use crate::blocks::registry::{AttributeSchema, AttributeSchemas, AttributeSource};
    use wp_block_parser_config::BlocksConfig;

    fn content_schema() -> AttributeSchemas {
        AttributeSchemas::new().with(
            "content",
            AttributeSchema::string()
                .source(AttributeSource::html(Some("p")))
                .default_value(""),
        )
    }

    fn wrap(class: &'static str) -> impl Fn(&Attributes) -> Result<String, crate::blocks::registry::CallbackError> {
        move |a| {
            Ok(format!(
                "<p class=\"{}\">{}</p>",
                class,
                a.get("content").and_then(|v| v.as_str()).unwrap_or("")
            ))
        }
    }

    fn resolve(block_type: &BlockType, html: &str) -> MigrationOutcome {
        let facility = Html5everFacility::new();
        MigrationResolver::new(&facility, BlocksConfig::default().validation)
            .resolve(block_type, None, html)
            .unwrap()
    }

    #[test]
    fn test_first_matching_deprecation_wins() {
        let block = BlockType::new("core/text", content_schema(), wrap("v3"))
            .deprecation(DeprecatedVersion::new(content_schema(), wrap("v2")))
            .deprecation(DeprecatedVersion::new(content_schema(), wrap("v1")));

        let outcome = resolve(&block, "<p class=\"v1\">Hi</p>");
        assert_eq!(outcome.state, MigrationState::Migrated(1));
        assert!(outcome.is_valid);
        assert_eq!(outcome.saved.as_deref(), Some("<p class=\"v3\">Hi</p>"));
        let visited: Vec<usize> = outcome.attempts.iter().map(|a| a.index).collect();
        assert_eq!(visited, vec![0, 1]);
        assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::InvalidContent);
    }

    /// Fails on any markup carrying the `v2` class.
    struct RejectsV2(Html5everFacility);

    impl HtmlFacility for RejectsV2 {
        fn parse_fragment(&self, html: &str) -> Result<Fragment, FragmentError> {
            if html.contains("\"v2\"") {
                return Err(FragmentError::MissingBody);
            }
            self.0.parse_fragment(html)
        }

        fn serialize(
            &self,
            fragment: &Fragment,
            node: NodeId,
            scope: SerializeScope,
        ) -> Result<String, FragmentError> {
            self.0.serialize(fragment, node, scope)
        }
    }

    fn resolve_with(
        facility: &dyn HtmlFacility,
        block_type: &BlockType,
        html: &str,
    ) -> Result<MigrationOutcome, FragmentError> {
        MigrationResolver::new(facility, BlocksConfig::default().validation)
            .resolve(block_type, None, html)
    }

    #[test]
    fn test_facility_failure_moves_to_next_candidate() {
        let facility = RejectsV2(Html5everFacility::new());
        let block = BlockType::new("core/text", content_schema(), wrap("v3"))
            .deprecation(DeprecatedVersion::new(content_schema(), wrap("v2")))
            .deprecation(DeprecatedVersion::new(content_schema(), wrap("v1")));

        let outcome = resolve_with(&facility, &block, "<p class=\"v1\">Hi</p>").unwrap();
        assert_eq!(outcome.state, MigrationState::Migrated(1));
        assert!(outcome.is_valid);
        assert_eq!(
            outcome.attempts[0].outcome,
            AttemptOutcome::FacilityFailed(FragmentError::MissingBody)
        );
        assert_eq!(outcome.attempts[1].outcome, AttemptOutcome::Accepted);
    }

    #[test]
    fn test_facility_failure_is_returned_when_nothing_matches() {
        let facility = RejectsV2(Html5everFacility::new());
        let block = BlockType::new("core/text", content_schema(), wrap("v3"))
            .deprecation(DeprecatedVersion::new(content_schema(), wrap("v2")))
            .deprecation(DeprecatedVersion::new(content_schema(), wrap("v1")));

        let result = resolve_with(&facility, &block, "<p class=\"v0\">Hi</p>");
        assert_eq!(result, Err(FragmentError::MissingBody));
    }

    #[test]
    fn test_exhausted() {
        let block = BlockType::new("core/text", content_schema(), wrap("v2"))
            .deprecation(DeprecatedVersion::new(content_schema(), wrap("v1")));

        let outcome = resolve(&block, "<div>other</div>");
        assert_eq!(outcome.state, MigrationState::Exhausted);
        assert_eq!(outcome.migrated_from(), None);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.attempts.len(), 1);
    }

    #[test]
    fn test_ineligible_and_failing_candidates_are_skipped() {
        let block = BlockType::new("core/text", content_schema(), wrap("v3"))
            .deprecation(
                DeprecatedVersion::new(content_schema(), wrap("old")).with_eligibility(|_| false),
            )
            .deprecation(
                DeprecatedVersion::new(content_schema(), wrap("old"))
                    .with_migrate(|_| Err("cannot migrate".into())),
            )
            .deprecation(DeprecatedVersion::new(content_schema(), wrap("old")));

        let outcome = resolve(&block, "<p class=\"old\">Hi</p>");
        assert_eq!(outcome.migrated_from(), Some(2));
        let outcomes: Vec<AttemptOutcome> =
            outcome.attempts.iter().map(|a| a.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                AttemptOutcome::Ineligible,
                AttemptOutcome::MigrateFailed("cannot migrate".to_string()),
                AttemptOutcome::Accepted,
            ]
        );
    }

    #[test]
    fn test_migration_that_fails_current_validation_is_kept() {
        let block = BlockType::new("core/text", content_schema(), |_| {
            Err("current save is broken".into())
        })
        .deprecation(DeprecatedVersion::new(content_schema(), wrap("old")));

        let outcome = resolve(&block, "<p class=\"old\">Hi</p>");
        assert_eq!(outcome.state, MigrationState::Migrated(0));
        assert!(!outcome.is_valid);
        assert!(outcome.attributes.is_some());
    }
}
