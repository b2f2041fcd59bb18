//! Block type definitions
//!
//! The callbacks of a definition are opaque pure functions supplied by the host. A
//! callback that returns `Err` fails the step it belongs to (a validation, or one
//! deprecated candidate), never the parse. Failure must be reported that way: a callback
//! that panics is not caught, and the panic unwinds out of the parse call.

use super::schema::AttributeSchemas;
use crate::blocks::ast::Attributes;
use std::fmt;
use std::sync::Arc;

/// Error returned by a `save` or `migrate` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackError {
    pub message: String,
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        CallbackError {
            message: message.into(),
        }
    }
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback failed: {}", self.message)
    }
}

impl std::error::Error for CallbackError {}

impl From<String> for CallbackError {
    fn from(message: String) -> Self {
        CallbackError { message }
    }
}

impl From<&str> for CallbackError {
    fn from(message: &str) -> Self {
        CallbackError::new(message)
    }
}

/// Renders markup for a set of attributes. Panics are not caught; return `Err` instead.
pub type SaveFn = Arc<dyn Fn(&Attributes) -> Result<String, CallbackError> + Send + Sync>;
/// Maps deprecated attributes to the current shape. Panics are not caught; return `Err`
/// to move on to the next deprecated version.
pub type MigrateFn = Arc<dyn Fn(&Attributes) -> Result<Attributes, CallbackError> + Send + Sync>;
/// Gate run before a deprecated version is tried. Panics are not caught.
pub type EligibilityFn = Arc<dyn Fn(&Attributes) -> bool + Send + Sync>;

/// A registered block type.
#[derive(Clone)]
pub struct BlockType {
    /// Fully qualified name.
    pub name: String,
    pub attributes: AttributeSchemas,
    pub save: SaveFn,
    /// Previous versions, newest first.
    pub deprecated: Vec<DeprecatedVersion>,
}

impl BlockType {
    pub fn new<F>(name: impl Into<String>, attributes: AttributeSchemas, save: F) -> Self
    where
        F: Fn(&Attributes) -> Result<String, CallbackError> + Send + Sync + 'static,
    {
        BlockType {
            name: name.into(),
            attributes,
            save: Arc::new(save),
            deprecated: Vec::new(),
        }
    }

    /// Append a deprecated version. Call from newest to oldest.
    pub fn deprecation(mut self, version: DeprecatedVersion) -> Self {
        self.deprecated.push(version);
        self
    }

    pub fn save(&self, attributes: &Attributes) -> Result<String, CallbackError> {
        (self.save)(attributes)
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("deprecated", &self.deprecated)
            .finish_non_exhaustive()
    }
}

/// An older shape of a block type, kept so stored content in that shape still resolves.
#[derive(Clone)]
pub struct DeprecatedVersion {
    pub attributes: AttributeSchemas,
    pub save: SaveFn,
    /// Converts attributes to the current shape; identity when absent.
    pub migrate: Option<MigrateFn>,
    /// Gate on the attributes extracted under this version's schemas.
    pub is_eligible: Option<EligibilityFn>,
}

impl DeprecatedVersion {
    pub fn new<F>(attributes: AttributeSchemas, save: F) -> Self
    where
        F: Fn(&Attributes) -> Result<String, CallbackError> + Send + Sync + 'static,
    {
        DeprecatedVersion {
            attributes,
            save: Arc::new(save),
            migrate: None,
            is_eligible: None,
        }
    }

    pub fn with_migrate<F>(mut self, migrate: F) -> Self
    where
        F: Fn(&Attributes) -> Result<Attributes, CallbackError> + Send + Sync + 'static,
    {
        self.migrate = Some(Arc::new(migrate));
        self
    }

    pub fn with_eligibility<F>(mut self, is_eligible: F) -> Self
    where
        F: Fn(&Attributes) -> bool + Send + Sync + 'static,
    {
        self.is_eligible = Some(Arc::new(is_eligible));
        self
    }

    pub fn save(&self, attributes: &Attributes) -> Result<String, CallbackError> {
        (self.save)(attributes)
    }

    pub fn migrate(&self, attributes: &Attributes) -> Result<Attributes, CallbackError> {
        match &self.migrate {
            Some(migrate) => migrate(attributes),
            None => Ok(attributes.clone()),
        }
    }

    pub fn is_eligible(&self, attributes: &Attributes) -> bool {
        self.is_eligible
            .as_ref()
            .map_or(true, |is_eligible| is_eligible(attributes))
    }
}

impl fmt::Debug for DeprecatedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeprecatedVersion")
            .field("attributes", &self.attributes)
            .field("migrate", &self.migrate.is_some())
            .field("is_eligible", &self.is_eligible.is_some())
            .finish_non_exhaustive()
    }
}
