//! Diagnostic collection
//!
//! Parsing never fails: malformed delimiters, unbalanced nesting and unknown blocks all
//! degrade to "keep the bytes and mark the situation". The marking is a [Diagnostic]
//! with the byte span of the offending source. Only [DiagnosticSeverity::Error]
//! diagnostics correspond to failures the caller must act on (the HTML facility could
//! not process a block's markup).

use serde::Serialize;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Delimiter-shaped comment whose JSON does not parse; kept as text.
    InvalidDelimiterJson,
    /// Closer with no open block of that name; kept as text.
    OrphanCloser,
    /// Block implicitly closed by end of input or an outer closer.
    UnclosedBlock,
    /// Opener past the configured nesting limit; kept as text.
    DepthLimitExceeded,
    /// Block name not found in the registry.
    UnregisteredBlock,
    /// Stored markup matched neither the current nor any deprecated version.
    InvalidContent,
    /// The HTML facility failed on the block's markup.
    HtmlFacilityFailure,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::InvalidDelimiterJson => "invalid-delimiter-json",
            DiagnosticKind::OrphanCloser => "orphan-closer",
            DiagnosticKind::UnclosedBlock => "unclosed-block",
            DiagnosticKind::DepthLimitExceeded => "depth-limit-exceeded",
            DiagnosticKind::UnregisteredBlock => "unregistered-block",
            DiagnosticKind::InvalidContent => "invalid-content",
            DiagnosticKind::HtmlFacilityFailure => "html-facility-failure",
        }
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            DiagnosticKind::HtmlFacilityFailure => DiagnosticSeverity::Error,
            DiagnosticKind::UnregisteredBlock => DiagnosticSeverity::Information,
            _ => DiagnosticSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub span: Range<usize>,
    pub severity: DiagnosticSeverity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Range<usize>, message: impl Into<String>) -> Self {
        Diagnostic {
            span,
            severity: kind.severity(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} at {}..{}",
            self.severity,
            self.kind.code(),
            self.message,
            self.span.start,
            self.span.end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diag = Diagnostic::new(DiagnosticKind::OrphanCloser, 4..20, "no open block");
        assert_eq!(
            diag.to_string(),
            "warning [orphan-closer]: no open block at 4..20"
        );
    }

    #[test]
    fn test_only_facility_failures_are_errors() {
        assert_eq!(
            DiagnosticKind::HtmlFacilityFailure.severity(),
            DiagnosticSeverity::Error
        );
        assert_ne!(
            DiagnosticKind::InvalidContent.severity(),
            DiagnosticSeverity::Error
        );
    }
}
