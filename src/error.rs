//! Classified procedure errors.
//!
//! Every failure raised by the procedure registry (parameter validation,
//! invocation, result validation) or by the authenticator travels through the
//! pipeline as a [`ProcedureError`]. The kind drives the default HTTP
//! classification; the optional machine code lets route tables special-case
//! individual failures without string-matching messages.

use std::fmt;

/// Broad classification of a procedure failure.
///
/// The default error handler maps these onto HTTP status codes; see
/// `pipeline::traditional_error_response`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller lacks an authorization capability required by the procedure.
    MissingCapability,
    /// A record referenced by the arguments does not exist at the data layer.
    MissingRecord,
    /// Arguments or result violated the procedure's declared schema.
    Validation,
    /// A classified application/business error raised by the procedure.
    Application,
    /// Anything the raising code could not classify.
    Unknown,
}

impl ErrorKind {
    /// Stable name used as the `exception` field of serialized failures.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingCapability => "missing_capability",
            ErrorKind::MissingRecord => "missing_record",
            ErrorKind::Validation => "validation",
            ErrorKind::Application => "application",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// A failure raised by an external collaborator, carried through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureError {
    /// Classification consulted by error handlers.
    pub kind: ErrorKind,
    /// Machine-readable code, e.g. `invalidtoken` or `shortnametaken`.
    pub error_code: Option<String>,
    /// Human-readable message, always safe to expose to callers.
    pub message: String,
    /// Extra diagnostic detail. Only serialized in verbose mode.
    pub debug_info: Option<String>,
    /// Captured trace. Only serialized in verbose mode.
    pub trace: Option<String>,
}

impl ProcedureError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            error_code: None,
            message: message.into(),
            debug_info: None,
            trace: None,
        }
    }

    #[must_use]
    pub fn missing_capability(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCapability, message)
    }

    #[must_use]
    pub fn missing_record(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingRecord, message)
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    #[must_use]
    pub fn application(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Application, message)
    }

    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_debug_info(mut self, info: impl Into<String>) -> Self {
        self.debug_info = Some(info.into());
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Whether the error code equals `code` exactly.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.error_code.as_deref() == Some(code)
    }

    /// Whether the error code contains `needle` as a substring.
    #[must_use]
    pub fn code_contains(&self, needle: &str) -> bool {
        self.error_code
            .as_deref()
            .is_some_and(|c| c.contains(needle))
    }
}

impl fmt::Display for ProcedureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_code {
            Some(code) => write!(f, "{} ({}): {}", self.kind.as_str(), code, self.message),
            None => write!(f, "{}: {}", self.kind.as_str(), self.message),
        }
    }
}

impl std::error::Error for ProcedureError {}
