//! Structured error types shared across plansym crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SymError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (vertex ids, domain sizes, offending text).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for symmetry detection.
///
/// Every variant aborts the enclosing detection call; none are downgraded
/// internally. Rejected candidate symmetries are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SymError {
    /// A mapping or cycle set does not describe a bijection.
    #[error("invalid bijection: {0}")]
    InvalidBijection(ErrorInfo),
    /// Permutations of different domain sizes were combined.
    #[error("domain mismatch: {0}")]
    DomainMismatch(ErrorInfo),
    /// Output of the automorphism engine could not be parsed.
    #[error("protocol violation: {0}")]
    ProtocolViolation(ErrorInfo),
    /// Launching, feeding or draining the engine subprocess failed.
    #[error("process failure: {0}")]
    ProcessFailure(ErrorInfo),
    /// Coloured graph structural errors.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// The plan handed to the encoder is not well formed.
    #[error("plan error: {0}")]
    Plan(ErrorInfo),
    /// Serialization, configuration and artefact IO errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut sep = " {";
        for (key, value) in &self.context {
            write!(f, "{sep}{key}: {value}")?;
            sep = ", ";
        }
        if !self.context.is_empty() {
            f.write_str("}")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; try: {hint}"),
            None => Ok(()),
        }
    }
}

impl SymError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SymError::InvalidBijection(info)
            | SymError::DomainMismatch(info)
            | SymError::ProtocolViolation(info)
            | SymError::ProcessFailure(info)
            | SymError::Graph(info)
            | SymError::Plan(info)
            | SymError::Serde(info) => info,
        }
    }

    /// Returns the stable family label of the error.
    pub fn family(&self) -> &'static str {
        match self {
            SymError::InvalidBijection(_) => "invalid-bijection",
            SymError::DomainMismatch(_) => "domain-mismatch",
            SymError::ProtocolViolation(_) => "protocol-violation",
            SymError::ProcessFailure(_) => "process-failure",
            SymError::Graph(_) => "graph",
            SymError::Plan(_) => "plan",
            SymError::Serde(_) => "serde",
        }
    }
}
