use std::path::Path;

use plansym_core::{ErrorInfo, SymError};

use crate::result::AutomorphismResult;
use crate::symmetry::CausalSymmetry;
use crate::SymmetryReport;

/// Serialises a detection report into indented JSON.
pub fn report_to_json(report: &SymmetryReport) -> Result<String, SymError> {
    serde_json::to_string_pretty(report)
        .map_err(|err| SymError::Serde(ErrorInfo::new("report-serialize", err.to_string())))
}

/// Deserialises a detection report from JSON text.
pub fn report_from_json(json: &str) -> Result<SymmetryReport, SymError> {
    serde_json::from_str(json)
        .map_err(|err| SymError::Serde(ErrorInfo::new("report-deserialize", err.to_string())))
}

/// Serialises causal symmetries into indented JSON.
pub fn symmetries_to_json(symmetries: &[CausalSymmetry]) -> Result<String, SymError> {
    serde_json::to_string_pretty(symmetries)
        .map_err(|err| SymError::Serde(ErrorInfo::new("symmetries-serialize", err.to_string())))
}

/// Deserialises causal symmetries, re-checking that each one is an involution.
pub fn symmetries_from_json(json: &str) -> Result<Vec<CausalSymmetry>, SymError> {
    serde_json::from_str(json)
        .map_err(|err| SymError::Serde(ErrorInfo::new("symmetries-deserialize", err.to_string())))
}

/// Serialises an automorphism result into indented JSON.
pub fn result_to_json(result: &AutomorphismResult) -> Result<String, SymError> {
    serde_json::to_string_pretty(result)
        .map_err(|err| SymError::Serde(ErrorInfo::new("result-serialize", err.to_string())))
}

/// Writes a JSON payload to disk.
pub fn write_json(path: &Path, json: &str) -> Result<(), SymError> {
    std::fs::write(path, json).map_err(|err| {
        SymError::Serde(
            ErrorInfo::new("json-write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}

/// Reads a JSON payload from disk.
pub fn read_json(path: &Path) -> Result<String, SymError> {
    std::fs::read_to_string(path).map_err(|err| {
        SymError::Serde(
            ErrorInfo::new("json-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}
