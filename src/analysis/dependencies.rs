//! Dependency vulnerability reports distilled from engine output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One vulnerable dependency reported by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyFinding {
    pub package: String,
    pub version: String,
    pub severity: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Result of a dependency scan, including which manifest family was audited
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub vulnerabilities: Vec<DependencyFinding>,
    pub scanned_files: Vec<String>,
}

/// Tolerant extraction of dependency findings from untrusted engine data.
///
/// Same discipline as finding sanitization: accept the expected
/// `{"vulnerabilities": [...]}` envelope or a bare array, skip malformed
/// entries instead of aborting the batch.
pub fn sanitize_dependency_findings(raw: &Value) -> Vec<DependencyFinding> {
    let items = match raw.get("vulnerabilities").and_then(Value::as_array) {
        Some(array) => array.as_slice(),
        None => match raw.as_array() {
            Some(array) => array.as_slice(),
            None => return Vec::new(),
        },
    };

    items.iter().filter_map(extract_dependency).collect()
}

fn extract_dependency(item: &Value) -> Option<DependencyFinding> {
    Some(DependencyFinding {
        package: item.get("package")?.as_str()?.to_string(),
        version: item.get("version")?.as_str()?.to_string(),
        severity: item.get("severity")?.as_str()?.to_string(),
        message: item.get("message")?.as_str()?.to_string(),
        cve: item.get("cve").and_then(Value::as_str).map(str::to_string),
        recommendation: item
            .get("recommendation")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
