use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Cap on findings surfaced per analysis; everything past this is dropped
pub const MAX_FINDINGS: usize = 10;

/// One reported security issue with a line reference and remediation text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub line: u32,
    pub message: String,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwe: Option<String>,
}

/// Enforce the output contract on untrusted engine data.
///
/// Accepts either the expected `{"errors": [...]}` envelope or a bare array.
/// Per entry: malformed items are skipped without aborting the batch, line
/// numbers must fall inside `[1, total_lines]`, duplicate `(line, message)`
/// pairs keep the first occurrence, and at most [`MAX_FINDINGS`] survive in
/// first-seen order. Rejections are a data-quality filter, not an error.
pub fn sanitize_findings(raw: &Value, total_lines: usize) -> Vec<Finding> {
    let items = match raw.get("errors").and_then(Value::as_array) {
        Some(array) => array.as_slice(),
        None => match raw.as_array() {
            Some(array) => array.as_slice(),
            None => return Vec::new(),
        },
    };

    let mut seen: HashSet<(u32, String)> = HashSet::new();
    let mut retained = Vec::new();

    for item in items {
        if retained.len() >= MAX_FINDINGS {
            break;
        }

        let Some(finding) = extract_finding(item, total_lines) else {
            continue;
        };

        if !seen.insert((finding.line, finding.message.clone())) {
            continue;
        }

        retained.push(finding);
    }

    retained
}

/// Tolerant per-field extraction; any required field missing or mistyped
/// rejects the entry
fn extract_finding(item: &Value, total_lines: usize) -> Option<Finding> {
    let line = item.get("line")?.as_u64()?;
    if line < 1 || line > total_lines as u64 {
        return None;
    }

    let message = item.get("message")?.as_str()?.to_string();

    // The remediation key drifted across engine prompt revisions
    let recommendation = item
        .get("recommendation")
        .or_else(|| item.get("fix"))?
        .as_str()?
        .to_string();

    Some(Finding {
        line: line as u32,
        message,
        recommendation,
        severity: string_field(item, "severity"),
        category: string_field(item, "category"),
        score: item.get("score").and_then(Value::as_f64),
        cwe: string_field(item, "cwe"),
    })
}

fn string_field(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(str::to_string)
}
