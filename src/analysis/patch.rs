use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A minimal literal search/replace patch unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeUnit {
    pub search: String,
    pub replace: String,
}

/// Ordered list of change units for one requested fix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixPatch {
    pub changes: Vec<ChangeUnit>,
}

impl FixPatch {
    /// Defensive filter: drop units whose `search` is not a literal
    /// substring of the original submission. The engine promises the match
    /// but nothing upstream verifies it.
    pub fn retain_applicable(mut self, original: &str) -> Self {
        self.changes
            .retain(|unit| !unit.search.is_empty() && original.contains(&unit.search));
        self
    }
}

/// The two response shapes the engine is known to produce
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPatch {
    ChangeList { changes: Vec<Value> },
    Bare(ChangeUnit),
}

/// Reduce an untrusted fix response to the one accepted contract.
///
/// Best-effort normalization, fail soft: a `{"changes": [...]}` list passes
/// through (malformed elements skipped), a bare `{"search", "replace"}` pair
/// is lifted into a one-element list, and anything else yields an empty
/// change list rather than an error.
pub fn normalize_patch(raw: &str) -> FixPatch {
    let body = strip_code_fences(raw);

    let Ok(parsed) = serde_json::from_str::<RawPatch>(body) else {
        return FixPatch::default();
    };

    match parsed {
        RawPatch::ChangeList { changes } => FixPatch {
            changes: changes
                .into_iter()
                .filter_map(|value| serde_json::from_value::<ChangeUnit>(value).ok())
                .collect(),
        },
        RawPatch::Bare(unit) => FixPatch {
            changes: vec![unit],
        },
    }
}

/// Remove incidental markdown fencing before structural parsing
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "diff", ...) on the opening fence line
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let body = &rest[newline + 1..];

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
