use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::analysis::{
    classify_manifest, normalize_patch, sanitize_dependency_findings, sanitize_findings,
    DependencyReport, Finding, FixPatch, ManifestKind,
};
use crate::cache::{content_hash, AnalysisCache};
use crate::error::ServiceError;
use crate::providers::ReasoningEngine;

const ANALYZE_SYSTEM_PROMPT: &str = "\
ACT AS A SENIOR SECURITY ENGINEER.
Your task is to analyze the provided code for security vulnerabilities (SQL Injection, XSS, Hardcoded Secrets, etc.).

OUTPUT RULES:
1. Return ONLY a JSON object.
2. The object must contain a key \"errors\" which is an array of objects.
3. Each error object must have: \"line\" (number), \"message\" (string), and \"recommendation\" (string).
4. Optionally include \"severity\", \"category\", \"score\", and \"cwe\" per error.
5. Report at most 10 issues.

FORMAT EXAMPLE:
{
  \"errors\": [
    {\"line\": 5, \"message\": \"Hardcoded API Key\", \"recommendation\": \"Load the key from the environment instead.\"}
  ]
}";

const FIX_SYSTEM_PROMPT: &str = "\
ACT AS A SENIOR SECURITY ENGINEER producing a surgical fix.
You will receive a vulnerability description and the affected code.

OUTPUT RULES:
1. Return ONLY a JSON object of the form {\"changes\": [{\"search\": \"...\", \"replace\": \"...\"}]}.
2. Every \"search\" string must be copied verbatim from the provided code.
3. Keep each change minimal; do not rewrite unrelated code.";

fn dependency_system_prompt(kind: ManifestKind) -> String {
    format!(
        "ACT AS A DEPENDENCY SECURITY AUDITOR.\n\
         The user will provide a {} ({}).\n\n\
         OUTPUT RULES:\n\
         1. Return ONLY a JSON object with a key \"vulnerabilities\" holding an array of objects.\n\
         2. Each object must have: \"package\", \"version\", \"severity\", \"message\".\n\
         3. Optionally include \"cve\" and \"recommendation\".\n\
         4. Report only dependencies with known vulnerability classes; do not speculate.",
        kind.family(),
        kind.file_name()
    )
}

/// Composes hashing, caching, engine dispatch, and sanitization per request.
///
/// Each request resolves independently; the cache is the only shared state.
/// Concurrent misses on the same content are not coalesced: both callers
/// invoke the engine and the last write wins, which is an accepted
/// inefficiency rather than a correctness bug.
pub struct AnalysisService {
    engine: Arc<dyn ReasoningEngine>,
    cache: AnalysisCache,
}

impl AnalysisService {
    pub fn new(engine: Arc<dyn ReasoningEngine>, cache_ttl_secs: i64) -> Self {
        Self::with_cache(engine, AnalysisCache::new(cache_ttl_secs))
    }

    pub fn with_cache(engine: Arc<dyn ReasoningEngine>, cache: AnalysisCache) -> Self {
        Self { engine, cache }
    }

    /// Analyze a code submission, serving repeated content from the cache.
    ///
    /// Empty or whitespace-only code short-circuits to an empty finding set
    /// without touching the engine or the cache.
    pub async fn analyze(
        &self,
        code: &str,
        credential: Option<&str>,
    ) -> Result<Vec<Finding>, ServiceError> {
        if code.trim().is_empty() {
            return Ok(Vec::new());
        }

        let hash = content_hash(code);
        let now = Utc::now().timestamp();

        if let Some(cached) = self.cache.get(&hash, now) {
            tracing::debug!(%hash, "analysis cache hit");
            return Ok(cached);
        }

        tracing::info!(%hash, "dispatching analysis request");
        let raw = self
            .engine
            .complete(
                ANALYZE_SYSTEM_PROMPT,
                &format!("Analyze this code:\n\n{code}"),
                credential,
            )
            .await?;

        let payload = parse_engine_json(&raw)?;
        let total_lines = code.lines().count();
        let findings = sanitize_findings(&payload, total_lines);
        tracing::info!(count = findings.len(), "analysis complete");

        self.cache.put(hash, findings.clone(), now);
        Ok(findings)
    }

    /// Request a surgical fix for one described vulnerability.
    pub async fn fix(
        &self,
        original_code: &str,
        description: &str,
        line: Option<u32>,
        credential: Option<&str>,
    ) -> Result<FixPatch, ServiceError> {
        if original_code.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "original_code must not be empty".to_string(),
            ));
        }
        if description.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "vulnerability_description must not be empty".to_string(),
            ));
        }

        let total_lines = original_code.lines().count() as u32;
        if let Some(line) = line {
            if line < 1 || line > total_lines {
                return Err(ServiceError::InvalidRequest(format!(
                    "vulnerability_line {line} is outside 1..={total_lines}"
                )));
            }
        }

        let mut user_prompt = format!("Vulnerability: {description}\n");
        if let Some(line) = line {
            user_prompt.push_str(&format!("It is located on line {line}.\n"));
        }
        user_prompt.push_str(&format!("\nCode:\n\n{original_code}"));

        let raw = self
            .engine
            .complete(FIX_SYSTEM_PROMPT, &user_prompt, credential)
            .await?;

        let patch = normalize_patch(&raw).retain_applicable(original_code);
        tracing::info!(changes = patch.changes.len(), "fix normalized");
        Ok(patch)
    }

    /// Scan a blob for vulnerable dependencies if it looks like a manifest.
    ///
    /// A classification miss is not an error: the report comes back empty
    /// and the engine is never consulted.
    pub async fn scan_dependencies(
        &self,
        code: &str,
        credential: Option<&str>,
    ) -> Result<DependencyReport, ServiceError> {
        let Some(kind) = classify_manifest(code) else {
            tracing::debug!("no dependency manifest family recognized");
            return Ok(DependencyReport::default());
        };

        tracing::info!(manifest = %kind, "dispatching dependency scan");
        let raw = self
            .engine
            .complete(
                &dependency_system_prompt(kind),
                &format!("Audit this {} for vulnerable dependencies:\n\n{code}", kind),
                credential,
            )
            .await?;

        let payload = parse_engine_json(&raw)?;
        let vulnerabilities = sanitize_dependency_findings(&payload);
        tracing::info!(count = vulnerabilities.len(), "dependency scan complete");

        Ok(DependencyReport {
            vulnerabilities,
            scanned_files: vec![kind.file_name().to_string()],
        })
    }
}

/// Untrusted text to structured data; an unparseable payload is an upstream
/// failure, never partially trusted
fn parse_engine_json(raw: &str) -> Result<Value, ServiceError> {
    serde_json::from_str(raw).map_err(|err| {
        tracing::error!(error = %err, "engine returned an unparseable payload");
        ServiceError::UpstreamMalformed
    })
}
