/// Sanitization of untrusted engine output and manifest classification

pub mod dependencies;
pub mod findings;
pub mod manifest;
pub mod patch;

pub use dependencies::{sanitize_dependency_findings, DependencyFinding, DependencyReport};
pub use findings::{sanitize_findings, Finding, MAX_FINDINGS};
pub use manifest::{classify_manifest, ManifestKind};
pub use patch::{normalize_patch, ChangeUnit, FixPatch};
