/// Caching modules for avoiding repeated engine calls
pub mod analysis;

pub use analysis::{content_hash, AnalysisCache, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
