use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};

use crate::cache::AnalysisCache;
use crate::providers::AIProvider;
use crate::service::AnalysisService;
use crate::{Config, UniversalAIClient};

pub mod analyze;
pub mod dependencies;
pub mod fix;

/// Shared application state handed to every worker
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
    pub provider: AIProvider,
    pub model: String,
}

impl AppState {
    /// Build the production state: real engine client plus a fresh cache
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let provider = config.provider;
        let model = config.model.clone();
        let cache = AnalysisCache::with_capacity(config.cache_ttl_secs, config.cache_max_entries);

        let engine = Arc::new(UniversalAIClient::new(config)?);
        let service = Arc::new(AnalysisService::with_cache(engine, cache));

        Ok(Self {
            service,
            provider,
            model,
        })
    }

    /// Wire an externally built service; used by tests to substitute engines
    pub fn with_service(
        service: Arc<AnalysisService>,
        provider: AIProvider,
        model: impl Into<String>,
    ) -> Self {
        Self {
            service,
            provider,
            model: model.into(),
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    analyze::configure_analyze_routes(cfg);
    fix::configure_fix_routes(cfg);
    dependencies::configure_dependency_routes(cfg);
    cfg.route("/health", web::get().to(health_check));
}

/// Liveness probe; no side effects
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "active",
        "engine": state.provider.to_string(),
        "model": state.model
    }))
}
