use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::AppState;
use crate::error::ServiceError;

#[derive(Debug, Deserialize)]
pub struct FixRequest {
    #[serde(default)]
    pub original_code: String,
    #[serde(default)]
    pub vulnerability_description: String,
    #[serde(default)]
    pub vulnerability_line: Option<u32>,
    #[serde(default)]
    pub api_key: Option<String>,
}

pub fn configure_fix_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/fix", web::post().to(fix_code));
}

pub async fn fix_code(
    state: web::Data<AppState>,
    req: web::Json<FixRequest>,
) -> Result<HttpResponse, ServiceError> {
    let patch = state
        .service
        .fix(
            &req.original_code,
            &req.vulnerability_description,
            req.vulnerability_line,
            req.api_key.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(patch))
}
