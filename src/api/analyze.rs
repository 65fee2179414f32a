use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::analysis::Finding;
use crate::api::AppState;
use crate::error::ServiceError;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub errors: Vec<Finding>,
}

pub fn configure_analyze_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/analyze", web::post().to(analyze_code));
}

pub async fn analyze_code(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ServiceError> {
    let errors = state
        .service
        .analyze(&req.code, req.api_key.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(AnalyzeResponse { errors }))
}
