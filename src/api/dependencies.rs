use actix_web::{web, HttpResponse};

use crate::api::analyze::AnalyzeRequest;
use crate::api::AppState;
use crate::error::ServiceError;

pub fn configure_dependency_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/scan-dependencies", web::post().to(scan_dependencies));
}

/// Same request shape as `/analyze`; the body is treated as a candidate
/// dependency manifest rather than source code
pub async fn scan_dependencies(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ServiceError> {
    let report = state
        .service
        .scan_dependencies(&req.code, req.api_key.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(report))
}
