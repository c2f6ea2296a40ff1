//! # Health Check
//!
//! Liveness probe. Answers the same fixed payload no matter what state the rest
//! of the service is in, including a missing provider credential.

use actix_web::HttpResponse;
use serde_json::json;

/// Name reported by `/health`.
pub const SERVICE_NAME: &str = "fibra-relay";

/// `GET /health`
///
/// ```json
/// { "status": "ok", "service": "fibra-relay" }
/// ```
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}
