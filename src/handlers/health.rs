use actix_web::{HttpResponse, Responder};

/// GET /api/health — liveness probe.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "OK" }))
}
