//! Handler for `GET /{tenant_id}/health`.

use actix_web::HttpResponse;

/// Liveness probe.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}
