//! Identity and liveness endpoints

use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct IdentityResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Service identity endpoint
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service identity", body = IdentityResponse)
    ),
    tag = "health"
)]
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(IdentityResponse {
        message: "Welcome to the claim-intel API".to_string(),
    })
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(liveness);
}
