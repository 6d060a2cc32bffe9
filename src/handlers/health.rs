// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Readiness probe that also round-trips the place store

use crate::db::PlaceStore;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /health
/// 200 when the store answers, 503 otherwise. Never guarded.
pub async fn health_check(store: web::Data<dyn PlaceStore>) -> impl Responder {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "service": "libon-places",
            "database": "up",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "service": "libon-places",
                "database": "down",
                "version": env!("CARGO_PKG_VERSION")
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
