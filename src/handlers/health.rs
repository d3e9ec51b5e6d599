use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::verify_connection;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
}

/// Liveness plus a `SELECT 1` against the store; 503 when it is unreachable.
pub async fn health_check(db_pool: web::Data<SqlitePool>) -> HttpResponse {
    let version = env!("CARGO_PKG_VERSION").to_string();

    match verify_connection(db_pool.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "ok".to_string(),
            version,
            storage: "reachable".to_string(),
        }),
        Err(_) => HttpResponse::ServiceUnavailable().json(HealthResponse {
            status: "unavailable".to_string(),
            version,
            storage: "unreachable".to_string(),
        }),
    }
}
