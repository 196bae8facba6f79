use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

/// GET /api/health — liveness probe, also checks the database connection.
pub async fn health(db: web::Data<DatabaseConnection>) -> impl Responder {
    match db.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })),
        Err(e) => {
            tracing::error!(error = %e, "Database ping failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unavailable",
            }))
        }
    }
}
