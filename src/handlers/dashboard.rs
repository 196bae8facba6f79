use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedAdmin;
use crate::db::clients as client_db;
use crate::db::orders as order_db;
use crate::error::ApiError;
use crate::models::dashboard::DashboardSummary;

/// GET /api/dashboard — revenue, profit, counts and the latest orders,
/// recomputed from every order on each request.
pub async fn get_dashboard(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    const FAILED: &str = "Erreur lors du chargement des données";
    let db = db.get_ref();

    let (clients_count, orders) = tokio::try_join!(
        client_db::count_clients(db),
        order_db::get_all_orders(db, None, None),
    )
    .map_err(|e| ApiError::database(FAILED, e))?;

    let clients_count = usize::try_from(clients_count).unwrap_or(usize::MAX);
    Ok(HttpResponse::Ok().json(DashboardSummary::compute(clients_count, orders)))
}
