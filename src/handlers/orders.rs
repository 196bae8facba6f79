use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedAdmin;
use crate::db::clients as client_db;
use crate::db::orders as order_db;
use crate::error::ApiError;
use crate::models::IdQuery;
use crate::models::orders::{
    self, OrderInput, OrderListQuery, OrderResponse, OrderStatus, OrderWrite, ValidatedOrder,
};

fn not_found() -> ApiError {
    ApiError::NotFound("Commande non trouvée".to_string())
}

fn client_required() -> ApiError {
    ApiError::BadRequest("Le nom du client est requis".to_string())
}

/// Resolve the client an order refers to, as `(client_id, client_name)`.
///
/// An explicit `client_id` must exist. A bare name is linked to the client
/// carrying exactly that name when there is a single one, and kept as free
/// text otherwise. Returns `None` when the order names no client.
async fn resolve_client(
    db: &DatabaseConnection,
    order: &ValidatedOrder,
) -> Result<Option<(Option<i32>, String)>, ApiError> {
    if let Some(client_id) = order.client_id {
        let client = client_db::get_client_by_id(db, client_id)
            .await
            .map_err(|e| ApiError::database("Erreur lors de la récupération du client", e))?
            .ok_or_else(|| ApiError::BadRequest("Client non trouvé".to_string()))?;
        return Ok(Some((Some(client.id), client.name)));
    }

    let Some(name) = order.client_name.clone() else {
        return Ok(None);
    };
    let matches = client_db::get_clients_by_name(db, &name)
        .await
        .map_err(|e| ApiError::database("Erreur lors de la récupération du client", e))?;
    let client_id = match matches.as_slice() {
        [client] => Some(client.id),
        _ => None,
    };
    Ok(Some((client_id, name)))
}

async fn fetch_order(db: &DatabaseConnection, id: i32) -> Result<orders::Model, ApiError> {
    order_db::get_order_by_id(db, id)
        .await
        .map_err(|e| ApiError::database("Erreur lors de la récupération de la commande", e))?
        .ok_or_else(not_found)
}

/// Load the API view of an order that was just written.
async fn respond_with(db: &DatabaseConnection, id: i32) -> Result<OrderResponse, ApiError> {
    order_db::get_order_response(db, id)
        .await
        .map_err(|e| ApiError::database("Erreur lors de la récupération de la commande", e))?
        .ok_or_else(not_found)
}

/// GET /api/orders — list orders newest first, or one order with `?id=`.
/// `?search=` matches order number, client name and product; `?status=` filters.
pub async fn get_orders(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    if let Some(id) = query.id {
        let order = respond_with(db.get_ref(), id).await?;
        return Ok(HttpResponse::Ok().json(order));
    }

    let orders = order_db::get_all_orders(db.get_ref(), query.search.as_deref(), query.status)
        .await
        .map_err(|e| ApiError::database("Erreur lors de la récupération des commandes", e))?;
    tracing::debug!(count = orders.len(), "Orders listed");
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{id}
pub async fn get_order(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let order = respond_with(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// GET /api/orders/next-number — the `CMD-###` the next order will receive.
pub async fn get_next_order_number(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let order_number = order_db::get_next_order_number(db.get_ref())
        .await
        .map_err(|e| ApiError::database("Erreur lors de la génération du numéro de commande", e))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "order_number": order_number })))
}

/// POST /api/orders — create an order. The total is computed here and the
/// order number assigned when none is given.
pub async fn create_order(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    body: web::Json<OrderInput>,
) -> Result<HttpResponse, ApiError> {
    const FAILED: &str = "Erreur lors de la création de la commande";
    let db = db.get_ref();
    let order = body.into_inner().validate()?;

    let (client_id, client_name) = resolve_client(db, &order)
        .await?
        .ok_or_else(client_required)?;
    let order_number = match order.order_number {
        Some(number) => number,
        None => order_db::get_next_order_number(db)
            .await
            .map_err(|e| ApiError::database(FAILED, e))?,
    };

    let write = OrderWrite {
        order_number,
        client_id,
        client_name,
        product: order.product,
        quantity: order.quantity,
        unit_price: order.unit_price,
        status: order.status.unwrap_or_default(),
        order_date: order
            .order_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive()),
        product_images: order.product_images.unwrap_or_default(),
    };

    let created = order_db::insert_order(db, write)
        .await
        .map_err(|e| ApiError::database(FAILED, e))?;
    tracing::info!(
        order_id = created.id,
        order_number = %created.order_number,
        images = created.product_images.0.len(),
        "Order created"
    );

    let response = respond_with(db, created.id).await?;
    Ok(HttpResponse::Created().json(response))
}

async fn apply_update(
    db: &DatabaseConnection,
    id: i32,
    input: OrderInput,
) -> Result<HttpResponse, ApiError> {
    let order = input.validate()?;
    let existing = fetch_order(db, id).await?;

    let (client_id, client_name) = resolve_client(db, &order)
        .await?
        .unwrap_or_else(|| (existing.client_id, existing.client_name.clone()));

    let write = OrderWrite {
        order_number: order
            .order_number
            .unwrap_or_else(|| existing.order_number.clone()),
        client_id,
        client_name,
        product: order.product,
        quantity: order.quantity,
        unit_price: order.unit_price,
        status: order.status.unwrap_or(existing.status),
        order_date: order.order_date.unwrap_or(existing.order_date),
        product_images: order
            .product_images
            .unwrap_or_else(|| existing.product_images.0.clone()),
    };

    order_db::replace_order(db, existing, write)
        .await
        .map_err(|e| ApiError::database("Erreur lors de la mise à jour de la commande", e))?;
    tracing::info!(order_id = id, "Order updated");

    let response = respond_with(db, id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/orders/{id} — replace an order. Any status may be set.
pub async fn update_order(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<OrderInput>,
) -> Result<HttpResponse, ApiError> {
    apply_update(db.get_ref(), path.into_inner(), body.into_inner()).await
}

/// PUT /api/orders?id=
pub async fn update_order_by_query(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    query: web::Query<IdQuery>,
    body: web::Json<OrderInput>,
) -> Result<HttpResponse, ApiError> {
    apply_update(db.get_ref(), query.require()?, body.into_inner()).await
}

/// POST /api/orders/{id}/deliver — rewrite the order unchanged except for its
/// status, forced to "Livré".
pub async fn mark_delivered(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let db = db.get_ref();
    let id = path.into_inner();
    let existing = fetch_order(db, id).await?;

    let mut write = OrderWrite::from(&existing);
    write.status = OrderStatus::Delivered;

    order_db::replace_order(db, existing, write)
        .await
        .map_err(|e| ApiError::database("Erreur lors de la mise à jour de la commande", e))?;
    tracing::info!(order_id = id, "Order marked as delivered");

    let response = respond_with(db, id).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn apply_delete(db: &DatabaseConnection, id: i32) -> Result<HttpResponse, ApiError> {
    let deleted = order_db::delete_order(db, id)
        .await
        .map_err(|e| ApiError::database("Erreur lors de la suppression de la commande", e))?
        .ok_or_else(not_found)?;

    tracing::info!(order_id = id, "Order deleted");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Commande supprimée avec succès",
        "deletedOrder": OrderResponse::from_parts(deleted, None),
    })))
}

/// DELETE /api/orders/{id}
pub async fn delete_order(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    apply_delete(db.get_ref(), path.into_inner()).await
}

/// DELETE /api/orders?id=
pub async fn delete_order_by_query(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, ApiError> {
    apply_delete(db.get_ref(), query.require()?).await
}
