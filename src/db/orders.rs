use sea_orm::*;

use super::search_condition;
use crate::models::clients;
use crate::models::orders::{
    self, OrderResponse, OrderStatus, OrderWrite, ProductImages, next_order_number, total_price,
};

/// Insert a new order, deriving its total from quantity and unit price.
pub async fn insert_order(
    db: &DatabaseConnection,
    input: OrderWrite,
) -> Result<orders::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_order = orders::ActiveModel {
        order_number: Set(input.order_number),
        client_id: Set(input.client_id),
        client_name: Set(input.client_name),
        product: Set(input.product),
        quantity: Set(input.quantity),
        unit_price: Set(input.unit_price),
        total_price: Set(total_price(input.quantity, input.unit_price)),
        status: Set(input.status),
        order_date: Set(input.order_date),
        product_images: Set(ProductImages(input.product_images)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_order.insert(db).await
}

/// Fetch orders with their linked client, newest first.
pub async fn get_all_orders(
    db: &DatabaseConnection,
    search: Option<&str>,
    status: Option<OrderStatus>,
) -> Result<Vec<OrderResponse>, DbErr> {
    let mut query = orders::Entity::find();

    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(search_condition(
            &[
                orders::Column::OrderNumber,
                orders::Column::ClientName,
                orders::Column::Product,
            ],
            term,
        ));
    }
    if let Some(status) = status {
        query = query.filter(orders::Column::Status.eq(status));
    }

    let rows = query
        .find_also_related(clients::Entity)
        .order_by_desc(orders::Column::CreatedAt)
        .order_by_desc(orders::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(order, client)| OrderResponse::from_parts(order, client))
        .collect())
}

/// Fetch a single order row by ID.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<orders::Model>, DbErr> {
    orders::Entity::find_by_id(id).one(db).await
}

/// Fetch a single order by ID with its linked client.
pub async fn get_order_response(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<OrderResponse>, DbErr> {
    let row = orders::Entity::find_by_id(id)
        .find_also_related(clients::Entity)
        .one(db)
        .await?;
    Ok(row.map(|(order, client)| OrderResponse::from_parts(order, client)))
}

/// The order number the next created order would receive.
pub async fn get_next_order_number(db: &DatabaseConnection) -> Result<String, DbErr> {
    let numbers: Vec<String> = orders::Entity::find()
        .select_only()
        .column(orders::Column::OrderNumber)
        .into_tuple()
        .all(db)
        .await?;
    Ok(next_order_number(numbers.iter().map(String::as_str)))
}

/// Write `input` over an existing order. The total is recomputed.
pub async fn replace_order(
    db: &DatabaseConnection,
    existing: orders::Model,
    input: OrderWrite,
) -> Result<orders::Model, DbErr> {
    let mut active: orders::ActiveModel = existing.into();
    active.order_number = Set(input.order_number);
    active.client_id = Set(input.client_id);
    active.client_name = Set(input.client_name);
    active.product = Set(input.product);
    active.quantity = Set(input.quantity);
    active.unit_price = Set(input.unit_price);
    active.total_price = Set(total_price(input.quantity, input.unit_price));
    active.status = Set(input.status);
    active.order_date = Set(input.order_date);
    active.product_images = Set(ProductImages(input.product_images));
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete an order by ID and return the deleted row.
pub async fn delete_order(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<orders::Model>, DbErr> {
    let Some(order) = orders::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    order.clone().delete(db).await?;
    Ok(Some(order))
}
