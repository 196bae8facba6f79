use sea_orm::*;

use super::search_condition;
use crate::models::clients::{self, ClientInput};

/// Insert a new client. `input` is expected to be normalized.
pub async fn insert_client(
    db: &DatabaseConnection,
    input: ClientInput,
) -> Result<clients::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_client = clients::ActiveModel {
        name: Set(input.name),
        email: Set(input.email),
        phone: Set(input.phone),
        address: Set(input.address),
        city: Set(input.city),
        zip: Set(input.zip),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_client.insert(db).await
}

/// Fetch clients, newest first, optionally filtered by name, email, phone or city.
pub async fn get_all_clients(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<clients::Model>, DbErr> {
    let mut query = clients::Entity::find();

    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(search_condition(
            &[
                clients::Column::Name,
                clients::Column::Email,
                clients::Column::Phone,
                clients::Column::City,
            ],
            term,
        ));
    }

    query
        .order_by_desc(clients::Column::CreatedAt)
        .order_by_desc(clients::Column::Id)
        .all(db)
        .await
}

/// Fetch a single client by ID.
pub async fn get_client_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<clients::Model>, DbErr> {
    clients::Entity::find_by_id(id).one(db).await
}

/// Fetch the client owning `email`, if any.
pub async fn get_client_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<clients::Model>, DbErr> {
    clients::Entity::find()
        .filter(clients::Column::Email.eq(email))
        .one(db)
        .await
}

/// Fetch every client whose name is exactly `name`.
pub async fn get_clients_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Vec<clients::Model>, DbErr> {
    clients::Entity::find()
        .filter(clients::Column::Name.eq(name))
        .all(db)
        .await
}

pub async fn count_clients(db: &DatabaseConnection) -> Result<u64, DbErr> {
    clients::Entity::find().count(db).await
}

/// Replace every editable field of a client. Returns `None` when no client has `id`.
pub async fn update_client(
    db: &DatabaseConnection,
    id: i32,
    input: ClientInput,
) -> Result<Option<clients::Model>, DbErr> {
    let Some(client) = clients::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: clients::ActiveModel = client.into();
    active.name = Set(input.name);
    active.email = Set(input.email);
    active.phone = Set(input.phone);
    active.address = Set(input.address);
    active.city = Set(input.city);
    active.zip = Set(input.zip);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await.map(Some)
}

/// Delete a client by ID and return the deleted row.
pub async fn delete_client(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<clients::Model>, DbErr> {
    let Some(client) = clients::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    client.clone().delete(db).await?;
    Ok(Some(client))
}
