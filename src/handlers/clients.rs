use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr};

use crate::auth::middleware::AuthenticatedAdmin;
use crate::db::clients as client_db;
use crate::db::is_unique_violation;
use crate::error::ApiError;
use crate::models::IdQuery;
use crate::models::clients::{self, ClientInput, ClientListQuery};

fn not_found() -> ApiError {
    ApiError::NotFound("Client non trouvé".to_string())
}

/// Build the conflict raised when `email` already belongs to another client,
/// naming that client when the lookup succeeds.
async fn email_conflict(db: &DatabaseConnection, email: Option<&str>) -> ApiError {
    let owner = match email {
        Some(email) => match client_db::get_client_by_email(db, email).await {
            Ok(owner) => owner.map(|c| c.name),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to look up the owner of a duplicate email");
                None
            }
        },
        None => None,
    };
    let owner = owner.unwrap_or_else(|| "inconnu".to_string());

    tracing::warn!(owner = %owner, "Duplicate client email");
    ApiError::Conflict(format!(
        "Un client nommé \"{owner}\" utilise déjà cet email. \
         Veuillez utiliser un email différent ou modifier le client existant."
    ))
}

async fn write_error(
    db: &DatabaseConnection,
    err: DbErr,
    email: Option<&str>,
    message: &str,
) -> ApiError {
    if is_unique_violation(&err) {
        email_conflict(db, email).await
    } else {
        ApiError::database(message, err)
    }
}

async fn fetch_client(db: &DatabaseConnection, id: i32) -> Result<clients::Model, ApiError> {
    client_db::get_client_by_id(db, id)
        .await
        .map_err(|e| ApiError::database("Erreur lors de la récupération du client", e))?
        .ok_or_else(not_found)
}

/// GET /api/clients — list clients newest first, or one client with `?id=`.
/// `?search=` filters on name, email, phone and city.
pub async fn get_clients(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ClientListQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    if let Some(id) = query.id {
        let client = fetch_client(db.get_ref(), id).await?;
        return Ok(HttpResponse::Ok().json(client));
    }

    let clients = client_db::get_all_clients(db.get_ref(), query.search.as_deref())
        .await
        .map_err(|e| ApiError::database("Erreur lors de la récupération des clients", e))?;
    Ok(HttpResponse::Ok().json(clients))
}

/// GET /api/clients/{id}
pub async fn get_client(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let client = fetch_client(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

/// POST /api/clients — create a client. A duplicate email is rejected with a
/// message naming the client already using it.
pub async fn create_client(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    body: web::Json<ClientInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().normalize()?;
    let email = input.email.clone();

    match client_db::insert_client(db.get_ref(), input).await {
        Ok(client) => {
            tracing::info!(client_id = client.id, "Client created");
            Ok(HttpResponse::Created().json(client))
        }
        Err(e) => Err(write_error(
            db.get_ref(),
            e,
            email.as_deref(),
            "Erreur lors de la création du client",
        )
        .await),
    }
}

async fn apply_update(
    db: &DatabaseConnection,
    id: i32,
    input: ClientInput,
) -> Result<HttpResponse, ApiError> {
    let input = input.normalize()?;
    let email = input.email.clone();

    match client_db::update_client(db, id, input).await {
        Ok(Some(client)) => {
            tracing::info!(client_id = id, "Client updated");
            Ok(HttpResponse::Ok().json(client))
        }
        Ok(None) => Err(not_found()),
        Err(e) => Err(write_error(
            db,
            e,
            email.as_deref(),
            "Erreur lors de la mise à jour du client",
        )
        .await),
    }
}

/// PUT /api/clients/{id} — replace a client's fields.
pub async fn update_client(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<ClientInput>,
) -> Result<HttpResponse, ApiError> {
    apply_update(db.get_ref(), path.into_inner(), body.into_inner()).await
}

/// PUT /api/clients?id= — same as `PUT /api/clients/{id}`.
pub async fn update_client_by_query(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    query: web::Query<IdQuery>,
    body: web::Json<ClientInput>,
) -> Result<HttpResponse, ApiError> {
    apply_update(db.get_ref(), query.require()?, body.into_inner()).await
}

async fn apply_delete(db: &DatabaseConnection, id: i32) -> Result<HttpResponse, ApiError> {
    let deleted = client_db::delete_client(db, id)
        .await
        .map_err(|e| ApiError::database("Erreur lors de la suppression du client", e))?
        .ok_or_else(not_found)?;

    tracing::info!(client_id = id, "Client deleted");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Client supprimé avec succès",
        "deletedClient": deleted,
    })))
}

/// DELETE /api/clients/{id}
pub async fn delete_client(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    apply_delete(db.get_ref(), path.into_inner()).await
}

/// DELETE /api/clients?id=
pub async fn delete_client_by_query(
    _admin: AuthenticatedAdmin,
    db: web::Data<DatabaseConnection>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, ApiError> {
    apply_delete(db.get_ref(), query.require()?).await
}
