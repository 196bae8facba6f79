use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::credentials::verify_admin;
use crate::auth::jwt::mint_token;
use crate::auth::middleware::AuthenticatedAdmin;
use crate::auth::session::SessionStore;
use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/login — exchange the admin credential for a session token.
pub async fn login(
    config: web::Data<AppConfig>,
    sessions: web::Data<SessionStore>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if !verify_admin(&config.auth, &body.username, &body.password) {
        tracing::warn!(username = %body.username, "Rejected admin login");
        return Err(ApiError::Unauthorized("Identifiants incorrects".to_string()));
    }

    let session = sessions.open(&config.auth.admin_username).await;
    let token = mint_token(
        &session.username,
        session.id,
        session.issued_at,
        session.expires_at,
        &config.auth.session_secret,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to sign session token");
        ApiError::Internal("Erreur lors de la connexion".to_string())
    })?;

    tracing::info!(session_id = %session.id, "Admin logged in");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "token": token,
        "token_type": "Bearer",
        "username": session.username,
        "expires_at": session.expires_at,
    })))
}

/// POST /api/auth/logout — close the current session.
pub async fn logout(
    admin: AuthenticatedAdmin,
    sessions: web::Data<SessionStore>,
) -> HttpResponse {
    sessions.close(admin.0.id).await;
    tracing::info!(session_id = %admin.0.id, "Admin logged out");
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Déconnexion réussie",
    }))
}

/// GET /api/auth/session — describe the current session.
pub async fn session(admin: AuthenticatedAdmin) -> HttpResponse {
    HttpResponse::Ok().json(admin.0)
}
