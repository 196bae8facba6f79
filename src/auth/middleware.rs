use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::auth::session::{Session, SessionStore, login_is_fresh};
use crate::config::AppConfig;
use crate::error::ApiError;

/// Extractor guarding the admin routes: requires `Authorization: Bearer <token>`
/// carrying a valid, fresh token whose session is still open.
pub struct AuthenticatedAdmin(pub Session);

impl FromRequest for AuthenticatedAdmin {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| ApiError::Unauthorized("Authentification requise".to_string()))?;

            // 2. Get config and session registry from app data.
            let config = req.app_data::<web::Data<AppConfig>>().ok_or_else(|| {
                ApiError::Internal("Configuration du serveur manquante".to_string())
            })?;
            let sessions = req.app_data::<web::Data<SessionStore>>().ok_or_else(|| {
                ApiError::Internal("Configuration du serveur manquante".to_string())
            })?;

            // 3. Validate signature and expiry.
            let claims = jwt::validate_token(token, &config.auth.session_secret).map_err(|e| {
                tracing::debug!("Rejected session token: {e}");
                ApiError::Unauthorized("Session invalide".to_string())
            })?;

            // 4. The login must be younger than the maximum session age.
            if !login_is_fresh(claims.issued_at(), chrono::Utc::now(), sessions.max_age()) {
                return Err(ApiError::Unauthorized("Session expirée".to_string()));
            }

            // 5. The session must still be open (not logged out, not idle).
            match sessions.touch(claims.jti).await {
                Some(session) if session.username == claims.sub => Ok(AuthenticatedAdmin(session)),
                _ => Err(ApiError::Unauthorized("Session expirée".to_string())),
            }
        })
    }
}
