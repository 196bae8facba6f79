use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;

/// Errors returned by the API. Every variant renders as `{"error": "<message>"}`
/// and the message is shown to the user as-is, so it is written in French.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    /// Duplicate data, such as an email already used by another client.
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Log a database failure and hide its details behind `message`.
    pub fn database(message: &str, err: DbErr) -> Self {
        tracing::error!(error = %err, "{message}");
        ApiError::Internal(message.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // The admin UI only distinguishes 400 for duplicates.
            ApiError::Conflict(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

/// Malformed or oversized JSON bodies are reported as server errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, "Rejected JSON body");
    let message = match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Le corps de la requête est trop volumineux"
        }
        _ => "Corps de requête JSON invalide",
    };
    ApiError::Internal(message.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, "Rejected query string");
    ApiError::BadRequest("Paramètres de requête invalides".to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_bad_request() {
        let err = ApiError::Conflict("Un client avec cet email existe déjà".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Un client avec cet email existe déjà");
    }

    #[test]
    fn database_errors_hide_details() {
        let err = ApiError::database(
            "Erreur lors de la récupération des clients",
            DbErr::Custom("connection refused".into()),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Erreur lors de la récupération des clients");
    }
}
