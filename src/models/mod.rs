pub mod clients;
pub mod dashboard;
pub mod images;
pub mod orders;

use serde::Deserialize;

/// `?id=` selector used by the PUT and DELETE query-string routes.
#[derive(Debug, Clone, Deserialize)]
pub struct IdQuery {
    pub id: Option<i32>,
}

impl IdQuery {
    pub fn require(&self) -> Result<i32, crate::error::ApiError> {
        self.id
            .ok_or_else(|| crate::error::ApiError::BadRequest("ID manquant".to_string()))
    }
}
