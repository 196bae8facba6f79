use chrono::NaiveDate;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::clients;
use super::clients::non_blank;
use super::images::validate_images;
use crate::error::ApiError;

/// Order status, stored and serialized with the French labels shown in the UI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum OrderStatus {
    #[sea_orm(string_value = "En attente")]
    #[serde(rename = "En attente")]
    Pending,
    #[default]
    #[sea_orm(string_value = "En cours")]
    #[serde(rename = "En cours")]
    InProgress,
    #[sea_orm(string_value = "Livré")]
    #[serde(rename = "Livré")]
    Delivered,
}

/// Product images as `data:` URIs, persisted as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ProductImages(pub Vec<String>);

/// SeaORM entity for the `orders` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_number: String,
    pub client_id: Option<i32>,
    /// Name of the client when the order was last written.
    pub client_name: String,
    pub product: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Double")]
    pub unit_price: f64,
    #[sea_orm(column_type = "Double")]
    pub total_price: f64,
    pub status: OrderStatus,
    pub order_date: Date,
    #[sea_orm(column_type = "Json")]
    pub product_images: ProductImages,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Client,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// The total is always derived, never taken from the request.
pub fn total_price(quantity: i32, unit_price: f64) -> f64 {
    f64::from(quantity) * unit_price
}

/// Extract the numeric suffix of a `CMD-###` order number. Suffixes too
/// large for a `u64` saturate at `u64::MAX`.
pub fn parse_order_number(order_number: &str) -> Option<u64> {
    let (_, rest) = order_number.split_once("CMD-")?;
    let value = rest
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(None, |acc: Option<u64>, digit| {
            Some(acc.unwrap_or(0).saturating_mul(10).saturating_add(u64::from(digit)))
        })?;
    (value > 0).then_some(value)
}

/// The number following the highest `CMD-###` among `existing`.
pub fn next_order_number<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let next = existing
        .into_iter()
        .filter_map(parse_order_number)
        .max()
        .map_or(1, |highest| highest.saturating_add(1));
    format!("CMD-{next:03}")
}

/// Accepts `YYYY-MM-DD` or a timestamp such as `2025-03-01T00:00:00.000Z`,
/// keeping its calendar date.
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.split_once('T').map_or(raw, |(day, _)| day);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

// ── DTOs ──

/// Body of order create and update requests.
///
/// A submitted `total_price` is ignored. On update, an omitted
/// `order_number`, client, status, date or `product_images` keeps the stored
/// value; on create they default to the next number, "En cours", today and no
/// images.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderInput {
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub client_id: Option<i32>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub product: String,
    pub quantity: i32,
    pub unit_price: f64,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub product_images: Option<Vec<String>>,
}

/// An [`OrderInput`] whose fields passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub order_number: Option<String>,
    pub client_id: Option<i32>,
    pub client_name: Option<String>,
    pub product: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub status: Option<OrderStatus>,
    pub order_date: Option<NaiveDate>,
    pub product_images: Option<Vec<String>>,
}

impl OrderInput {
    pub fn validate(self) -> Result<ValidatedOrder, ApiError> {
        let product = self.product.trim().to_string();
        if product.is_empty() {
            return Err(ApiError::BadRequest("Le produit est requis".to_string()));
        }
        if self.quantity < 1 {
            return Err(ApiError::BadRequest(
                "La quantité doit être supérieure à zéro".to_string(),
            ));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(ApiError::BadRequest(
                "Le prix unitaire doit être un nombre positif".to_string(),
            ));
        }
        if !total_price(self.quantity, self.unit_price).is_finite() {
            return Err(ApiError::BadRequest(
                "Le montant total de la commande est trop élevé".to_string(),
            ));
        }

        let order_date = match non_blank(self.order_date) {
            Some(raw) => Some(parse_order_date(&raw).ok_or_else(|| {
                ApiError::BadRequest(format!("Date de commande invalide: {raw}"))
            })?),
            None => None,
        };

        if let Some(images) = &self.product_images {
            validate_images(images).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        }

        Ok(ValidatedOrder {
            order_number: non_blank(self.order_number),
            client_id: self.client_id,
            client_name: non_blank(self.client_name),
            product,
            quantity: self.quantity,
            unit_price: self.unit_price,
            status: self.status,
            order_date,
            product_images: self.product_images,
        })
    }
}

/// A fully resolved order row, ready to be inserted or written over an
/// existing one. `total_price` is computed when the row is written.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWrite {
    pub order_number: String,
    pub client_id: Option<i32>,
    pub client_name: String,
    pub product: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
    pub product_images: Vec<String>,
}

impl From<&Model> for OrderWrite {
    fn from(m: &Model) -> Self {
        Self {
            order_number: m.order_number.clone(),
            client_id: m.client_id,
            client_name: m.client_name.clone(),
            product: m.product.clone(),
            quantity: m.quantity,
            unit_price: m.unit_price,
            status: m.status,
            order_date: m.order_date,
            product_images: m.product_images.0.clone(),
        }
    }
}

/// An order as returned by the API, with the client's current name joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub order_number: String,
    pub client_id: Option<i32>,
    pub client_name: String,
    pub product: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
    pub product_images: Vec<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl OrderResponse {
    /// The linked client's name wins over the stored snapshot, so renaming a
    /// client shows up on its orders.
    pub fn from_parts(order: Model, client: Option<clients::Model>) -> Self {
        let client_name = client.map_or(order.client_name, |c| c.name);
        Self {
            id: order.id,
            order_number: order.order_number,
            client_id: order.client_id,
            client_name,
            product: order.product,
            quantity: order.quantity,
            unit_price: order.unit_price,
            total_price: order.total_price,
            status: order.status,
            order_date: order.order_date,
            product_images: order.product_images.0,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderListQuery {
    pub id: Option<i32>,
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> OrderInput {
        OrderInput {
            client_name: Some("Acme".into()),
            product: "Sac en cuir".into(),
            quantity: 3,
            unit_price: 1500.0,
            ..Default::default()
        }
    }

    #[test]
    fn total_is_quantity_times_unit_price() {
        assert_eq!(total_price(3, 1500.0), 4500.0);
        assert_eq!(total_price(1, 0.0), 0.0);
        assert_eq!(total_price(4, 12.5), 50.0);
    }

    #[test]
    fn next_order_number_scans_for_highest_suffix() {
        assert_eq!(next_order_number(Vec::<&str>::new()), "CMD-001");
        assert_eq!(next_order_number(["CMD-007", "CMD-012", "CMD-003"]), "CMD-013");
        assert_eq!(next_order_number(["CMD-999"]), "CMD-1000");
    }

    #[test]
    fn oversized_order_numbers_saturate_instead_of_restarting() {
        assert_eq!(parse_order_number("CMD-99999999999"), Some(99_999_999_999));
        assert_eq!(
            next_order_number(["CMD-002", "CMD-99999999999"]),
            "CMD-100000000000"
        );
        let huge = format!("CMD-{}", "9".repeat(30));
        assert_eq!(parse_order_number(&huge), Some(u64::MAX));
        assert_eq!(next_order_number([huge.as_str()]), format!("CMD-{}", u64::MAX));
    }

    #[test]
    fn next_order_number_ignores_unparsable_numbers() {
        assert_eq!(next_order_number(["", "commande", "CMD-", "CMD-000"]), "CMD-001");
        assert_eq!(next_order_number(["old CMD-041 copy", "X-99"]), "CMD-042");
    }

    #[test]
    fn order_dates_accept_plain_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_order_date("2025-03-01"), expected);
        assert_eq!(parse_order_date("2025-03-01T00:00:00.000Z"), expected);
        assert_eq!(parse_order_date(" 2025-03-01T13:45:00+03:00 "), expected);
        assert_eq!(parse_order_date("01/03/2025"), None);
    }

    #[test]
    fn status_labels_are_french() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivered).unwrap(),
            "\"Livré\""
        );
        let status: OrderStatus = serde_json::from_str("\"En attente\"").unwrap();
        assert_eq!(status, OrderStatus::Pending);
        assert_eq!(OrderStatus::default(), OrderStatus::InProgress);
    }

    #[test]
    fn validate_trims_and_keeps_omitted_fields_unset() {
        let order = input().validate().unwrap();
        assert_eq!(order.client_name.as_deref(), Some("Acme"));
        assert_eq!(order.order_number, None);
        assert_eq!(order.status, None);
        assert_eq!(order.product_images, None);
    }

    #[test]
    fn validate_rejects_bad_quantities_and_prices() {
        let zero = OrderInput {
            quantity: 0,
            ..input()
        };
        assert!(matches!(zero.validate(), Err(ApiError::BadRequest(_))));

        let negative = OrderInput {
            unit_price: -1.0,
            ..input()
        };
        assert!(matches!(negative.validate(), Err(ApiError::BadRequest(_))));

        let nan = OrderInput {
            unit_price: f64::NAN,
            ..input()
        };
        assert!(matches!(nan.validate(), Err(ApiError::BadRequest(_))));

        let overflowing = OrderInput {
            quantity: 10,
            unit_price: 1e308,
            ..input()
        };
        assert!(matches!(overflowing.validate(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn validate_rejects_bad_dates_and_images() {
        let bad_date = OrderInput {
            order_date: Some("demain".into()),
            ..input()
        };
        assert!(matches!(bad_date.validate(), Err(ApiError::BadRequest(_))));

        let too_many = OrderInput {
            product_images: Some(vec!["data:image/png;base64,AAAA".into(); 6]),
            ..input()
        };
        match too_many.validate() {
            Err(ApiError::BadRequest(msg)) => assert!(msg.contains("5 images")),
            other => panic!("expected a bad request, got {other:?}"),
        }
    }
}
