use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub qty: i32,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub order_id: Option<String>,
    #[validate(length(min = 1, message = "order must contain at least one item"))]
    pub items: Vec<OrderItem>,
    pub status: Option<String>,
    pub added_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub is_active: Option<bool>,
}

impl Order {
    pub fn from_input(input: OrderInput) -> Self {
        let now = Utc::now();
        let total = input
            .items
            .iter()
            .map(|item| item.price * f64::from(item.qty))
            .sum();
        Self {
            id: Uuid::new_v4(),
            order_id: input.order_id,
            items: input.items,
            status: input.status,
            total,
            added_by: input.added_by,
            updated_by: input.updated_by,
            is_active: input.is_active.unwrap_or(true),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
