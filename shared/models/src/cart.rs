use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub qty: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Uuid,
    #[serde(default)]
    pub items: Vec<CartItem>,
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
pub struct CartInput {
    #[validate(length(min = 1, message = "cart must contain at least one item"))]
    pub items: Vec<CartItem>,
    pub added_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub is_active: Option<bool>,
}

impl Cart {
    pub fn from_input(input: CartInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            items: input.items,
            added_by: input.added_by,
            updated_by: input.updated_by,
            is_active: input.is_active.unwrap_or(true),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
