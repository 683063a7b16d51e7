use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Mapping of an API route to a role that is allowed to call it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRole {
    pub id: Uuid,
    pub route_id: Uuid,
    pub role_id: Uuid,
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
pub struct RouteRoleInput {
    pub route_id: Uuid,
    pub role_id: Uuid,
    pub added_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub is_active: Option<bool>,
}

impl RouteRole {
    pub fn from_input(input: RouteRoleInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            route_id: input.route_id,
            role_id: input.role_id,
            added_by: input.added_by,
            updated_by: input.updated_by,
            is_active: input.is_active.unwrap_or(true),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
