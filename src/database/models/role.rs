use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role catalog entry. The catalog is small, fixed, and seeded externally.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub role_id: i64,
    pub role_name: String,
}

/// Name of the role that gates destructive operations.
pub const ADMIN_ROLE: &str = "Admin";
