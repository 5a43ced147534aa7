use axum::{extract::Path, response::Json};
use serde_json::{json, Value};

use crate::auth::{ensure_admin_exists, ensure_user_has_role, EntropyPicker};
use crate::database::manager::Database;
use crate::database::models::role::Role;
use crate::database::roles::{PgRoleStore, RoleStore};
use crate::error::ApiError;

/// GET /roles - the role catalog. Re-checks the admin invariant first.
pub async fn list() -> Result<Json<Vec<Role>>, ApiError> {
    let pool = Database::pool().await?;
    let store = PgRoleStore::new(pool);

    ensure_admin_exists(&store, &EntropyPicker).await?;

    let catalog = store.role_catalog().await?;
    Ok(Json(catalog))
}

/// GET /users/:id/roles - roles for one user, lazily assigning one when
/// the user has none. Re-checks the admin invariant first.
pub async fn user_roles(Path(user_id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let store = PgRoleStore::new(pool);

    ensure_admin_exists(&store, &EntropyPicker).await?;

    if !store.user_exists(user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    let roles = ensure_user_has_role(&store, &EntropyPicker, user_id).await?;
    Ok(Json(json!({ "userId": user_id, "roles": roles })))
}
