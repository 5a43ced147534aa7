use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};

use crate::auth::{resolve_admin_actor, verify_caller, AuthenticatorClient, EntropyPicker};
use crate::database::manager::Database;
use crate::database::models::user::{User, UserInput};
use crate::database::roles::PgRoleStore;
use crate::database::users;
use crate::error::ApiError;

/// GET /users - all users ordered by id
pub async fn list() -> Result<Json<Vec<User>>, ApiError> {
    let pool = Database::pool().await?;
    let users = users::list_users(&pool).await?;
    Ok(Json(users))
}

/// GET /users/:id
pub async fn get_by_id(Path(user_id): Path<i64>) -> Result<Json<User>, ApiError> {
    let pool = Database::pool().await?;
    let user = users::find_user_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user))
}

/// GET /users/email/:email
pub async fn get_by_email(Path(email): Path<String>) -> Result<Json<User>, ApiError> {
    let pool = Database::pool().await?;
    let user = users::find_user_by_email(&pool, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user))
}

/// POST /users - create a user, 409 on duplicate email
pub async fn create(Json(input): Json<UserInput>) -> Result<(StatusCode, Json<User>), ApiError> {
    let pool = Database::pool().await?;
    let user = users::create_user(&pool, &input).await?.ok_or_else(|| {
        ApiError::internal_server_error("Create succeeded but no row returned")
    })?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/:id - full update
pub async fn update(
    Path(user_id): Path<i64>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, ApiError> {
    let pool = Database::pool().await?;
    let user = users::update_user(&pool, user_id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user))
}

/// DELETE /users/:id - admin-only destructive operation.
///
/// The authorization gate decides before the mutation: missing headers,
/// rejected credentials, an unresolvable caller, or a caller without the
/// Admin role each deny with their own status. A 404 afterwards means the
/// target row was already gone.
pub async fn delete(
    Path(user_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    // Credential phase first: no store resources until the caller verifies
    let verifier = AuthenticatorClient::from_config();
    let email = verify_caller(&headers, &verifier).await?;

    let pool = Database::pool().await?;
    let store = PgRoleStore::new(pool.clone());

    let actor = resolve_admin_actor(&email, &store, &EntropyPicker).await?;
    tracing::info!(
        actor_id = actor.user_id,
        target_id = user_id,
        "admin delete authorized"
    );

    let rows_deleted = users::delete_user(&pool, user_id).await?;
    if rows_deleted == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(json!({ "rowsDeleted": rows_deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::gate::{AUTH_EMAIL_HEADER, AUTH_PASSWORD_HEADER};

    // The credential phase must decide before any database resource is
    // acquired. Neither test configures a reachable database, so a handler
    // that touched the pool first would answer 503 instead.

    #[tokio::test]
    async fn delete_with_missing_headers_answers_400_without_a_database() {
        let err = delete(Path(1), HeaderMap::new()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn delete_with_rejected_credentials_answers_401_without_a_database() {
        // Default dev authenticator endpoint is unreachable here, and a
        // failed verification call is a rejection
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_EMAIL_HEADER, "a@x.com".parse().unwrap());
        headers.insert(AUTH_PASSWORD_HEADER, "bad".parse().unwrap());

        let err = delete(Path(1), headers).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
