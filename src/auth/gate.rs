use axum::http::HeaderMap;

use crate::auth::invariant::{ensure_admin_exists, Picker};
use crate::auth::verifier::CredentialVerifier;
use crate::database::models::role::ADMIN_ROLE;
use crate::database::roles::RoleStore;
use crate::error::ApiError;

pub const AUTH_EMAIL_HEADER: &str = "X-Auth-Email";
pub const AUTH_PASSWORD_HEADER: &str = "X-Auth-Password";

/// Caller identity resolved for the scope of one privileged request.
/// Never persisted.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: i64,
    pub email: String,
    pub roles: Vec<String>,
}

/// Pull the identity/secret pair out of the request headers. Both are
/// required; absence rejects before any store access.
fn extract_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
    let email = headers
        .get(AUTH_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let password = headers
        .get(AUTH_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request(format!(
            "Missing authentication headers: {} and {}",
            AUTH_EMAIL_HEADER, AUTH_PASSWORD_HEADER
        )));
    }

    Ok((email.to_string(), password.to_string()))
}

/// Phase one of the gate: header presence and credential verification.
///
/// Touches no store, so callers can run it before acquiring any database
/// resources. Returns the verified caller email.
pub async fn verify_caller(
    headers: &HeaderMap,
    verifier: &dyn CredentialVerifier,
) -> Result<String, ApiError> {
    let (email, password) = extract_credentials(headers)?;

    if !verifier.verify(&email, &password).await {
        return Err(ApiError::unauthorized(
            "Invalid credentials (authenticator rejected)",
        ));
    }

    Ok(email)
}

/// Phase two of the gate: the admin invariant is re-established, then the
/// verified identity is resolved to a local user and its roles are fetched
/// directly.
pub async fn resolve_admin_actor(
    email: &str,
    store: &dyn RoleStore,
    picker: &dyn Picker,
) -> Result<Actor, ApiError> {
    // Runs regardless of whether this particular caller is admitted
    ensure_admin_exists(store, picker).await?;

    let actor_id = store
        .user_id_by_email(email)
        .await?
        .ok_or_else(|| ApiError::forbidden("Authenticated user is not present in system"))?;

    // Direct fetch: the gate never lazily assigns roles to the caller
    let roles = store.roles_for_user(actor_id).await?;
    if !roles.iter().any(|r| r == ADMIN_ROLE) {
        return Err(ApiError::forbidden("Admin role required"));
    }

    Ok(Actor {
        user_id: actor_id,
        email: email.to_string(),
        roles,
    })
}

/// Decide whether the caller may perform an admin-only operation.
///
/// Fixed order: header presence, credential verification, then the store
/// phase. Each denial is terminal; nothing retries. Handlers that must not
/// open a store connection before credentials pass call the two phases
/// separately.
pub async fn authorize_admin(
    headers: &HeaderMap,
    verifier: &dyn CredentialVerifier,
    store: &dyn RoleStore,
    picker: &dyn Picker,
) -> Result<Actor, ApiError> {
    let email = verify_caller(headers, verifier).await?;
    resolve_admin_actor(&email, store, picker).await
}
