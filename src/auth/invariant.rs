use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::role::ADMIN_ROLE;
use crate::database::roles::RoleStore;

/// Uniform selection over a candidate set, injected so tests can pin the
/// choice. Callers guarantee `len > 0`.
pub trait Picker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Production picker: index derived from fresh v4 UUID random bytes.
pub struct EntropyPicker;

impl Picker for EntropyPicker {
    fn pick(&self, len: usize) -> usize {
        debug_assert!(len > 0);
        let entropy = u128::from_be_bytes(*Uuid::new_v4().as_bytes());
        (entropy % len as u128) as usize
    }
}

/// Guarantee at least one Admin assignment exists.
///
/// Runs opportunistically in front of privileged role reads and the delete
/// gate, so the invariant is re-checked on the hot path instead of only at
/// provisioning time. No-ops, all non-fatal: an Admin already assigned, the
/// Admin role undefined, or no users to promote. Otherwise one existing
/// user, chosen uniformly at random, is promoted.
///
/// The check and the insert are separate autocommitted statements, so
/// concurrent callers racing from a zero-admin state may each promote a
/// user. That yields more than one admin, which only strengthens the
/// invariant, and is deliberately not serialized here.
pub async fn ensure_admin_exists(
    store: &dyn RoleStore,
    picker: &dyn Picker,
) -> Result<(), StoreError> {
    if store.has_assignment_for_role(ADMIN_ROLE).await? {
        return Ok(());
    }

    let admin_role_id = match store.role_id_by_name(ADMIN_ROLE).await? {
        Some(id) => id,
        None => return Ok(()),
    };

    let user_ids = store.user_ids().await?;
    if user_ids.is_empty() {
        return Ok(());
    }

    let chosen = user_ids[picker.pick(user_ids.len())];
    store.assign_role(chosen, admin_role_id).await?;

    tracing::info!(user_id = chosen, "promoted user to Admin to restore invariant");
    Ok(())
}

/// Answer a user's roles, lazily assigning one when the set is empty.
///
/// Existing roles come back ordered by name, unchanged. An empty set gets
/// exactly one role, chosen uniformly at random from the catalog, before
/// the answer is returned. An empty catalog is the only way the caller
/// observes an empty list.
pub async fn ensure_user_has_role(
    store: &dyn RoleStore,
    picker: &dyn Picker,
    user_id: i64,
) -> Result<Vec<String>, StoreError> {
    let roles = store.roles_for_user(user_id).await?;
    if !roles.is_empty() {
        return Ok(roles);
    }

    let catalog = store.role_catalog().await?;
    if catalog.is_empty() {
        return Ok(Vec::new());
    }

    let chosen = &catalog[picker.pick(catalog.len())];
    store.assign_role(user_id, chosen.role_id).await?;

    Ok(vec![chosen.role_name.clone()])
}
