use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::database::manager::StoreError;
use crate::database::models::role::Role;

/// Row-level access to the user/role assignment relation.
///
/// The authorization core is written against this seam so it can be
/// exercised without a live database. Every decision re-reads current
/// state; nothing is cached.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Role names held by a user, ordered by name
    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<String>, StoreError>;

    /// Full role catalog, ordered by id
    async fn role_catalog(&self) -> Result<Vec<Role>, StoreError>;

    /// Id of a role by its unique name
    async fn role_id_by_name(&self, role_name: &str) -> Result<Option<i64>, StoreError>;

    /// Whether any assignment row references a role with the given name
    async fn has_assignment_for_role(&self, role_name: &str) -> Result<bool, StoreError>;

    /// Ids of all existing users
    async fn user_ids(&self) -> Result<Vec<i64>, StoreError>;

    /// Local user id for a verified email, if one exists
    async fn user_id_by_email(&self, email: &str) -> Result<Option<i64>, StoreError>;

    /// Whether a user row exists
    async fn user_exists(&self, user_id: i64) -> Result<bool, StoreError>;

    /// Insert an assignment row, guarded so a pre-existing identical pair
    /// is not duplicated. Commits immediately.
    async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError>;
}

/// Postgres-backed role store. Each method is a single autocommitted
/// statement on a pool connection, returned on all exit paths.
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT r.role_name
             FROM user_roles ur
             JOIN roles r ON r.role_id = ur.role_id
             WHERE ur.user_id = $1
             ORDER BY r.role_name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("role_name")).collect())
    }

    async fn role_catalog(&self) -> Result<Vec<Role>, StoreError> {
        let roles =
            sqlx::query_as::<_, Role>("SELECT role_id, role_name FROM roles ORDER BY role_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(roles)
    }

    async fn role_id_by_name(&self, role_name: &str) -> Result<Option<i64>, StoreError> {
        let row = sqlx::query("SELECT role_id FROM roles WHERE role_name = $1")
            .bind(role_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("role_id")))
    }

    async fn has_assignment_for_role(&self, role_name: &str) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT 1 AS present
             FROM user_roles ur
             JOIN roles r ON r.role_id = ur.role_id
             WHERE r.role_name = $1
             LIMIT 1",
        )
        .bind(role_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    async fn user_ids(&self) -> Result<Vec<i64>, StoreError> {
        let rows = sqlx::query("SELECT user_id FROM users ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("user_id")).collect())
    }

    async fn user_id_by_email(&self, email: &str) -> Result<Option<i64>, StoreError> {
        let row = sqlx::query("SELECT user_id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("user_id")))
    }

    async fn user_exists(&self, user_id: i64) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 AS present FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        // Guards the pair, not the invariant: concurrent callers may still
        // promote different users, which only strengthens admin existence.
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
