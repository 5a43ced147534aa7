use sqlx::PgPool;

use crate::database::manager::StoreError;
use crate::database::models::user::{User, UserInput};

const USER_COLUMNS: &str = "user_id, email, first_name, last_name, phone_number, about_me, \
     city, country, units, activity_preference, height, weight, dob, language";

/// All users, ordered by id
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, StoreError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY user_id",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// One user by id
pub async fn find_user_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE user_id = $1",
        USER_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// One user by email
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Insert a user and return the created row. A unique-email violation
/// surfaces as a sqlx database error (SQLSTATE 23505).
pub async fn create_user(pool: &PgPool, input: &UserInput) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, first_name, last_name, phone_number, about_me, \
         city, country, units, activity_preference, height, weight, dob, language) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&input.email)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.phone_number)
    .bind(&input.about_me)
    .bind(&input.city)
    .bind(&input.country)
    .bind(&input.units)
    .bind(&input.activity_preference)
    .bind(input.height)
    .bind(input.weight)
    .bind(input.dob)
    .bind(&input.language)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Full update of an existing user; None when the row is absent
pub async fn update_user(
    pool: &PgPool,
    user_id: i64,
    input: &UserInput,
) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET email = $2, first_name = $3, last_name = $4, phone_number = $5, \
         about_me = $6, city = $7, country = $8, units = $9, activity_preference = $10, \
         height = $11, weight = $12, dob = $13, language = $14 \
         WHERE user_id = $1 \
         RETURNING {}",
        USER_COLUMNS
    ))
    .bind(user_id)
    .bind(&input.email)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.phone_number)
    .bind(&input.about_me)
    .bind(&input.city)
    .bind(&input.country)
    .bind(&input.units)
    .bind(&input.activity_preference)
    .bind(input.height)
    .bind(input.weight)
    .bind(input.dob)
    .bind(&input.language)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Delete a user; returns the number of rows affected
pub async fn delete_user(pool: &PgPool, user_id: i64) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
