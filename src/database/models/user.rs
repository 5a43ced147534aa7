use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row, mapped explicitly column-by-column rather than through
/// runtime column introspection.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub about_me: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub units: Option<String>,
    pub activity_preference: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub dob: Option<NaiveDate>,
    pub language: Option<String>,
}

/// Request body for create and update. Profile attributes are opaque to the
/// authorization core.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub about_me: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub units: Option<String>,
    pub activity_preference: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub dob: Option<NaiveDate>,
    pub language: Option<String>,
}
