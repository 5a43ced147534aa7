pub mod manager;
pub mod models;
pub mod roles;
pub mod users;
