pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;

#[cfg(test)]
pub mod testing;
