pub mod config;
pub mod handlers;
pub mod models;
pub mod services;

#[cfg(feature = "server")]
pub mod server;
