pub mod analytics;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod listing;
pub mod middleware;
pub mod services;
pub mod state;

#[cfg(test)]
pub mod testing;
