pub mod app;
pub mod cache;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod types;
pub mod utils;
pub mod validations;
