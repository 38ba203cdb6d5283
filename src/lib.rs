pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod observer;
pub mod pagination;
pub mod resource;
pub mod resources;
pub mod services;
pub mod types;
pub mod validation;

pub use app::{app, AppState};
