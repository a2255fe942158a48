pub mod api;
pub mod backend;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;
