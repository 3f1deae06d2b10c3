pub mod app_error;
pub mod app_state;
pub mod auth;
pub mod bootstrap;
pub mod middleware;
pub mod models;
pub mod otp;
pub mod registry;
pub mod routes;
pub mod wizard;
