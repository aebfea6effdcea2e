pub mod config;
pub mod errors;
pub mod logging;
pub mod routes;
pub mod schemas;
pub mod store;
pub mod validation;
