pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;
pub mod store;

pub use config::Config;
pub use observability::init_logging;
