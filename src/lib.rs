//! # EV Station Directory
//!
//! REST backend for finding EV charging stations and tracking how many of
//! their charging points are in use.
//!
//! ## Architecture
//!
//! - **domain**: users, stations and their occupancy records, repository traits
//! - **application**: account and station services (business rules, ownership)
//! - **infrastructure**: SeaORM persistence, JWT and bcrypt
//! - **interfaces**: axum REST API with Swagger documentation
//! - **shared**: errors, pagination, id parsing, graceful shutdown
//! - **server**: runtime bootstrap shared by the CLI binary

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

pub use interfaces::{create_api_router, ApiContext};
