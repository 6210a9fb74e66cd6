//! HTTP REST API
//!
//! - `common`: response envelope, error formatting, validated JSON extractor
//! - `middleware`: bearer authentication and role restriction
//! - `modules`: one module per resource (dto + handlers)
//! - `router`: route table and OpenAPI document

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

#[cfg(test)]
mod tests;

pub use router::{create_api_router, ApiContext, ApiDoc};
