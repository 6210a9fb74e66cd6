//! Identity module: user management & authentication
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases: signup, signin, token checks, profile updates, password
//! changes and favourite stations.

pub mod service;

pub use service::{normalize_email, AuthResult, SignupInput, UserService};
