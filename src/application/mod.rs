//! Application layer - use-case orchestration

pub mod identity;
pub mod stations;

pub use identity::{AuthResult, SignupInput, UserService};
pub use stations::{StationDetails, StationService};
