//! Stations module: station inventory, ports and occupancy

pub mod service;

pub use service::{StationDetails, StationService};
