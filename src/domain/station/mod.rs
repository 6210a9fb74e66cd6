//! Station aggregate
//!
//! Contains the Station entity with its ports, the StationStatus side record,
//! and the repository interface.

pub mod dto;
pub mod model;
pub mod repository;
pub mod status;

pub use dto::{NewStation, StationChanges, StationFilter};
pub use model::{
    validate_ports, ConnectorType, GeoPoint, Port, Station, StationState, VehicleType,
    DEFAULT_OPERATING_HOURS,
};
pub use repository::StationRepository;
pub use status::{PortStatus, StationStatus};
