pub mod errors;
pub mod ids;
pub mod pagination;
pub mod shutdown;

pub use errors::*;
pub use ids::parse_id;
pub use pagination::*;
