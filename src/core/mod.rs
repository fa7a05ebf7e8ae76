// Core pipeline exports
pub mod address;
pub mod aggregator;
pub mod distance;

pub use address::parse_area_hint;
pub use aggregator::{ProfileAggregator, ProfileError};
pub use distance::{clamp_radius_km, linear_bounding_box};
