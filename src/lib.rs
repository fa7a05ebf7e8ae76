//! Property Profile - address-centric aggregation service
//!
//! Geocodes a street address, then gathers nearby schools, the property
//! record, points of interest, local news and an optional placeholder image
//! from independent upstream providers into one profile. Provider failures
//! degrade to empty sections; only a geocoder failure fails the request.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{parse_area_hint, ProfileAggregator, ProfileError};
pub use models::{AreaHint, GeocodeResult, UnifiedProfile};
pub use services::Providers;
