// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AreaHint, BoundingBox, GeoPoint, GeocodeResult, NewsItem, PlaceRecord, PropertyRecord, SchoolRecord};
pub use requests::{AddressQuery, ProfileRequest, SchoolsQuery};
pub use responses::{
    ErrorResponse, HealthResponse, ImageRef, Location, MapData, MapSchool, NearbyPlace, School,
    SchoolsResponse, UnifiedProfile, NO_PROPERTY_MESSAGE,
};
