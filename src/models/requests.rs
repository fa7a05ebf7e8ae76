use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for a unified property profile (query string or JSON body)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(range(min = 0.5, max = 10.0))]
    #[serde(default)]
    pub radius_km: Option<f64>,
}

/// Request carrying only an address
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddressQuery {
    #[validate(length(min = 1))]
    pub address: String,
}

impl AddressQuery {
    /// Strip surrounding whitespace so a blank address fails validation
    pub fn trimmed(self) -> Self {
        Self {
            address: self.address.trim().to_string(),
        }
    }
}

/// Request for schools around a point
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SchoolsQuery {
    pub lat: f64,
    pub lon: f64,
    #[validate(range(min = 0.1, max = 50.0))]
    #[serde(default = "crate::config::default_school_radius_km")]
    pub radius_km: f64,
}
