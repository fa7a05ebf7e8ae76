use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub schools: SchoolsSettings,
    #[serde(default)]
    pub property: PropertySettings,
    #[serde(default)]
    pub poi: PoiSettings,
    #[serde(default)]
    pub news: NewsSettings,
    #[serde(default)]
    pub images: ImageSettings,
    #[serde(default)]
    pub profile: ProfileSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8000 }
fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

/// Census geocoder
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

fn default_geocoder_url() -> String { "https://geocoding.geo.census.gov/geocoder".to_string() }
fn default_geocoder_timeout() -> u64 { 15 }

/// NCES EDGE public school locations
#[derive(Debug, Clone, Deserialize)]
pub struct SchoolsSettings {
    #[serde(default = "default_schools_url")]
    pub base_url: String,
    #[serde(default = "default_schools_timeout")]
    pub timeout_secs: u64,
}

impl Default for SchoolsSettings {
    fn default() -> Self {
        Self {
            base_url: default_schools_url(),
            timeout_secs: default_schools_timeout(),
        }
    }
}

fn default_schools_url() -> String {
    "https://nces.ed.gov/opengis/rest/services/K12_School_Locations/EDGE_GEOCODE_PUBLICSCH_1920/MapServer/0"
        .to_string()
}
fn default_schools_timeout() -> u64 { 20 }

/// RentCast property records
#[derive(Debug, Clone, Deserialize)]
pub struct PropertySettings {
    #[serde(default = "default_property_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_property_timeout")]
    pub timeout_secs: u64,
}

impl Default for PropertySettings {
    fn default() -> Self {
        Self {
            base_url: default_property_url(),
            api_key: None,
            timeout_secs: default_property_timeout(),
        }
    }
}

fn default_property_url() -> String { "https://api.rentcast.io/v1".to_string() }
fn default_property_timeout() -> u64 { 15 }

/// Overpass (OpenStreetMap) points of interest
#[derive(Debug, Clone, Deserialize)]
pub struct PoiSettings {
    #[serde(default = "default_poi_url")]
    pub url: String,
    #[serde(default = "default_poi_timeout")]
    pub timeout_secs: u64,
}

impl Default for PoiSettings {
    fn default() -> Self {
        Self {
            url: default_poi_url(),
            timeout_secs: default_poi_timeout(),
        }
    }
}

fn default_poi_url() -> String { "https://overpass-api.de/api/interpreter".to_string() }
// Overpass is slow under load
fn default_poi_timeout() -> u64 { 45 }

/// NewsCatcher local news
#[derive(Debug, Clone, Deserialize)]
pub struct NewsSettings {
    #[serde(default = "default_local_news_url")]
    pub local_url: String,
    #[serde(default = "default_search_news_url")]
    pub search_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_news_timeout")]
    pub timeout_secs: u64,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            local_url: default_local_news_url(),
            search_url: default_search_news_url(),
            api_key: None,
            timeout_secs: default_news_timeout(),
        }
    }
}

fn default_local_news_url() -> String { "https://local-news.newscatcherapi.com/api/search".to_string() }
fn default_search_news_url() -> String { "https://v3-api.newscatcherapi.com/api/search".to_string() }
fn default_news_timeout() -> u64 { 15 }

/// Unsplash placeholder images
#[derive(Debug, Clone, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "default_images_url")]
    pub base_url: String,
    pub access_key: Option<String>,
    #[serde(default = "default_images_timeout")]
    pub timeout_secs: u64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            base_url: default_images_url(),
            access_key: None,
            timeout_secs: default_images_timeout(),
        }
    }
}

fn default_images_url() -> String { "https://api.unsplash.com/search/photos".to_string() }
fn default_images_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSettings {
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    #[serde(default = "default_school_radius_km")]
    pub school_radius_km: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            school_radius_km: default_school_radius_km(),
        }
    }
}

pub fn default_radius_km() -> f64 { 2.0 }
pub fn default_school_radius_km() -> f64 { 5.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Treat an unset, empty or whitespace-only credential as missing.
pub fn credential(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Provider credentials read from their conventional variable names
const CREDENTIAL_VARS: &[(&str, &str)] = &[
    ("RENTCAST_API_KEY", "property.api_key"),
    ("NEWSCATCHER_API_KEY", "news.api_key"),
    ("UNSPLASH_ACCESS_KEY", "images.access_key"),
];

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PROFILE__)
    /// 5. Provider credential variables (RENTCAST_API_KEY, NEWSCATCHER_API_KEY, UNSPLASH_ACCESS_KEY)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PROFILE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PROFILE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_credential_vars(settings, |var| std::env::var(var).ok())?.try_deserialize()
    }
}

fn apply_credential_vars<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in CREDENTIAL_VARS {
        if let Some(value) = lookup(*var) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}
