use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use property_profile::config::Settings;
use property_profile::routes::{self, profile::AppState};
use property_profile::{ProfileAggregator, Providers};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Configuration errors are reported once logging is up
    let settings = Settings::load();

    // Initialize logging: LOG_LEVEL / LOG_FORMAT win over the [logging] section
    let logging = settings.as_ref().map(|s| s.logging.clone()).unwrap_or_default();
    let log_level = std::env::var("LOG_LEVEL").unwrap_or(logging.level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(logging.format);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting property profile service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    let providers = Providers::from_settings(&settings).map_err(|e| {
        error!("Failed to build HTTP clients: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    info!(
        "Providers initialized (property key: {}, news key: {}, image key: {})",
        configured(&settings.property.api_key),
        configured(&settings.news.api_key),
        configured(&settings.images.access_key),
    );

    let app_state = AppState {
        aggregator: ProfileAggregator::new(providers)
            .with_school_radius_km(settings.profile.school_radius_km),
        default_radius_km: settings.profile.default_radius_km,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let allowed_origins = settings.server.allowed_origins.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

fn configured(key: &Option<String>) -> &'static str {
    if property_profile::config::credential(key).is_some() { "set" } else { "unset" }
}
