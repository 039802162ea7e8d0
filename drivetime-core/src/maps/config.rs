//! Maps client configuration.
//!
//! The API key and endpoint URLs are an explicit value handed to the client
//! constructor — there is no process-global state, and tests can point the
//! client at a local server.

use super::provider::RouteError;

const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
const DEFAULT_STATIC_MAP_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

#[derive(Debug, Clone)]
pub struct MapsConfig {
    pub api_key: String,
    pub geocode_url: String,
    pub directions_url: String,
    pub static_map_url: String,
}

impl MapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            directions_url: DEFAULT_DIRECTIONS_URL.to_string(),
            static_map_url: DEFAULT_STATIC_MAP_URL.to_string(),
        }
    }

    /// Read the key from `GOOGLE_MAPS_API_KEY`.
    pub fn from_env() -> Result<Self, RouteError> {
        match std::env::var("GOOGLE_MAPS_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            _ => Err(RouteError::MissingApiKey),
        }
    }

    /// Override the endpoint base URLs (tests, proxies).
    pub fn with_base_urls(
        mut self,
        geocode: impl Into<String>,
        directions: impl Into<String>,
        static_map: impl Into<String>,
    ) -> Self {
        self.geocode_url = geocode.into();
        self.directions_url = directions.into();
        self.static_map_url = static_map.into();
        self
    }
}
