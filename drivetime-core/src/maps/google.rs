//! Google Maps web-service client.
//!
//! Wraps three endpoints: Geocoding (free text -> candidates), Directions
//! with `departure_time` + `traffic_model` (the traffic-aware ETA), and the
//! Static Maps URL builder. The Directions endpoint omits
//! `duration_in_traffic` for some routes; the plain `duration` is the
//! documented fallback.

use serde::Deserialize;
use std::time::Duration;

use super::config::MapsConfig;
use super::provider::{Geocoder, RouteError, RouteProvider};
use crate::domain::{LatLng, Place, TrafficModel};

/// Geocoding API response.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Geometry,
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Directions API response, reduced to the fields the scanner reads.
#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    duration: Option<TextValue>,
    duration_in_traffic: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: u32,
}

/// Client for the Google Maps web services.
pub struct GoogleMapsClient {
    client: reqwest::blocking::Client,
    config: MapsConfig,
}

impl GoogleMapsClient {
    pub fn new(config: MapsConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self { client, config }
    }

    /// Static Maps URL with a green S marker at the origin and a red E
    /// marker at the destination.
    pub fn static_map_url(&self, origin: LatLng, dest: LatLng) -> Result<String, RouteError> {
        let params = [
            ("size", "640x400".to_string()),
            ("scale", "2".to_string()),
            ("maptype", "roadmap".to_string()),
            ("markers", format!("color:green|label:S|{}", origin.as_param())),
            ("markers", format!("color:red|label:E|{}", dest.as_param())),
            ("key", self.config.api_key.clone()),
        ];
        let url = reqwest::Url::parse_with_params(&self.config.static_map_url, &params)
            .map_err(|e| RouteError::ResponseFormat(format!("invalid static map base URL: {e}")))?;
        Ok(url.to_string())
    }

    /// Download the PNG bytes for a previously built static-map URL.
    pub fn fetch_static_map(&self, url: &str) -> Result<Vec<u8>, RouteError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| RouteError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RouteError::HttpStatus {
                status: status.as_u16(),
            });
        }
        let bytes = resp
            .bytes()
            .map_err(|e| RouteError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn parse_geocode(query: &str, resp: GeocodeResponse) -> Result<Vec<Place>, RouteError> {
        match resp.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            other => {
                return Err(RouteError::ServiceStatus {
                    status: other.to_string(),
                    message: resp.error_message.unwrap_or_default(),
                })
            }
        }

        let places: Vec<Place> = resp
            .results
            .into_iter()
            .take(5)
            .map(|r| Place {
                formatted_address: r.formatted_address.unwrap_or_else(|| query.to_string()),
                location: LatLng::new(r.geometry.location.lat, r.geometry.location.lng),
                place_id: r.place_id,
            })
            .collect();

        if places.is_empty() {
            return Err(RouteError::ZeroResults {
                query: query.to_string(),
            });
        }
        Ok(places)
    }

    fn parse_directions(resp: DirectionsResponse) -> Result<u32, RouteError> {
        if resp.status != "OK" {
            return Err(RouteError::ServiceStatus {
                status: resp.status,
                message: resp.error_message.unwrap_or_default(),
            });
        }

        let leg = resp
            .routes
            .into_iter()
            .next()
            .and_then(|r| r.legs.into_iter().next())
            .ok_or(RouteError::NoRoute)?;

        leg.duration_in_traffic
            .or(leg.duration)
            .map(|d| d.value)
            .ok_or_else(|| RouteError::ResponseFormat("leg has no duration".into()))
    }
}

impl RouteProvider for GoogleMapsClient {
    fn name(&self) -> &str {
        "google_maps"
    }

    fn duration_in_traffic(
        &self,
        origin: LatLng,
        dest: LatLng,
        departure_epoch: i64,
        model: TrafficModel,
    ) -> Result<u32, RouteError> {
        let resp = self
            .client
            .get(&self.config.directions_url)
            .query(&[
                ("origin", origin.as_param()),
                ("destination", dest.as_param()),
                ("mode", "driving".to_string()),
                ("departure_time", departure_epoch.to_string()),
                ("traffic_model", model.as_param().to_string()),
                ("key", self.config.api_key.clone()),
            ])
            .send()
            .map_err(|e| RouteError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RouteError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body: DirectionsResponse = resp
            .json()
            .map_err(|e| RouteError::ResponseFormat(e.to_string()))?;
        Self::parse_directions(body)
    }
}

impl Geocoder for GoogleMapsClient {
    fn resolve(&self, query: &str) -> Result<Vec<Place>, RouteError> {
        let resp = self
            .client
            .get(&self.config.geocode_url)
            .query(&[("address", query), ("key", self.config.api_key.as_str())])
            .send()
            .map_err(|e| RouteError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RouteError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body: GeocodeResponse = resp
            .json()
            .map_err(|e| RouteError::ResponseFormat(e.to_string()))?;
        Self::parse_geocode(query, body)
    }
}
