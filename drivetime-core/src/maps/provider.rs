//! Provider traits and structured error types.
//!
//! The RouteProvider trait abstracts over the routing service so the batch
//! engine can be driven by a scripted implementation in tests. The engine
//! treats every RouteError identically; the variants exist so the CLI can
//! explain what actually went wrong.

use thiserror::Error;

use crate::domain::{LatLng, Place, TrafficModel};

/// Structured error types for routing and geocoding calls.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("missing GOOGLE_MAPS_API_KEY environment variable")]
    MissingApiKey,

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("service returned {status}: {message}")]
    ServiceStatus { status: String, message: String },

    #[error("no route between origin and destination")]
    NoRoute,

    #[error("no geocoding candidates for '{query}'")]
    ZeroResults { query: String },

    #[error("unexpected response shape: {0}")]
    ResponseFormat(String),
}

/// A traffic-aware routing service.
///
/// One call maps to one remote request. Implementations may fail for any
/// reason; callers own the retry policy.
pub trait RouteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Driving duration in seconds for a departure at `departure_epoch`
    /// (Unix seconds, must be now or in the future) under `model`.
    fn duration_in_traffic(
        &self,
        origin: LatLng,
        dest: LatLng,
        departure_epoch: i64,
        model: TrafficModel,
    ) -> Result<u32, RouteError>;
}

/// Resolves free-text queries to coordinate candidates.
pub trait Geocoder {
    /// Up to 5 candidates, in the order the service ranked them.
    fn resolve(&self, query: &str) -> Result<Vec<Place>, RouteError>;
}
