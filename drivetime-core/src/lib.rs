//! DriveTime Core — departure grid, batch fetch engine, series assembly, chart.
//!
//! This crate contains the heart of the departure-time scanner:
//! - Domain types (coordinates, geocoder candidates, traffic models, fetch tasks)
//! - Timezone-aware departure grid construction
//! - Routing provider traits and the Google Maps web-service client
//! - Multi-round bounded-concurrency batch fetch with per-task retry
//! - Series assembly with best/worst insight extraction
//! - ASCII chart rendering for terminal output

pub mod assemble;
pub mod chart;
pub mod domain;
pub mod engine;
pub mod grid;
pub mod maps;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the engine shares across worker
    /// threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::LatLng>();
        require_sync::<domain::LatLng>();
        require_send::<domain::TrafficModel>();
        require_sync::<domain::TrafficModel>();
        require_send::<domain::FetchTask>();
        require_sync::<domain::FetchTask>();

        require_send::<engine::DurationTable>();
        require_sync::<engine::DurationTable>();
        require_send::<engine::RetryPolicy>();
        require_sync::<engine::RetryPolicy>();

        require_send::<maps::GoogleMapsClient>();
        require_sync::<maps::GoogleMapsClient>();
    }
}
