//! Geographic primitives used by the geocoder and routing client.

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `"lat,lng"` — the form the Maps web services accept in query strings.
    pub fn as_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }

    /// Parse `"lat,lng"` free text. Returns None unless both components are
    /// finite numbers — callers fall back to geocoding in that case.
    pub fn parse(s: &str) -> Option<Self> {
        let (lat, lng) = s.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lng: f64 = lng.trim().parse().ok()?;
        if lat.is_finite() && lng.is_finite() {
            Some(Self { lat, lng })
        } else {
            None
        }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// One geocoder candidate for a textual query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub formatted_address: String,
    pub location: LatLng,
    pub place_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lng_text() {
        let c = LatLng::parse("37.7749,-122.4194").unwrap();
        assert_eq!(c.lat, 37.7749);
        assert_eq!(c.lng, -122.4194);
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        let c = LatLng::parse(" 34.05 , -118.24 ").unwrap();
        assert_eq!(c.lat, 34.05);
        assert_eq!(c.lng, -118.24);
    }

    #[test]
    fn rejects_free_text_and_non_finite() {
        assert!(LatLng::parse("Golden Gate Bridge").is_none());
        assert!(LatLng::parse("37.77").is_none());
        assert!(LatLng::parse("NaN,12.0").is_none());
        assert!(LatLng::parse("inf,12.0").is_none());
    }

    #[test]
    fn as_param_round_trips() {
        let c = LatLng::new(47.6, -122.3);
        assert_eq!(LatLng::parse(&c.as_param()), Some(c));
    }
}
