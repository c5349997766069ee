use serde::{Deserialize, Serialize};

/// Restaurant location as served by `GET /location`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Location {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Location {
    /// Google Maps link for the coordinates, when both are known.
    pub fn maps_url(&self) -> Option<String> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(format!("https://www.google.com/maps?q={},{}", lat, lng)),
            _ => None,
        }
    }
}
