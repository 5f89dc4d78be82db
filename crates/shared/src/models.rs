use serde::{Deserialize, Deserializer, Serialize};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

/// Map center plus integer zoom level (tile pyramids only exist at whole zooms).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

/// One partner organization from `partner_orgs.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_coord")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coord")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl OrgRecord {
    /// Coordinates, if both are present and numeric.
    pub fn position(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    /// Website URL, treating an empty or blank string as absent.
    pub fn website_link(&self) -> Option<&str> {
        self.website
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Accept numbers and numeric strings. Anything else becomes `None` so one bad
/// entry can be skipped at render time instead of failing the whole file.
fn lenient_coord<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let coord = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(coord.filter(|c| c.is_finite()))
}
