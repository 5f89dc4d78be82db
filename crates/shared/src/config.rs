use crate::models::{LatLng, Viewport};
use crate::theme::Theme;

/// Page-level settings. Fixed at build time; the page keeps no state across reloads.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub initial_view: Viewport,
    /// Path of the partner data file, resolved against the page URL.
    pub data_url: &'static str,
    pub theme: Theme,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            initial_view: Viewport {
                center: LatLng::new(56.0, -98.5),
                zoom: 4,
            },
            data_url: "partner_orgs.json",
            theme: Theme::Light,
        }
    }
}
