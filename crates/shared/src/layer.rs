use crate::models::LatLng;

/// Circle marker styling. Radius and weight are screen pixels, independent of zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub stroke: bool,
    pub stroke_color: &'static str,
    pub weight: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleMarker {
    pub position: LatLng,
    pub fill_color: &'static str,
    pub style: MarkerStyle,
    /// Hover title, the organization name.
    pub label: String,
    pub popup_html: String,
}

/// Clearable group of markers drawn above the tiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGroup {
    markers: Vec<CircleMarker>,
}

impl LayerGroup {
    pub fn add(&mut self, marker: CircleMarker) {
        self.markers.push(marker);
    }

    pub fn clear_layers(&mut self) {
        self.markers.clear();
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CircleMarker> {
        self.markers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CircleMarker> {
        self.markers.iter()
    }
}

impl<'a> IntoIterator for &'a LayerGroup {
    type Item = &'a CircleMarker;
    type IntoIter = std::slice::Iter<'a, CircleMarker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}
