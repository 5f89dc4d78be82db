//! Spherical Web Mercator (EPSG:3857) as used by XYZ tile services.
//!
//! World pixel space at zoom `z` is `TILE_SIZE * 2^z` wide and tall, with the
//! origin at the north-west corner (lng -180, lat +85.05).

use crate::models::{LatLng, Viewport};

pub const TILE_SIZE: f64 = 256.0;

/// Latitude where the Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

pub const ZOOM_MIN: u8 = 1;
pub const ZOOM_MAX: u8 = 18;

/// World size in pixels at `zoom`. Zooms past [`ZOOM_MAX`] are treated as `ZOOM_MAX`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom.min(ZOOM_MAX))
}

pub fn clamp_zoom(zoom: i32) -> u8 {
    zoom.clamp(i32::from(ZOOM_MIN), i32::from(ZOOM_MAX)) as u8
}

/// Project a point to world pixels.
pub fn project(point: LatLng, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (point.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * y / size);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), lng)
}

/// World pixel of the container's top-left corner.
fn pixel_origin(viewport: &Viewport, width: f64, height: f64) -> (f64, f64) {
    let (cx, cy) = project(viewport.center, viewport.zoom);
    (cx - width / 2.0, cy - height / 2.0)
}

/// Container-relative pixel position of a point, using the world copy whose
/// x is closest to the view center so markers follow the wrapped tiles.
pub fn to_screen(point: LatLng, viewport: &Viewport, width: f64, height: f64) -> (f64, f64) {
    let (ox, oy) = pixel_origin(viewport, width, height);
    let (cx, _) = project(viewport.center, viewport.zoom);
    let (x, y) = project(point, viewport.zoom);
    let size = world_size(viewport.zoom);
    let x = x + ((cx - x) / size).round() * size;
    (x - ox, y - oy)
}

/// Geographic point under a container-relative pixel.
pub fn from_screen(sx: f64, sy: f64, viewport: &Viewport, width: f64, height: f64) -> LatLng {
    let (ox, oy) = pixel_origin(viewport, width, height);
    unproject(ox + sx, oy + sy, viewport.zoom)
}

/// Wrap a longitude into [-180, 180).
pub fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Move the view so content follows a drag of `(dx, dy)` screen pixels.
pub fn pan_by(viewport: &Viewport, dx: f64, dy: f64) -> Viewport {
    let (cx, cy) = project(viewport.center, viewport.zoom);
    let size = world_size(viewport.zoom);
    let y = (cy - dy).clamp(0.0, size);
    let center = unproject(cx - dx, y, viewport.zoom);
    Viewport {
        center: LatLng::new(center.lat, wrap_lng(center.lng)),
        zoom: viewport.zoom,
    }
}

/// Change zoom keeping the point under `cursor` fixed on screen.
pub fn zoom_at(
    viewport: &Viewport,
    new_zoom: u8,
    cursor: (f64, f64),
    width: f64,
    height: f64,
) -> Viewport {
    let new_zoom = clamp_zoom(i32::from(new_zoom));
    if new_zoom == viewport.zoom {
        return *viewport;
    }
    let anchor = from_screen(cursor.0, cursor.1, viewport, width, height);
    let (ax, ay) = project(anchor, new_zoom);
    let cx = ax - cursor.0 + width / 2.0;
    let cy = ay - cursor.1 + height / 2.0;
    let center = unproject(cx, cy.clamp(0.0, world_size(new_zoom)), new_zoom);
    Viewport {
        center: LatLng::new(center.lat, wrap_lng(center.lng)),
        zoom: new_zoom,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

/// A tile plus where its top-left corner sits in the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub coord: TileCoord,
    /// Column before wrapping; distinguishes repeated copies of the same tile.
    pub col: i64,
    pub left: f64,
    pub top: f64,
}

/// Every tile that intersects a `width` x `height` container. Columns wrap
/// around the antimeridian; rows past the poles are skipped.
pub fn visible_tiles(viewport: &Viewport, width: f64, height: f64) -> Vec<TilePlacement> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let zoom = viewport.zoom.min(ZOOM_MAX);
    let (ox, oy) = pixel_origin(viewport, width, height);
    let tiles_across = 1i64 << zoom;

    let col_start = (ox / TILE_SIZE).floor() as i64;
    let col_end = ((ox + width) / TILE_SIZE).ceil() as i64;
    let row_start = ((oy / TILE_SIZE).floor() as i64).max(0);
    let row_end = (((oy + height) / TILE_SIZE).ceil() as i64).min(tiles_across);

    let mut tiles = Vec::new();
    for row in row_start..row_end {
        for col in col_start..col_end {
            tiles.push(TilePlacement {
                coord: TileCoord {
                    x: col.rem_euclid(tiles_across) as u32,
                    y: row as u32,
                    z: zoom,
                },
                col,
                left: col as f64 * TILE_SIZE - ox,
                top: row as f64 * TILE_SIZE - oy,
            });
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        center: LatLng::new(56.0, -98.5),
        zoom: 4,
    };

    #[test]
    fn test_project_origin_is_world_center() {
        let (x, y) = project(LatLng::new(0.0, 0.0), 0);
        assert!((x - 128.0).abs() < 1e-9);
        assert!((y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_north_west_corner() {
        let (x, y) = project(LatLng::new(MAX_LATITUDE, -180.0), 2);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_project_unproject_roundtrip() {
        let p = LatLng::new(43.6532, -79.3832);
        let (x, y) = project(p, 11);
        let back = unproject(x, y, 11);
        assert!((back.lat - p.lat).abs() < 1e-9);
        assert!((back.lng - p.lng).abs() < 1e-9);
    }

    #[test]
    fn test_center_maps_to_container_middle() {
        let (sx, sy) = to_screen(VIEW.center, &VIEW, 800.0, 600.0);
        assert!((sx - 400.0).abs() < 1e-6);
        assert!((sy - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_screen_inverts_to_screen() {
        let p = LatLng::new(49.28, -123.12);
        let (sx, sy) = to_screen(p, &VIEW, 1024.0, 768.0);
        let back = from_screen(sx, sy, &VIEW, 1024.0, 768.0);
        assert!((back.lat - p.lat).abs() < 1e-9);
        assert!((back.lng - p.lng).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_lng() {
        assert!((wrap_lng(190.0) - -170.0).abs() < 1e-9);
        assert!((wrap_lng(-190.0) - 170.0).abs() < 1e-9);
        assert!((wrap_lng(45.0) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_by_drag_right_moves_center_west() {
        let panned = pan_by(&VIEW, 100.0, 0.0);
        assert!(panned.center.lng < VIEW.center.lng);
        assert!((panned.center.lat - VIEW.center.lat).abs() < 1e-9);
        assert_eq!(panned.zoom, VIEW.zoom);
    }

    #[test]
    fn test_pan_by_drag_down_moves_center_north() {
        let panned = pan_by(&VIEW, 0.0, 50.0);
        assert!(panned.center.lat > VIEW.center.lat);
    }

    #[test]
    fn test_zoom_at_center_keeps_center() {
        let zoomed = zoom_at(&VIEW, 5, (400.0, 300.0), 800.0, 600.0);
        assert_eq!(zoomed.zoom, 5);
        assert!((zoomed.center.lat - VIEW.center.lat).abs() < 1e-6);
        assert!((zoomed.center.lng - VIEW.center.lng).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_at_cursor_keeps_point_under_cursor() {
        let cursor = (650.0, 120.0);
        let under = from_screen(cursor.0, cursor.1, &VIEW, 800.0, 600.0);
        let zoomed = zoom_at(&VIEW, 6, cursor, 800.0, 600.0);
        let (sx, sy) = to_screen(under, &zoomed, 800.0, 600.0);
        assert!((sx - cursor.0).abs() < 1e-6);
        assert!((sy - cursor.1).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let zoomed = zoom_at(&VIEW, 40, (0.0, 0.0), 800.0, 600.0);
        assert_eq!(zoomed.zoom, ZOOM_MAX);
        assert_eq!(clamp_zoom(0), ZOOM_MIN);
        assert_eq!(clamp_zoom(-3), ZOOM_MIN);
    }

    #[test]
    fn test_visible_tiles_cover_container() {
        let tiles = visible_tiles(&VIEW, 800.0, 600.0);
        assert!(!tiles.is_empty());
        let min_left = tiles.iter().map(|t| t.left).fold(f64::INFINITY, f64::min);
        let max_right = tiles.iter().map(|t| t.left + TILE_SIZE).fold(f64::NEG_INFINITY, f64::max);
        let min_top = tiles.iter().map(|t| t.top).fold(f64::INFINITY, f64::min);
        let max_bottom = tiles.iter().map(|t| t.top + TILE_SIZE).fold(f64::NEG_INFINITY, f64::max);
        assert!(min_left <= 0.0 && max_right >= 800.0);
        assert!(min_top <= 0.0 && max_bottom >= 600.0);
        assert!(tiles.iter().all(|t| t.coord.z == 4 && t.coord.x < 16 && t.coord.y < 16));
    }

    #[test]
    fn test_visible_tiles_wrap_columns() {
        let view = Viewport {
            center: LatLng::new(0.0, 179.0),
            zoom: 1,
        };
        let tiles = visible_tiles(&view, 600.0, 256.0);
        assert!(tiles.iter().any(|t| t.coord.x == 0));
        assert!(tiles.iter().any(|t| t.coord.x == 1));
        assert!(tiles.iter().all(|t| t.coord.x < 2));
    }

    #[test]
    fn test_visible_tiles_skip_rows_past_poles() {
        let view = Viewport {
            center: LatLng::new(0.0, 0.0),
            zoom: 1,
        };
        // 512px world inside a 2000px tall container
        let tiles = visible_tiles(&view, 512.0, 2000.0);
        assert!(tiles.iter().all(|t| t.coord.y < 2));
        assert_eq!(tiles.len(), 4);
    }

    #[test]
    fn test_marker_follows_drag_across_antimeridian() {
        let view = Viewport {
            center: LatLng::new(0.0, -179.9),
            zoom: 2,
        };
        let marker = LatLng::new(0.0, -100.0);
        let (before, _) = to_screen(marker, &view, 800.0, 600.0);
        let panned = pan_by(&view, 1.0, 0.0);
        assert!(panned.center.lng > 179.0, "center wrapped to {}", panned.center.lng);
        let (after, _) = to_screen(marker, &panned, 800.0, 600.0);
        assert!((after - before - 1.0).abs() < 1e-6, "moved {}", after - before);
    }

    #[test]
    fn test_marker_drawn_in_nearest_world_copy() {
        let view = Viewport {
            center: LatLng::new(0.0, 170.0),
            zoom: 3,
        };
        // -170 is 20 degrees east of the center across the antimeridian
        let (x, _) = to_screen(LatLng::new(0.0, -170.0), &view, 800.0, 600.0);
        let expected = 400.0 + 20.0 / 360.0 * world_size(3);
        assert!((x - expected).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_past_max_does_not_overflow() {
        assert_eq!(world_size(40), world_size(ZOOM_MAX));
        assert_eq!(world_size(255), world_size(ZOOM_MAX));
        let view = Viewport {
            center: LatLng::new(45.0, -75.0),
            zoom: 200,
        };
        let tiles = visible_tiles(&view, 512.0, 512.0);
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.coord.z == ZOOM_MAX));
    }

    #[test]
    fn test_visible_tiles_empty_container() {
        assert!(visible_tiles(&VIEW, 0.0, 600.0).is_empty());
    }
}
