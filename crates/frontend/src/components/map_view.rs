use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use partner_map_shared::controller::OrgMap;
use partner_map_shared::geo;
use partner_map_shared::layer::{CircleMarker, LayerGroup};
use partner_map_shared::models::Viewport;

use crate::coords;

const MAP_CONTAINER_ID: &str = "partner-map-container";

/// Drag threshold in pixels. Movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch drag threshold, larger than mouse because touch is less precise.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Accumulated wheel delta that triggers one zoom level.
const WHEEL_STEP: f64 = 100.0;

/// Used until the container has been measured.
const FALLBACK_SIZE: (f64, f64) = (960.0, 640.0);

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

/// A measured size, or `None` while the container has no layout yet.
fn laid_out(width: f64, height: f64) -> Option<(f64, f64)> {
    (width > 0.0 && height > 0.0).then_some((width, height))
}

/// Live container size, if it has been laid out.
fn live_size() -> Option<(f64, f64)> {
    let rect = coords::container_rect(MAP_CONTAINER_ID)?;
    laid_out(rect.width(), rect.height())
}

fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Whole zoom levels gained by a pinch that went from `start` to `current`
/// finger spacing. Each doubling of the spacing is one level.
fn pinch_zoom_steps(start: f64, current: f64) -> i32 {
    if start < 1.0 || current < 1.0 {
        return 0;
    }
    (current / start).log2().round() as i32
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Zoom in or out one level around the container center.
fn step_zoom(viewport: &mut Signal<Viewport>, size: (f64, f64), step: i32) {
    let current = *viewport.read();
    let new_zoom = geo::clamp_zoom(i32::from(current.zoom) + step);
    let center = (size.0 / 2.0, size.1 / 2.0);
    viewport.set(geo::zoom_at(&current, new_zoom, center, size.0, size.1));
}

// ---------------------------------------------------------------------------
// SVG builder
// ---------------------------------------------------------------------------

/// Build the marker overlay. Coordinates are container pixels, so marker
/// radius stays constant across zoom levels. Off-screen markers are omitted.
fn build_marker_svg(markers: &LayerGroup, viewport: &Viewport, width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(256 + markers.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" style="position:absolute;top:0;left:0;pointer-events:none;">"#
    ));
    let positions = coords::marker_screen_positions(markers, viewport, width, height);
    for (marker, (cx, cy)) in markers.iter().zip(positions) {
        let margin = marker.style.radius + marker.style.weight;
        if cx < -margin || cy < -margin || cx > width + margin || cy > height + margin {
            continue;
        }
        build_circle(&mut svg, marker, cx, cy);
    }
    svg.push_str("</svg>");
    svg
}

fn build_circle(svg: &mut String, marker: &CircleMarker, cx: f64, cy: f64) {
    let r = marker.style.radius;
    let fill = marker.fill_color;
    let opacity = marker.style.fill_opacity;
    let stroke = if marker.style.stroke {
        format!(
            r#" stroke="{}" stroke-width="{}""#,
            marker.style.stroke_color, marker.style.weight
        )
    } else {
        String::new()
    };
    svg.push_str(&format!(
        r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}" fill-opacity="{opacity}"{stroke}/>"#
    ));
}

/// Marker under a client-coordinate click or tap, if any.
fn marker_at_client(
    markers: &LayerGroup,
    viewport: &Viewport,
    size: (f64, f64),
    client: (f64, f64),
) -> Option<usize> {
    let click = coords::client_to_container_px(client.0, client.1, MAP_CONTAINER_ID)?;
    coords::hit_test(markers, viewport, size.0, size.1, click)
}

/// Popup anchor (just above the marker) and content for an open popup.
struct OpenPopup {
    left: f64,
    top: f64,
    label: String,
    html: String,
}

fn open_popup_at(
    markers: &LayerGroup,
    index: usize,
    viewport: &Viewport,
    width: f64,
    height: f64,
) -> Option<OpenPopup> {
    let marker = markers.get(index)?;
    let (x, y) = geo::to_screen(marker.position, viewport, width, height);
    Some(OpenPopup {
        left: x,
        top: y - marker.style.radius - marker.style.weight,
        label: marker.label.clone(),
        html: marker.popup_html.clone(),
    })
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(org_map: Signal<OrgMap>, viewport: Signal<Viewport>) -> Element {
    let mut size = use_signal(|| FALLBACK_SIZE);
    let mut open_popup = use_signal(|| None::<usize>);
    let mut wheel_accum = use_signal(|| 0.0_f64);

    // Drag state (mouse)
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut drag_start_view = use_signal(|| *viewport.peek());

    // Touch state
    let mut touch_start_pos = use_signal(|| None::<(f64, f64)>);
    let mut touch_did_pan = use_signal(|| false);
    let mut touch_start_view = use_signal(|| *viewport.peek());
    let mut is_pinching = use_signal(|| false);
    let mut pinch_start_distance = use_signal(|| 0.0_f64);
    let mut pinch_midpoint = use_signal(|| (0.0_f64, 0.0_f64));

    // The layer is rebuilt wholesale on every filter or theme change, which
    // invalidates popup indices.
    use_effect(move || {
        let _ = org_map.read().markers().len();
        open_popup.set(None);
    });

    // Memoized: recomputes on marker, view or size changes only.
    let svg_html = use_memo(move || {
        let map = org_map.read();
        let vp = *viewport.read();
        let (w, h) = *size.read();
        build_marker_svg(map.markers(), &vp, w, h)
    });

    let vp = *viewport.read();
    let (width, height) = *size.read();
    let (tile_layer, popup) = {
        let map = org_map.read();
        let popup = (*open_popup.read())
            .and_then(|i| open_popup_at(map.markers(), i, &vp, width, height));
        (map.theme().config().tiles, popup)
    };
    let tiles = geo::visible_tiles(&vp, width, height);

    let container_class = if *is_dragging.read() && *did_drag.read() {
        "map-container dragging"
    } else {
        "map-container"
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_| {
                if let Some(s) = live_size() {
                    size.set(s);
                }
            },

            // Also fires once when observation starts, after styles are applied
            onresize: move |evt: Event<ResizeData>| {
                let measured = evt
                    .data()
                    .get_border_box_size()
                    .ok()
                    .and_then(|s| laid_out(s.width, s.height))
                    .or_else(live_size);
                if let Some(s) = measured {
                    if *size.peek() != s {
                        size.set(s);
                    }
                }
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();

                let total = *wheel_accum.read() + wheel_delta_y(evt.data().delta());
                if total.abs() < WHEEL_STEP {
                    wheel_accum.set(total);
                    return;
                }
                wheel_accum.set(0.0);

                let Some(rect) = coords::container_rect(MAP_CONTAINER_ID) else { return };
                let client = evt.data().client_coordinates();
                let cursor = coords::client_to_container(client.x, client.y, rect.left(), rect.top());
                let step = if total < 0.0 { 1 } else { -1 };
                let old = *viewport.read();
                let new_zoom = geo::clamp_zoom(i32::from(old.zoom) + step);

                size.set((rect.width(), rect.height()));
                viewport.set(geo::zoom_at(&old, new_zoom, cursor, rect.width(), rect.height()));
            },

            onmousedown: move |evt: Event<MouseData>| {
                // Only track drag/click for left mouse button
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                if let Some(s) = live_size() {
                    size.set(s);
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                drag_start_view.set(*viewport.read());
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let (sx, sy) = *drag_start.read();
                let dx = client.x - sx;
                let dy = client.y - sy;

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let start = *drag_start_view.read();
                    viewport.set(geo::pan_by(&start, dx, dy));
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                // A mouseup without drag movement = a click: open the popup
                // of the marker under the cursor, or close any open popup.
                if was_dragging && !was_drag {
                    let client = evt.client_coordinates();
                    let vp = *viewport.read();
                    let hit = marker_at_client(org_map.read().markers(), &vp, *size.read(), (client.x, client.y));
                    open_popup.set(hit);
                }
            },

            onmouseleave: move |_| is_dragging.set(false),

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                if let Some(s) = live_size() {
                    size.set(s);
                }
                let touches = evt.data().touches();
                if touches.len() == 1 {
                    // Single finger: tap or pan
                    let t = touches[0].client_coordinates();
                    touch_start_pos.set(Some((t.x, t.y)));
                    touch_did_pan.set(false);
                    touch_start_view.set(*viewport.read());
                } else if touches.len() >= 2 {
                    let p0 = touches[0].client_coordinates();
                    let p1 = touches[1].client_coordinates();
                    let (p0, p1) = ((p0.x, p0.y), (p1.x, p1.y));
                    is_pinching.set(true);
                    pinch_start_distance.set(point_distance(p0, p1));
                    pinch_midpoint.set(((p0.0 + p1.0) / 2.0, (p0.1 + p1.1) / 2.0));
                    touch_start_view.set(*viewport.read());
                    // Cancel any tap tracking
                    touch_start_pos.set(None);
                    touch_did_pan.set(true);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();

                if *is_pinching.read() && touches.len() >= 2 {
                    let p0 = touches[0].client_coordinates();
                    let p1 = touches[1].client_coordinates();
                    let steps = pinch_zoom_steps(
                        *pinch_start_distance.read(),
                        point_distance((p0.x, p0.y), (p1.x, p1.y)),
                    );
                    let start = *touch_start_view.read();
                    let new_zoom = geo::clamp_zoom(i32::from(start.zoom) + steps);
                    if new_zoom == viewport.read().zoom {
                        return;
                    }
                    let Some(rect) = coords::container_rect(MAP_CONTAINER_ID) else { return };
                    let mid = *pinch_midpoint.read();
                    let cursor = coords::client_to_container(mid.0, mid.1, rect.left(), rect.top());
                    viewport.set(geo::zoom_at(&start, new_zoom, cursor, rect.width(), rect.height()));
                } else if touches.len() == 1 {
                    let t = touches[0].client_coordinates();
                    let cur = (t.x, t.y);
                    let Some(start) = *touch_start_pos.read() else { return };
                    if !*touch_did_pan.read() && point_distance(start, cur) > TOUCH_DRAG_THRESHOLD {
                        touch_did_pan.set(true);
                    }
                    if *touch_did_pan.read() {
                        let view = *touch_start_view.read();
                        viewport.set(geo::pan_by(&view, cur.0 - start.0, cur.1 - start.1));
                    }
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let remaining = evt.data().touches().len();

                if *is_pinching.read() {
                    // Wait for all fingers to lift before resetting pinch state
                    if remaining == 0 {
                        is_pinching.set(false);
                        touch_start_pos.set(None);
                    }
                    return;
                }

                if remaining == 0 && !*touch_did_pan.read() {
                    if let Some(start) = *touch_start_pos.read() {
                        let vp = *viewport.read();
                        let hit = marker_at_client(org_map.read().markers(), &vp, *size.read(), start);
                        open_popup.set(hit);
                    }
                }

                if remaining == 0 {
                    touch_start_pos.set(None);
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                touch_start_pos.set(None);
                touch_did_pan.set(false);
                is_pinching.set(false);
            },

            div { class: "tile-layer",
                for t in tiles {
                    img {
                        key: "{t.coord.z}/{t.col}/{t.coord.y}",
                        class: "map-tile",
                        src: tile_layer.url(t.coord),
                        alt: "",
                        draggable: "false",
                        style: "left: {t.left}px; top: {t.top}px;",
                    }
                }
            }

            div {
                class: "marker-layer",
                dangerous_inner_html: "{svg_html}",
            }

            if let Some(p) = popup {
                div {
                    class: "map-popup",
                    style: "left: {p.left}px; top: {p.top}px;",
                    "aria-label": "{p.label}",
                    ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                    ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
                    onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                    onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
                    button {
                        class: "popup-close",
                        "aria-label": "Close popup",
                        onclick: move |_| open_popup.set(None),
                        "×"
                    }
                    div { class: "popup-content", dangerous_inner_html: "{p.html}" }
                    div { class: "popup-tip" }
                }
            }

            div {
                class: "zoom-controls",
                ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
                onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
                button {
                    "aria-label": "Zoom in",
                    disabled: vp.zoom >= geo::ZOOM_MAX,
                    onclick: move |_| step_zoom(&mut viewport, *size.read(), 1),
                    "+"
                }
                button {
                    "aria-label": "Zoom out",
                    disabled: vp.zoom <= geo::ZOOM_MIN,
                    onclick: move |_| step_zoom(&mut viewport, *size.read(), -1),
                    "−"
                }
            }

            div {
                class: "map-attribution",
                ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
                onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
                dangerous_inner_html: tile_layer.attribution,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partner_map_shared::layer::MarkerStyle;
    use partner_map_shared::models::LatLng;
    use partner_map_shared::theme::Theme;

    const VIEW: Viewport = Viewport {
        center: LatLng::new(56.0, -98.5),
        zoom: 4,
    };

    fn marker_at(lat: f64, lng: f64, style: MarkerStyle) -> CircleMarker {
        CircleMarker {
            position: LatLng::new(lat, lng),
            fill_color: "#8DD3C7",
            style,
            label: "A".to_string(),
            popup_html: "<b>A</b>".to_string(),
        }
    }

    #[test]
    fn test_svg_one_circle_per_visible_marker() {
        let style = Theme::Light.config().marker;
        let mut layer = LayerGroup::default();
        layer.add(marker_at(56.0, -98.5, style));
        layer.add(marker_at(49.3, -123.1, style));
        let svg = build_marker_svg(&layer, &VIEW, 960.0, 640.0);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_svg_circle_uses_marker_style() {
        let style = Theme::Light.config().marker;
        let mut layer = LayerGroup::default();
        layer.add(marker_at(56.0, -98.5, style));
        let svg = build_marker_svg(&layer, &VIEW, 800.0, 600.0);
        assert!(svg.contains(r##"r="6" fill="#8DD3C7" fill-opacity="1" stroke="black" stroke-width="2"/>"##));
    }

    #[test]
    fn test_svg_without_stroke() {
        let style = MarkerStyle {
            stroke: false,
            ..Theme::Light.config().marker
        };
        let mut layer = LayerGroup::default();
        layer.add(marker_at(56.0, -98.5, style));
        let svg = build_marker_svg(&layer, &VIEW, 800.0, 600.0);
        assert!(!svg.contains("stroke="));
    }

    #[test]
    fn test_svg_skips_offscreen_markers() {
        let style = Theme::Light.config().marker;
        let mut layer = LayerGroup::default();
        // Sydney is far outside a North America view
        layer.add(marker_at(-33.9, 151.2, style));
        let svg = build_marker_svg(&layer, &VIEW, 800.0, 600.0);
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn test_svg_empty_layer() {
        let svg = build_marker_svg(&LayerGroup::default(), &VIEW, 800.0, 600.0);
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_open_popup_sits_above_marker() {
        let style = Theme::Light.config().marker;
        let mut layer = LayerGroup::default();
        layer.add(marker_at(56.0, -98.5, style));
        let popup = open_popup_at(&layer, 0, &VIEW, 800.0, 600.0).unwrap();
        assert!((popup.left - 400.0).abs() < 1e-6);
        assert!((popup.top - (300.0 - 6.0 - 2.0)).abs() < 1e-6);
        assert_eq!(popup.html, "<b>A</b>");
    }

    #[test]
    fn test_laid_out_rejects_unmeasured_container() {
        assert_eq!(laid_out(0.0, 480.0), None);
        assert_eq!(laid_out(640.0, 0.0), None);
        assert_eq!(laid_out(1280.0, 720.0), Some((1280.0, 720.0)));
    }

    #[test]
    fn test_resized_container_recenters_view() {
        // The view center lands in the middle of whatever size was measured last
        let style = Theme::Light.config().marker;
        let mut layer = LayerGroup::default();
        layer.add(marker_at(56.0, -98.5, style));
        let popup = open_popup_at(&layer, 0, &VIEW, 1280.0, 720.0).unwrap();
        assert!((popup.left - 640.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_distance() {
        assert!((point_distance((0.0, 0.0), (3.0, 4.0)) - 5.0).abs() < 1e-9);
        assert!(point_distance((1.0, 1.0), (1.0, 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_zoom_steps() {
        assert_eq!(pinch_zoom_steps(100.0, 100.0), 0);
        assert_eq!(pinch_zoom_steps(100.0, 200.0), 1);
        assert_eq!(pinch_zoom_steps(100.0, 410.0), 2);
        assert_eq!(pinch_zoom_steps(200.0, 100.0), -1);
        // small jitter does not change zoom
        assert_eq!(pinch_zoom_steps(100.0, 120.0), 0);
    }

    #[test]
    fn test_pinch_zoom_steps_degenerate_start() {
        assert_eq!(pinch_zoom_steps(0.0, 150.0), 0);
        assert_eq!(pinch_zoom_steps(150.0, 0.0), 0);
    }

    #[test]
    fn test_open_popup_stale_index() {
        let layer = LayerGroup::default();
        assert!(open_popup_at(&layer, 3, &VIEW, 800.0, 600.0).is_none());
    }
}
