use partner_map_shared::geo;
use partner_map_shared::layer::LayerGroup;
use partner_map_shared::models::Viewport;

/// Extra pixels around a marker that still count as a hit.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Container rect for `container_id`, read from the live DOM.
pub fn container_rect(container_id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    Some(element.get_bounding_client_rect())
}

/// Client coordinates to container-relative pixels, using web_sys.
pub fn client_to_container_px(
    client_x: f64,
    client_y: f64,
    container_id: &str,
) -> Option<(f64, f64)> {
    let rect = container_rect(container_id)?;
    Some(client_to_container(client_x, client_y, rect.left(), rect.top()))
}

/// Screen position of every marker in the layer, in layer order.
pub fn marker_screen_positions(
    markers: &LayerGroup,
    viewport: &Viewport,
    width: f64,
    height: f64,
) -> Vec<(f64, f64)> {
    markers
        .iter()
        .map(|m| geo::to_screen(m.position, viewport, width, height))
        .collect()
}

/// Index of the marker closest to `click`, if the click lands within its
/// radius plus [`HIT_TOLERANCE`].
pub fn hit_test(
    markers: &LayerGroup,
    viewport: &Viewport,
    width: f64,
    height: f64,
    click: (f64, f64),
) -> Option<usize> {
    let positions = marker_screen_positions(markers, viewport, width, height);
    let mut best: Option<(usize, f64)> = None;
    for (i, (marker, pos)) in markers.iter().zip(positions).enumerate() {
        let dx = pos.0 - click.0;
        let dy = pos.1 - click.1;
        let dist = (dx * dx + dy * dy).sqrt();
        let reach = marker.style.radius + marker.style.weight / 2.0 + HIT_TOLERANCE;
        if dist > reach {
            continue;
        }
        // `<=` so the later (top-most) marker wins exact ties
        if best.map_or(true, |(_, d)| dist <= d) {
            best = Some((i, dist));
        }
    }
    best.map(|(i, _)| i)
}
