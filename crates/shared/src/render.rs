use crate::layer::{CircleMarker, LayerGroup};
use crate::models::OrgRecord;
use crate::theme::ThemeConfig;

/// Minimal escaping for text and attribute values placed in popup markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Popup body: bold name, plus a website link when the record has one.
pub fn popup_html(record: &OrgRecord) -> String {
    let mut html = format!("<b>{}</b>", escape_html(&record.name));
    if let Some(url) = record.website_link() {
        html.push_str(&format!(
            r#"<br><a href="{}" target="_blank">Go to website</a>"#,
            escape_html(url)
        ));
    }
    html
}

/// Replace the layer's contents with one marker per record. Records without
/// usable coordinates are skipped. Returns the number of markers drawn.
pub fn render<'a, I>(layer: &mut LayerGroup, records: I, theme: &ThemeConfig) -> usize
where
    I: IntoIterator<Item = &'a OrgRecord>,
{
    layer.clear_layers();
    for record in records {
        let Some(position) = record.position() else {
            tracing::warn!(
                name = %record.name,
                latitude = ?record.latitude,
                longitude = ?record.longitude,
                "Skipping record without valid coordinates"
            );
            continue;
        };
        layer.add(CircleMarker {
            position,
            fill_color: theme.palette.color_for(&record.category),
            style: theme.marker,
            label: record.name.clone(),
            popup_html: popup_html(record),
        });
    }
    tracing::debug!(markers = layer.len(), "Rendered marker layer");
    layer.len()
}
