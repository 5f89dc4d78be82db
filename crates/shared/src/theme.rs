use crate::geo::TileCoord;
use crate::layer::MarkerStyle;
use crate::palette::{self, Palette};

/// XYZ raster tile source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayer {
    /// Template with `{s}`, `{z}`, `{x}`, `{y}` and optional `{r}` placeholders.
    pub url_template: &'static str,
    /// HTML attribution shown in the map corner.
    pub attribution: &'static str,
    pub subdomains: &'static [&'static str],
}

impl TileLayer {
    pub fn url(&self, coord: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            // Spread requests across hosts deterministically
            let idx = (coord.x as usize + coord.y as usize) % self.subdomains.len();
            self.subdomains[idx]
        };
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{r}", "")
    }
}

const CARTO_ATTRIBUTION: &str = r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors &copy; <a href="https://carto.com/attributions">CARTO</a>"#;

const CARTO_LIGHT: TileLayer = TileLayer {
    url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
    attribution: CARTO_ATTRIBUTION,
    subdomains: &["a", "b", "c", "d"],
};

const CARTO_DARK: TileLayer = TileLayer {
    url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
    attribution: CARTO_ATTRIBUTION,
    subdomains: &["a", "b", "c", "d"],
};

const OSM_STANDARD: TileLayer = TileLayer {
    url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
    attribution: r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#,
    subdomains: &[],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Street,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Street];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Street => "Street",
        }
    }

    pub fn config(self) -> &'static ThemeConfig {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
            Theme::Street => &STREET,
        }
    }
}

/// Everything that differs between map variants.
#[derive(Debug, PartialEq)]
pub struct ThemeConfig {
    pub palette: Palette,
    pub marker: MarkerStyle,
    pub tiles: TileLayer,
}

const LIGHT: ThemeConfig = ThemeConfig {
    palette: palette::PASTEL,
    marker: MarkerStyle {
        radius: 6.0,
        stroke: true,
        stroke_color: "black",
        weight: 2.0,
        fill_opacity: 1.0,
    },
    tiles: CARTO_LIGHT,
};

const DARK: ThemeConfig = ThemeConfig {
    palette: palette::BRIGHT,
    marker: MarkerStyle {
        radius: 6.0,
        stroke: true,
        stroke_color: "white",
        weight: 1.5,
        fill_opacity: 0.9,
    },
    tiles: CARTO_DARK,
};

const STREET: ThemeConfig = ThemeConfig {
    palette: palette::SATURATED,
    marker: MarkerStyle {
        radius: 8.0,
        stroke: true,
        stroke_color: "#333333",
        weight: 2.0,
        fill_opacity: 0.85,
    },
    tiles: OSM_STANDARD,
};
