/// Static category -> color table with a fallback for anything unlisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub colors: &'static [(&'static str, &'static str)],
    pub default: &'static str,
}

impl Palette {
    /// Resolve the display color for a category. Never fails: categories that
    /// are not in the table get `self.default`.
    pub fn color_for(&self, category: &str) -> &'static str {
        self.colors
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, color)| *color)
            .unwrap_or(self.default)
    }
}

/// ColorBrewer Set3 tones, used by the light basemap.
pub const PASTEL: Palette = Palette {
    colors: &[
        ("Academic", "#8DD3C7"),
        ("Health System", "#B3DE69"),
        ("Government", "#BEBADA"),
        ("Industry", "#FB8072"),
        ("GPO", "#80B1D3"),
        ("Citizens", "#FDB462"),
    ],
    default: "grey",
};

/// Higher-luminance tones that stay readable on the dark basemap.
pub const BRIGHT: Palette = Palette {
    colors: &[
        ("Academic", "#66C2A5"),
        ("Health System", "#A6D854"),
        ("Government", "#8DA0CB"),
        ("Industry", "#FC8D62"),
        ("GPO", "#E78AC3"),
        ("Citizens", "#FFD92F"),
    ],
    default: "#B3B3B3",
};

/// ColorBrewer Set1, for the busy OpenStreetMap basemap.
pub const SATURATED: Palette = Palette {
    colors: &[
        ("Academic", "#377EB8"),
        ("Health System", "#4DAF4A"),
        ("Government", "#984EA3"),
        ("Industry", "#E41A1C"),
        ("GPO", "#FF7F00"),
        ("Citizens", "#A65628"),
    ],
    default: "#999999",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories_resolve() {
        assert_eq!(PASTEL.color_for("Academic"), "#8DD3C7");
        assert_eq!(PASTEL.color_for("Health System"), "#B3DE69");
        assert_eq!(PASTEL.color_for("Citizens"), "#FDB462");
    }

    #[test]
    fn test_unknown_category_gets_default() {
        assert_eq!(PASTEL.color_for("Nonprofit"), "grey");
        assert_eq!(PASTEL.color_for(""), "grey");
        assert_eq!(BRIGHT.color_for("Nonprofit"), BRIGHT.default);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(PASTEL.color_for("academic"), "grey");
    }

    #[test]
    fn test_palettes_cover_same_categories() {
        for (name, _) in PASTEL.colors {
            assert_ne!(BRIGHT.color_for(name), BRIGHT.default, "{name} missing from BRIGHT");
            assert_ne!(SATURATED.color_for(name), SATURATED.default, "{name} missing from SATURATED");
        }
    }
}
