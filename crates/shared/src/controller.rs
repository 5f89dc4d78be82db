use crate::data::DataStore;
use crate::filter::FilterPanel;
use crate::layer::LayerGroup;
use crate::models::OrgRecord;
use crate::render;
use crate::theme::Theme;

/// Owns the loaded records, the filter state and the marker layer.
///
/// The displayed layer always holds exactly the records whose category is
/// checked (minus any without coordinates). Every mutation below re-renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgMap {
    store: DataStore,
    filters: FilterPanel,
    markers: LayerGroup,
    theme: Theme,
    initialized: bool,
}

impl OrgMap {
    pub fn new(theme: Theme) -> Self {
        OrgMap {
            theme,
            ..Default::default()
        }
    }

    /// Load the record set, build the filters and draw everything. Only the
    /// first call takes effect.
    pub fn initialize(&mut self, records: Vec<OrgRecord>) -> bool {
        if self.initialized {
            tracing::warn!("Partner map already initialized, ignoring reload");
            return false;
        }
        self.store.replace(records);
        self.filters = FilterPanel::build(self.store.records(), &self.theme.config().palette);
        self.initialized = true;
        tracing::info!(
            records = self.store.len(),
            categories = self.filters.entries().len(),
            "Partner map initialized"
        );
        self.redraw();
        true
    }

    /// Sync with the complete set of checked boxes and redraw.
    pub fn on_filter_change<I, S>(&mut self, checked: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filters.apply_selection(checked);
        self.redraw();
    }

    /// Check or uncheck one category and redraw.
    pub fn toggle(&mut self, category: &str, checked: bool) {
        if self.filters.set_checked(category, checked) {
            self.redraw();
        }
    }

    /// Switch palette, marker style and tiles. The current selection is kept.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        self.theme = theme;
        self.filters.recolor(&theme.config().palette);
        self.redraw();
    }

    fn redraw(&mut self) {
        let visible = self.filters.filter(self.store.records());
        render::render(&mut self.markers, visible, self.theme.config());
    }

    pub fn records(&self) -> &[OrgRecord] {
        self.store.records()
    }

    pub fn filters(&self) -> &FilterPanel {
        &self.filters
    }

    pub fn markers(&self) -> &LayerGroup {
        &self.markers
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
