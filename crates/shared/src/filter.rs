use std::collections::HashSet;

use crate::models::OrgRecord;
use crate::palette::Palette;

/// Distinct categories in order of first appearance.
pub fn distinct_categories(records: &[OrgRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.category.as_str()))
        .map(|r| r.category.clone())
        .collect()
}

/// One checkbox in the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFilter {
    pub category: String,
    pub color: &'static str,
    pub checked: bool,
}

/// Checkbox state for every category seen at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPanel {
    entries: Vec<CategoryFilter>,
}

impl FilterPanel {
    /// One entry per distinct category, all checked.
    pub fn build(records: &[OrgRecord], palette: &Palette) -> Self {
        let entries = distinct_categories(records)
            .into_iter()
            .map(|category| CategoryFilter {
                color: palette.color_for(&category),
                category,
                checked: true,
            })
            .collect();
        FilterPanel { entries }
    }

    pub fn entries(&self) -> &[CategoryFilter] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-resolve swatch colors after a palette change. Checked state is kept.
    pub fn recolor(&mut self, palette: &Palette) {
        for entry in &mut self.entries {
            entry.color = palette.color_for(&entry.category);
        }
    }

    /// Make the panel mirror the full list of checked inputs: every category in
    /// `checked` is on, every other category is off. Unknown names are ignored.
    pub fn apply_selection<I, S>(&mut self, checked: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let checked: HashSet<String> = checked
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        for entry in &mut self.entries {
            entry.checked = checked.contains(&entry.category);
        }
    }

    /// Set a single category. Returns false if the category is not in the panel.
    pub fn set_checked(&mut self, category: &str, checked: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.category == category) {
            Some(entry) => {
                entry.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn is_visible(&self, category: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.checked && e.category == category)
    }

    pub fn checked_categories(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.checked)
            .map(|e| e.category.as_str())
            .collect()
    }

    /// Records whose category is currently checked, in input order.
    pub fn filter<'a>(&self, records: &'a [OrgRecord]) -> Vec<&'a OrgRecord> {
        let visible: HashSet<&str> = self.checked_categories().into_iter().collect();
        records
            .iter()
            .filter(|r| visible.contains(r.category.as_str()))
            .collect()
    }
}
