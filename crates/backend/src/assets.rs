use partner_map_shared::data;
use partner_map_shared::filter::distinct_categories;
use std::path::Path;

/// The partner data file, checked once at startup and served verbatim.
pub struct PartnerData {
    pub bytes: Vec<u8>,
    pub records: usize,
    pub categories: usize,
}

impl PartnerData {
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let records = data::parse_records(&text)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

        let unplaceable = records.iter().filter(|r| r.position().is_none()).count();
        if unplaceable > 0 {
            tracing::warn!(count = unplaceable, "Partner records without valid coordinates will not be drawn");
        }
        Ok(PartnerData {
            records: records.len(),
            categories: distinct_categories(&records).len(),
            bytes: text.into_bytes(),
        })
    }
}
