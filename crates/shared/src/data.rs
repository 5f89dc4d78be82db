use crate::models::OrgRecord;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to fetch partner data: {0}")]
    Fetch(String),
    #[error("partner data request returned HTTP {0}")]
    Status(u16),
    #[error("failed to parse partner data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse the contents of `partner_orgs.json`.
pub fn parse_records(json: &str) -> Result<Vec<OrgRecord>, DataError> {
    Ok(serde_json::from_str(json)?)
}

/// The full record set. Only ever replaced wholesale; filtering reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStore {
    records: Vec<OrgRecord>,
}

impl DataStore {
    pub fn replace(&mut self, records: Vec<OrgRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[OrgRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
