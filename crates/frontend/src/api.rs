use partner_map_shared::data::{self, DataError};
use partner_map_shared::models::OrgRecord;

/// Resolve the data file path the way the browser resolves a relative link:
/// relative paths sit next to the current page, rooted paths hang off the
/// origin, absolute URLs pass through.
pub fn resolve_data_url(page_url: &str, path: &str) -> Result<String, DataError> {
    let base = reqwest::Url::parse(page_url)
        .map_err(|e| DataError::Fetch(format!("invalid page URL {page_url}: {e}")))?;
    let url = base
        .join(path)
        .map_err(|e| DataError::Fetch(format!("invalid data path {path}: {e}")))?;
    Ok(url.to_string())
}

fn page_href() -> Result<String, DataError> {
    let window = web_sys::window().ok_or_else(|| DataError::Fetch("no window".to_string()))?;
    window
        .location()
        .href()
        .map_err(|_| DataError::Fetch("page URL unavailable".to_string()))
}

/// Fetch and parse the partner list. One request, no retry.
pub async fn fetch_partner_orgs(path: &str) -> Result<Vec<OrgRecord>, DataError> {
    let url = resolve_data_url(&page_href()?, path)?;

    let resp = reqwest::get(&url)
        .await
        .map_err(|e| DataError::Fetch(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DataError::Status(status.as_u16()));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| DataError::Fetch(e.to_string()))?;
    data::parse_records(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path_at_site_root() {
        assert_eq!(
            resolve_data_url("http://localhost:3000/", "partner_orgs.json").unwrap(),
            "http://localhost:3000/partner_orgs.json"
        );
    }

    #[test]
    fn test_resolve_relative_path_under_sub_path() {
        assert_eq!(
            resolve_data_url("https://example.org/maps/partners/index.html?view=2#top", "partner_orgs.json")
                .unwrap(),
            "https://example.org/maps/partners/partner_orgs.json"
        );
        assert_eq!(
            resolve_data_url("https://example.org/maps/partners/", "partner_orgs.json").unwrap(),
            "https://example.org/maps/partners/partner_orgs.json"
        );
    }

    #[test]
    fn test_resolve_rooted_path_uses_origin() {
        assert_eq!(
            resolve_data_url("https://example.org/maps/index.html", "/partner_orgs.json").unwrap(),
            "https://example.org/partner_orgs.json"
        );
    }

    #[test]
    fn test_resolve_absolute_url_passes_through() {
        assert_eq!(
            resolve_data_url("http://localhost:3000/", "https://cdn.example.org/orgs.json").unwrap(),
            "https://cdn.example.org/orgs.json"
        );
    }

    #[test]
    fn test_resolve_invalid_page_url() {
        let err = resolve_data_url("not a url", "partner_orgs.json").unwrap_err();
        assert!(matches!(err, DataError::Fetch(_)));
    }
}
