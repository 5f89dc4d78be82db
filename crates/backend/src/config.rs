use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Built frontend bundle (`index.html`, `assets/`, `wasm/`).
    pub dist_dir: PathBuf,
    pub data_path: PathBuf,
}

impl ServerConfig {
    /// Read `PORT`, `DIST_DIR` and `DATA_PATH`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid PORT, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };
        ServerConfig {
            port,
            dist_dir: PathBuf::from(lookup("DIST_DIR").unwrap_or_else(|| "dist".to_string())),
            data_path: PathBuf::from(
                lookup("DATA_PATH").unwrap_or_else(|| "data/partner_orgs.json".to_string()),
            ),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
