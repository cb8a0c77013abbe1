use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_RETENTION_DAYS: u64 = 7;
pub const DEFAULT_PAGE_SIZE: usize = 25;

fn default_retention_days() -> u64 {
    DEFAULT_RETENTION_DAYS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub version: u32,

    /// Dashboard backend, e.g. `http://127.0.0.1:5000`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// How long saved column visibility and sort order stay valid.
    #[serde(default = "default_retention_days")]
    pub table_state_retention_days: u64,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: 1,
            base_url: None,
            table_state_retention_days: DEFAULT_RETENTION_DAYS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ConsoleConfig {
    /// Flag/env override first, then the config file, then the default.
    pub fn resolve_base_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }
}
