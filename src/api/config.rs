pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DEFAULTS_PATH: &str = "/assets/defaults";
pub const API_URL_ENV: &str = "SIMULATION_API_URL";

const SIMULATE_PATH: &str = "/simulate";
const HEALTH_PATH: &str = "/";

/// Where the simulation service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    defaults_path: String,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            defaults_path: DEFAULT_DEFAULTS_PATH.to_string(),
        }
    }

    pub fn with_defaults_path(mut self, path: &str) -> Self {
        let path = path.trim();
        self.defaults_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn defaults_url(&self) -> String {
        format!("{}{}", self.base_url, self.defaults_path)
    }

    pub fn simulate_url(&self) -> String {
        format!("{}{}", self.base_url, SIMULATE_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
