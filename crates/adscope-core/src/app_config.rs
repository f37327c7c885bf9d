use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Base URL of the external ad-library API, version segment included.
    pub adlib_base_url: String,
    pub adlib_access_token: String,
    pub requests_per_hour: u32,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Records running fewer days than this are dropped by the filter.
    pub min_days_running: i64,
    pub gold_score_threshold: u32,
    pub silver_score_threshold: u32,
    pub auto_scraping_enabled: bool,
    pub max_pages_per_run: u32,
    pub page_size: u32,
    /// Country code assigned to normalized ads when a run spans multiple
    /// countries; single-country runs use the queried country instead.
    pub default_country_code: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("adlib_base_url", &self.adlib_base_url)
            .field("adlib_access_token", &"[redacted]")
            .field("requests_per_hour", &self.requests_per_hour)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("min_days_running", &self.min_days_running)
            .field("gold_score_threshold", &self.gold_score_threshold)
            .field("silver_score_threshold", &self.silver_score_threshold)
            .field("auto_scraping_enabled", &self.auto_scraping_enabled)
            .field("max_pages_per_run", &self.max_pages_per_run)
            .field("page_size", &self.page_size)
            .field("default_country_code", &self.default_country_code)
            .finish()
    }
}
