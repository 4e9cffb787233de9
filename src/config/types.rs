use serde::Deserialize;

/// Main configuration structure for Espi-Watch
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listing: ListingConfig,
    pub checkpoint: CheckpointConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub fetch: FetchConfig,
}

/// Where the paginated report listing lives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Scheme and host of the listing server, also the prefix of report links
    #[serde(rename = "server-address")]
    pub server_address: String,

    /// Path prefix of the per-day listing, followed by `year,month,day,page`
    #[serde(rename = "reports-path")]
    pub reports_path: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            server_address: "http://biznes.pap.pl".to_string(),
            reports_path: "/pl/reports/espi/term,".to_string(),
        }
    }
}

/// Checkpoint persistence configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Path to the JSON file holding the last check timestamp
    pub path: String,

    /// What to do with rows that cannot be parsed into a report
    #[serde(rename = "malformed-rows")]
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            path: "App_Data/LastReportsCheckDateTime.json".to_string(),
            malformed_rows: MalformedRowPolicy::default(),
        }
    }
}

/// Handling of rows the extractor reports as malformed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedRowPolicy {
    /// Log the row and leave it out of the results
    #[default]
    Skip,

    /// Legacy compatibility: append an all-default report for the row
    Placeholder,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "EspiWatch".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/espi-watch".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

/// HTTP fetching behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Minimum time between two consecutive listing requests (milliseconds)
    #[serde(rename = "minimum-time-between-requests")]
    pub minimum_time_between_requests: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            minimum_time_between_requests: 500,
        }
    }
}
