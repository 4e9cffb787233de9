use crate::config::ListingConfig;
use crate::url::ListingUrls;
use chrono::{Datelike, NaiveDate};

/// Builds listing URLs from the configured server address and reports path
///
/// The listing for a day is addressed as
/// `{server_address}{reports_path}{year},{month},{day},{page}` with no zero
/// padding, e.g. `http://biznes.pap.pl/pl/reports/espi/term,2015,9,14,1`.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    server_address: String,
    reports_path: String,
}

impl UrlBuilder {
    pub fn new(server_address: impl Into<String>, reports_path: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            reports_path: reports_path.into(),
        }
    }

    pub fn from_config(config: &ListingConfig) -> Self {
        Self::new(config.server_address.clone(), config.reports_path.clone())
    }
}

impl ListingUrls for UrlBuilder {
    fn listing_url(&self, date: NaiveDate, page: u32) -> String {
        format!(
            "{}{}{},{},{},{}",
            self.server_address,
            self.reports_path,
            date.year(),
            date.month(),
            date.day(),
            page
        )
    }

    fn server_prefix(&self) -> &str {
        &self.server_address
    }
}
