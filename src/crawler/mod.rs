//! Crawler module for incremental report checks
//!
//! This module contains the core checking logic, including:
//! - Fetching listing pages (over HTTP or from memory)
//! - Extracting reports from listing rows
//! - Walking every page of one listing date
//! - Stepping the watermark day by day up to the current time

mod clock;
mod coordinator;
mod extractor;
mod fetcher;
mod paginator;
mod source;

#[cfg(test)]
pub(crate) mod fixtures;

pub use clock::{Clock, FixedClock, SystemClock};
pub use coordinator::ReportWatcher;
pub use extractor::{
    extract_report_link, normalize_company_name, Extraction, ListingSelectors, RecordExtractor,
    PAGINATION_SELECTOR, ROW_SELECTOR,
};
pub use fetcher::{build_http_client, fetch_page, HttpPageSource};
pub use paginator::{DateWalk, PaginationWalker};
pub use source::{PageSource, StaticPageSource};
