//! Pagination walker for a single listing date
//!
//! Page 1 of a date's listing is fetched first and is the only page whose
//! pagination marker is read. Every page from 1 to the discovered total is
//! then scanned row by row. Rows are listed newest first, so the first stale
//! row ends the scan of its page; the walk still moves on to the next page.

use crate::config::MalformedRowPolicy;
use crate::crawler::extractor::{Extraction, ListingSelectors, RecordExtractor};
use crate::crawler::source::PageSource;
use crate::report::Report;
use crate::url::ListingUrls;
use crate::WatchError;
use chrono::{NaiveDate, NaiveTime};
use scraper::Html;

/// Everything collected while walking one date
#[derive(Debug, Clone, Default)]
pub struct DateWalk {
    /// Reports in page order
    pub reports: Vec<Report>,

    /// Number of pages walked
    pub pages: u32,

    /// Number of rows that could not be parsed
    pub malformed: usize,

    /// The last listing URL fetched
    pub last_url: String,
}

/// Rows and marker found on one fetched page
struct PageScan {
    reports: Vec<Report>,
    malformed: usize,
    total_pages: Option<u32>,
}

/// Walks all listing pages of one date
pub struct PaginationWalker<'a> {
    source: &'a dyn PageSource,
    urls: &'a dyn ListingUrls,
    selectors: &'a ListingSelectors,
    malformed_rows: MalformedRowPolicy,
}

impl<'a> PaginationWalker<'a> {
    pub fn new(
        source: &'a dyn PageSource,
        urls: &'a dyn ListingUrls,
        selectors: &'a ListingSelectors,
        malformed_rows: MalformedRowPolicy,
    ) -> Self {
        Self {
            source,
            urls,
            selectors,
            malformed_rows,
        }
    }

    /// Collects the reports of `date` published after `watermark_time`
    ///
    /// # Returns
    ///
    /// * `Ok(DateWalk)` - Reports from every page of the date
    /// * `Err(WatchError)` - A page could not be fetched
    pub async fn walk_date(
        &self,
        date: NaiveDate,
        watermark_time: NaiveTime,
    ) -> Result<DateWalk, WatchError> {
        let mut walk = DateWalk::default();
        let mut total_pages: Option<u32> = None;
        let mut page = 1;

        loop {
            let url = self.urls.listing_url(date, page);
            tracing::debug!("Fetching listing page {}", url);

            let body = self.source.fetch(&url).await?;
            let scan = self.scan_page(&body, &url, date, watermark_time, total_pages.is_none());

            if total_pages.is_none() {
                total_pages = Some(scan.total_pages.unwrap_or(1));
            }

            walk.reports.extend(scan.reports);
            walk.malformed += scan.malformed;
            walk.pages = page;
            walk.last_url = url;

            if page >= total_pages.unwrap_or(1) {
                break;
            }
            page += 1;
        }

        Ok(walk)
    }

    fn scan_page(
        &self,
        body: &str,
        url: &str,
        date: NaiveDate,
        watermark_time: NaiveTime,
        first_page: bool,
    ) -> PageScan {
        let document = Html::parse_document(body);
        let extractor = RecordExtractor::new(self.selectors, self.urls.server_prefix());

        let total_pages = first_page.then(|| count_pages(&document, self.selectors, url));
        let mut reports = Vec::new();
        let mut malformed = 0;

        for row in document.select(&self.selectors.rows) {
            match extractor.extract(row, date, watermark_time) {
                Extraction::Report(report) => reports.push(report),
                Extraction::Stale => {
                    tracing::debug!("Reached already reported rows on {}", url);
                    break;
                }
                Extraction::Malformed(reason) => {
                    malformed += 1;
                    tracing::warn!("Malformed report row on {}: {}", url, reason);
                    if self.malformed_rows == MalformedRowPolicy::Placeholder {
                        reports.push(Report::default());
                    }
                }
            }
        }

        PageScan {
            reports,
            malformed,
            total_pages,
        }
    }
}

/// Reads the total page count from the pagination marker, defaulting to 1
fn count_pages(document: &Html, selectors: &ListingSelectors, url: &str) -> u32 {
    let Some(marker) = document.select(&selectors.pagination).nth(1) else {
        tracing::debug!("No pagination marker on {}, assuming a single page", url);
        return 1;
    };

    let text = marker.text().collect::<String>();
    match text.trim().parse::<u32>() {
        Ok(pages) if pages >= 1 => pages,
        Ok(pages) => {
            tracing::warn!("Pagination marker on {} reports {} pages", url, pages);
            1
        }
        Err(e) => {
            tracing::warn!(
                "Error when parsing number of pages from value '{}' from page {}: {}",
                text,
                url,
                e
            );
            1
        }
    }
}
