//! Incremental check coordinator
//!
//! `ReportWatcher` owns the last-check watermark. Each check captures a
//! threshold from the clock, then walks one calendar day at a time from the
//! watermark's date up to the threshold's date:
//! - Every day is walked with the watermark's time of day as the stale cutoff
//! - Finishing a day before the threshold date moves the watermark to the
//!   start of the next day without persisting it
//! - Finishing the threshold date moves the watermark to the threshold and
//!   persists it
//!
//! A failure part way through stops the check; the reports collected so far
//! are still returned and the failure is only logged.

use crate::checkpoint::{CheckpointStore, JsonFileStore};
use crate::config::{Config, MalformedRowPolicy};
use crate::crawler::clock::{Clock, SystemClock};
use crate::crawler::extractor::ListingSelectors;
use crate::crawler::fetcher::HttpPageSource;
use crate::crawler::paginator::PaginationWalker;
use crate::crawler::source::PageSource;
use crate::report::Report;
use crate::url::{ListingUrls, UrlBuilder};
use crate::WatchError;
use chrono::{NaiveDateTime, NaiveTime};

/// Returns reports published since the last successful check
pub struct ReportWatcher {
    source: Box<dyn PageSource>,
    urls: Box<dyn ListingUrls>,
    store: Box<dyn CheckpointStore>,
    clock: Box<dyn Clock>,
    selectors: ListingSelectors,
    malformed_rows: MalformedRowPolicy,
    last_check: NaiveDateTime,
}

impl ReportWatcher {
    /// Creates a watcher whose watermark is loaded from `store`
    pub fn new(
        source: Box<dyn PageSource>,
        urls: Box<dyn ListingUrls>,
        store: Box<dyn CheckpointStore>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, WatchError> {
        let last_check = store.load();
        tracing::info!("Last reports check at {}", last_check);

        Ok(Self {
            source,
            urls,
            store,
            clock,
            selectors: ListingSelectors::new()?,
            malformed_rows: MalformedRowPolicy::default(),
            last_check,
        })
    }

    /// Creates a watcher for the live listing described by `config`
    pub fn from_config(config: &Config) -> Result<Self, WatchError> {
        let watcher = Self::new(
            Box::new(HttpPageSource::from_config(config)?),
            Box::new(UrlBuilder::from_config(&config.listing)),
            Box::new(JsonFileStore::new(&config.checkpoint.path)),
            Box::new(SystemClock),
        )?;
        Ok(watcher.with_malformed_rows(config.checkpoint.malformed_rows))
    }

    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }

    /// The current watermark
    pub fn last_check(&self) -> NaiveDateTime {
        self.last_check
    }

    /// Overrides the watermark for the next check without persisting it
    pub fn set_last_check(&mut self, timestamp: NaiveDateTime) {
        self.last_check = timestamp;
    }

    /// Returns every report published after the watermark, oldest day first
    ///
    /// Never fails. If a page cannot be fetched or the checkpoint cannot be
    /// written, the check stops and the reports gathered so far are returned.
    pub async fn reports_since_last_check(&mut self) -> Vec<Report> {
        let threshold = self.clock.now();
        let mut reports = Vec::new();

        match self.catch_up(threshold, &mut reports).await {
            Ok(()) => tracing::info!(
                "Check complete: {} new reports, last check now {}",
                reports.len(),
                self.last_check
            ),
            Err(e) => tracing::error!(
                "Check aborted: {}. Number of parsed reports {}",
                e,
                reports.len()
            ),
        }

        reports
    }

    async fn catch_up(
        &mut self,
        threshold: NaiveDateTime,
        reports: &mut Vec<Report>,
    ) -> Result<(), WatchError> {
        while self.last_check < threshold {
            let date = self.last_check.date();
            let walk = PaginationWalker::new(
                self.source.as_ref(),
                self.urls.as_ref(),
                &self.selectors,
                self.malformed_rows,
            )
            .walk_date(date, self.last_check.time())
            .await?;

            tracing::info!(
                "{} reports parsed from {} ({} pages, last {})",
                walk.reports.len(),
                date,
                walk.pages,
                walk.last_url
            );
            if walk.malformed > 0 {
                tracing::warn!("{} malformed rows on {}", walk.malformed, date);
            }
            reports.extend(walk.reports);

            if date == threshold.date() {
                self.last_check = threshold;
                self.store.save(threshold)?;
            } else {
                self.last_check = match date.succ_opt() {
                    Some(next) => next.and_time(NaiveTime::MIN),
                    None => threshold,
                };
            }
        }

        Ok(())
    }
}
