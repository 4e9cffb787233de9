//! URL handling module for Espi-Watch
//!
//! This module turns a listing date and page number into the URL of that
//! listing page, and exposes the server prefix that report links start with.

mod builder;

use chrono::NaiveDate;

pub use builder::UrlBuilder;

/// Source of listing page URLs
///
/// Implementations are pure: the same date and page always produce the same
/// URL. Page numbers start at 1.
pub trait ListingUrls: Send + Sync {
    /// Returns the URL of page `page` of the listing for `date`
    fn listing_url(&self, date: NaiveDate, page: u32) -> String;

    /// Returns the prefix every report link on the listing starts with
    fn server_prefix(&self) -> &str;
}
