//! Page source abstraction
//!
//! The crawl core only needs one capability from the outside world: given a
//! listing URL, return the page's HTML. `HttpPageSource` does this over the
//! network; `StaticPageSource` serves pages registered in memory.

use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Something that can fetch a listing page by URL
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the HTML body of the page at `url`
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Page source serving fixed pages from memory
///
/// Unknown URLs fail with `FetchError::NotFound`. Every requested URL is
/// recorded in order, including failed ones.
#[derive(Debug, Default)]
pub struct StaticPageSource {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `html` as the body served for `url`
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// URLs requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }
}
