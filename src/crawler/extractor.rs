//! Report row extraction
//!
//! This module turns one report row of a listing page into a `Report`:
//! - The row's `HH:MM` time is merged with the listing date
//! - Rows at or before the watermark time are reported as stale
//! - The company name loses a trailing " SA" legal suffix
//! - The report link is cut out of the link cell's markup by server prefix
//! - The report kind is the trimmed text of the link

use crate::report::Report;
use crate::WatchError;
use chrono::{NaiveDate, NaiveTime};
use scraper::{ElementRef, Selector};

/// Report rows on a listing page
pub const ROW_SELECTOR: &str = ".espi .inf";

/// Pagination markers; the second match holds the total page count
pub const PAGINATION_SELECTOR: &str = ".stronicowanie b";

const CELL_SELECTOR: &str = "td";
const COMPANY_SELECTOR: &str = "b";
const LINK_SELECTOR: &str = "a";

const TIME_CELL: usize = 0;
const COMPANY_CELL: usize = 2;
const LINK_CELL: usize = 3;

const COMPANY_SUFFIX: &str = " SA";

/// Outcome of extracting a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The row was published after the watermark
    Report(Report),

    /// The row was published at or before the watermark
    Stale,

    /// The row could not be parsed; holds the reason
    Malformed(String),
}

/// Compiled selectors for listing pages
#[derive(Debug)]
pub struct ListingSelectors {
    pub(crate) rows: Selector,
    pub(crate) pagination: Selector,
    cells: Selector,
    company: Selector,
    link: Selector,
}

impl ListingSelectors {
    pub fn new() -> Result<Self, WatchError> {
        Ok(Self {
            rows: compile(ROW_SELECTOR)?,
            pagination: compile(PAGINATION_SELECTOR)?,
            cells: compile(CELL_SELECTOR)?,
            company: compile(COMPANY_SELECTOR)?,
            link: compile(LINK_SELECTOR)?,
        })
    }
}

fn compile(css: &str) -> Result<Selector, WatchError> {
    Selector::parse(css).map_err(|e| WatchError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Extracts reports from listing rows
pub struct RecordExtractor<'a> {
    selectors: &'a ListingSelectors,
    server_prefix: &'a str,
}

impl<'a> RecordExtractor<'a> {
    pub fn new(selectors: &'a ListingSelectors, server_prefix: &'a str) -> Self {
        Self {
            selectors,
            server_prefix,
        }
    }

    /// Extracts one report row
    ///
    /// # Arguments
    ///
    /// * `row` - The row element (one match of `ROW_SELECTOR`)
    /// * `date` - The listing date the row belongs to
    /// * `watermark_time` - Time of day already covered for this date
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use espi_watch::crawler::{Extraction, ListingSelectors, RecordExtractor, ROW_SELECTOR};
    /// use scraper::{Html, Selector};
    ///
    /// let html = Html::parse_document(r#"<table class="espi"><tr class="inf">
    ///     <td>09:33</td><td></td><td><b>Izo-Blok SA</b></td>
    ///     <td><a href="http://biznes.pap.pl/pl/reports/espi/view/1">Raport kwartalny</a></td>
    /// </tr></table>"#);
    /// let selectors = ListingSelectors::new().unwrap();
    /// let extractor = RecordExtractor::new(&selectors, "http://biznes.pap.pl");
    /// let row = html.select(&Selector::parse(ROW_SELECTOR).unwrap()).next().unwrap();
    ///
    /// let date = NaiveDate::from_ymd_opt(2015, 9, 14).unwrap();
    /// match extractor.extract(row, date, NaiveTime::MIN) {
    ///     Extraction::Report(report) => assert_eq!(report.company_name, "Izo-Blok"),
    ///     other => panic!("unexpected {:?}", other),
    /// }
    /// ```
    pub fn extract(&self, row: ElementRef<'_>, date: NaiveDate, watermark_time: NaiveTime) -> Extraction {
        let cells: Vec<ElementRef<'_>> = row.select(&self.selectors.cells).collect();

        let Some(time_cell) = cells.get(TIME_CELL) else {
            return Extraction::Malformed("row has no cells".to_string());
        };
        let time_text = text_of(*time_cell);
        let time = match NaiveTime::parse_from_str(&time_text, "%H:%M") {
            Ok(time) => time,
            Err(e) => {
                return Extraction::Malformed(format!(
                    "invalid publication time '{}': {}",
                    time_text, e
                ))
            }
        };

        if time <= watermark_time {
            return Extraction::Stale;
        }

        match self.build_report(&cells, date.and_time(time)) {
            Ok(report) => Extraction::Report(report),
            Err(reason) => Extraction::Malformed(reason),
        }
    }

    fn build_report(
        &self,
        cells: &[ElementRef<'_>],
        publication_date_time: chrono::NaiveDateTime,
    ) -> Result<Report, String> {
        let company_cell = cells
            .get(COMPANY_CELL)
            .ok_or_else(|| format!("missing company cell (found {} cells)", cells.len()))?;
        let link_cell = cells
            .get(LINK_CELL)
            .ok_or_else(|| format!("missing report cell (found {} cells)", cells.len()))?;

        let company = company_cell
            .select(&self.selectors.company)
            .next()
            .ok_or_else(|| "company cell has no name element".to_string())?;

        let link = link_cell
            .select(&self.selectors.link)
            .next()
            .ok_or_else(|| "report cell has no link".to_string())?;

        Ok(Report {
            publication_date_time,
            company_name: normalize_company_name(&text_of(company)),
            report_link: extract_report_link(&link_cell.inner_html(), self.server_prefix)?,
            report_kind: text_of(link),
        })
    }
}

/// Strips the trailing " SA" legal-entity suffix from a company name
pub fn normalize_company_name(name: &str) -> String {
    let name = name.trim();
    name.strip_suffix(COMPANY_SUFFIX).unwrap_or(name).to_string()
}

/// Cuts the report URL out of link markup
///
/// The URL starts at the first occurrence of `server_prefix` and ends at the
/// next double quote.
pub fn extract_report_link(markup: &str, server_prefix: &str) -> Result<String, String> {
    let start = markup
        .find(server_prefix)
        .ok_or_else(|| format!("no link starting with '{}'", server_prefix))?;

    let link = markup[start..].split('"').next().unwrap_or_default();

    // Attribute values come back serialized, so undo the one escape a URL can carry
    Ok(link.replace("&amp;", "&"))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
