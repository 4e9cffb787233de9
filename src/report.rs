//! Report data model
//!
//! A `Report` is one row of the disclosure listing after extraction. It is
//! built only by the record extractor and never mutated afterwards.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single published disclosure report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Listing date merged with the row's `HH:MM` time
    pub publication_date_time: NaiveDateTime,

    /// Company name with a trailing " SA" suffix removed
    pub company_name: String,

    /// Absolute link to the report page
    pub report_link: String,

    /// Trimmed report kind label, e.g. "Raport bieżący"
    pub report_kind: String,
}

impl Report {
    /// Returns true for the all-default record emitted in placeholder mode
    pub fn is_placeholder(&self) -> bool {
        *self == Self::default()
    }
}
