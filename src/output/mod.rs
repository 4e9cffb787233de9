//! Output module for rendering check results
//!
//! Reports can be printed as a pretty JSON array (field names match the
//! checkpoint consumer's camelCase model) or as a markdown table.

mod markdown;

pub use markdown::to_markdown;

use crate::report::Report;

/// Formats reports as a pretty-printed JSON array
pub fn to_json(reports: &[Report]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(reports)
}
