//! Markdown rendering of new reports

use crate::report::Report;

/// Formats reports as a markdown table
///
/// # Arguments
///
/// * `reports` - The reports returned by one check
///
/// # Returns
///
/// A formatted markdown string
pub fn to_markdown(reports: &[Report]) -> String {
    let mut md = String::new();

    md.push_str("# New ESPI Reports\n\n");

    if reports.is_empty() {
        md.push_str("_No new reports since the last check._\n");
        return md;
    }

    md.push_str(&format!("- **Reports**: {}\n\n", reports.len()));
    md.push_str("| Published | Company | Kind | Link |\n");
    md.push_str("|-----------|---------|------|------|\n");

    for report in reports {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            report.publication_date_time.format("%Y-%m-%d %H:%M"),
            escape_cell(&report.company_name),
            escape_cell(&report.report_kind),
            report.report_link
        ));
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
