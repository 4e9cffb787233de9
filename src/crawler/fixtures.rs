//! Listing page builders shared by crawler tests

pub const SERVER: &str = "http://biznes.pap.pl";

/// One report row shaped like the live listing
pub fn report_row(time: &str, company: &str, kind: &str, id: u32) -> String {
    format!(
        r#"<tr class="inf"><td class="nDataCzas">{time}</td><td class="nIcon"><img src="/img/espi.gif" alt="ESPI"></td><td class="nSpolka"><b>{company}</b></td><td class="nRaport"><a href="{SERVER}/pl/reports/espi/view/{id},{id}" title="{kind}">{kind}</a></td></tr>"#
    )
}

/// A listing page with the given rows and an optional page count marker
pub fn listing(rows: &[String], total_pages: Option<u32>) -> String {
    let marker = total_pages.map(|n| n.to_string());
    listing_with_marker(rows, marker.as_deref())
}

/// A listing page whose second pagination marker carries raw `marker` text
pub fn listing_with_marker(rows: &[String], marker: Option<&str>) -> String {
    let pagination = marker
        .map(|text| {
            format!(r#"<div class="stronicowanie">Strona <b>1</b> z <b>{text}</b></div>"#)
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html><html><head><title>Raporty</title></head><body><table class="espi"><tbody>{}</tbody></table>{}</body></html>"#,
        rows.join("\n"),
        pagination
    )
}
