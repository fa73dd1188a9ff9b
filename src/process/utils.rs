use once_cell::sync::Lazy;
use regex::Regex;

static THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?\d{1,3}(,\d{3})+(\.\d+)?$").expect("thousands regex"));

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_ws(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalise one scraped cell: collapse whitespace, then drop thousands
/// separators from numbers like `1,234.5`.
pub fn clean_cell(raw: &str) -> String {
    let s = collapse_ws(raw);
    if THOUSANDS.is_match(&s) {
        s.replace(',', "")
    } else {
        s
    }
}

/// A cell counts as missing when nothing but whitespace is left.
pub fn is_missing(cell: &str) -> bool {
    cell.trim().is_empty()
}
