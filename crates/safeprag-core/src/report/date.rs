use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

const BR: &[BorrowedFormatItem<'static>] = format_description!("[day]/[month]/[year]");
const ISO: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const COMPACT: &[BorrowedFormatItem<'static>] = format_description!("[year][month][day]");

/// Normalize a date to `DD/MM/YYYY`, best effort.
///
/// Handles:
/// - "2024-03-15" -> "15/03/2024"
/// - "2024-03-15T10:00:00Z" -> "15/03/2024" (anything after the date is ignored)
/// - "20240315" -> "15/03/2024"
/// - "15/03/2024" -> "15/03/2024"
/// - "" -> ""
///
/// Anything else, including impossible dates like "2024-13-45", is returned
/// unchanged.
pub fn format_date(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let date = Date::parse(trimmed, BR)
        .ok()
        .or_else(|| parse_prefix(trimmed, 10, ISO))
        .or_else(|| parse_prefix(trimmed, 8, COMPACT));
    match date.and_then(|d| d.format(BR).ok()) {
        Some(formatted) => formatted,
        None => s.to_string(),
    }
}

/// Parse the first `len` bytes with `format`. The rest may hold a time part
/// but must not continue the digit run ("2024-03-150").
fn parse_prefix(s: &str, len: usize, format: &[BorrowedFormatItem<'_>]) -> Option<Date> {
    let head = s.get(..len)?;
    if s[len..].bytes().next().is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    Date::parse(head, format).ok()
}
