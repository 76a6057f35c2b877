use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

const ISO_FORMAT: &str = "%Y-%m-%d";

/// `Y-M-D`, `Y-M` or `Y` with one separator from `-`, `/`, `.` used consistently.
fn exact_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<y>\d{4})(?:(?P<sep>[-/.])(?P<m>\d{1,2})(?:[-/.](?P<d>\d{1,2}))?)?$",
        )
        .expect("static date regex")
    })
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:19|20)\d{2}").expect("static year regex"))
}

/// Normalizes a loosely formatted date to `YYYY-MM-DD`.
///
/// Exact forms are tried first (`2020-03-15`, `2020/3`, `2020.03`, `2020`, ...);
/// year-only input anchors to January 1st and year-month input to the 1st of the month.
/// Otherwise the first `19xx`/`20xx` in the text becomes `YYYY-01-01`. Text with no
/// recognizable year is returned trimmed but otherwise unchanged.
pub fn parse_date(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }
    if let Some(date) = parse_exact(s) {
        return date.format(ISO_FORMAT).to_string();
    }
    if let Some(m) = year_re().find(s) {
        return format!("{}-01-01", m.as_str());
    }
    s.to_string()
}

/// Widest interval covering both ranges. Only values that normalize to a calendar date
/// take part; a side with no usable value comes back empty.
pub fn merge_date_range(
    a_start: &str,
    a_end: &str,
    b_start: &str,
    b_end: &str,
) -> (String, String) {
    let start = [a_start, b_start].into_iter().filter_map(to_date).min();
    let end = [a_end, b_end].into_iter().filter_map(to_date).max();
    (format_opt(start), format_opt(end))
}

/// Calendar date of a canonical (or canonicalizable) value, `None` when not a date.
pub fn to_date(raw: &str) -> Option<NaiveDate> {
    let normalized = parse_date(raw);
    NaiveDate::parse_from_str(&normalized, ISO_FORMAT).ok()
}

/// Newest-first ordering on date values; values that are not dates sort last.
pub fn cmp_desc(a: &str, b: &str) -> Ordering {
    // `None < Some(_)`, so reversing puts undated values at the end.
    to_date(b).cmp(&to_date(a))
}

fn parse_exact(s: &str) -> Option<NaiveDate> {
    let caps = exact_date_re().captures(s)?;
    let year: i32 = caps.name("y")?.as_str().parse().ok()?;
    let month: u32 = match caps.name("m") {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    let day: u32 = match caps.name("d") {
        Some(d) => {
            let sep = caps.name("sep")?.as_str();
            // The day separator must repeat the month separator.
            let tail = &s[caps.name("m")?.end()..];
            if !tail.starts_with(sep) {
                return None;
            }
            d.as_str().parse().ok()?
        }
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn format_opt(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(ISO_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_dates_all_separators() {
        assert_eq!(parse_date("2020-03-15"), "2020-03-15");
        assert_eq!(parse_date("2020/3/5"), "2020-03-05");
        assert_eq!(parse_date(" 2020.12.01 "), "2020-12-01");
    }

    #[test]
    fn test_year_month() {
        assert_eq!(parse_date("2020-06"), "2020-06-01");
        assert_eq!(parse_date("2020/6"), "2020-06-01");
        assert_eq!(parse_date("2020.11"), "2020-11-01");
    }

    #[test]
    fn test_year_only() {
        assert_eq!(parse_date("2019"), "2019-01-01");
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_date(""), "");
        assert_eq!(parse_date("   "), "");
    }

    #[test]
    fn test_mixed_separators_fall_back_to_year() {
        assert_eq!(parse_date("2020-01/05"), "2020-01-01");
    }

    #[test]
    fn test_invalid_calendar_date_falls_back_to_year() {
        assert_eq!(parse_date("2021-02-30"), "2021-01-01");
        assert_eq!(parse_date("2021-13"), "2021-01-01");
    }

    #[test]
    fn test_free_text_year_extraction() {
        assert_eq!(parse_date("Jan 2020"), "2020-01-01");
        assert_eq!(parse_date("Summer '98 - 2001"), "2001-01-01");
    }

    #[test]
    fn test_unparseable_passes_through() {
        assert_eq!(parse_date("  Present "), "Present");
        assert_eq!(parse_date("n/a"), "n/a");
    }

    #[test]
    fn test_exact_year_outside_fallback_range() {
        assert_eq!(parse_date("1850"), "1850-01-01");
        assert_eq!(parse_date("circa 1850"), "circa 1850");
    }

    #[test]
    fn test_merge_date_range_union() {
        assert_eq!(
            merge_date_range("2020-01-01", "2021-06-01", "2020-09-01", "2022-01-01"),
            ("2020-01-01".to_string(), "2022-01-01".to_string())
        );
    }

    #[test]
    fn test_merge_date_range_loose_inputs() {
        assert_eq!(
            merge_date_range("2019", "2020-06", "2020-01-01", "2021"),
            ("2019-01-01".to_string(), "2021-01-01".to_string())
        );
    }

    #[test]
    fn test_merge_date_range_ignores_non_dates() {
        assert_eq!(
            merge_date_range("", "Present", "2018-04", ""),
            ("2018-04-01".to_string(), String::new())
        );
    }

    #[test]
    fn test_cmp_desc_puts_undated_last() {
        let mut dates = vec!["", "2019-01-01", "Present", "2021-05-01"];
        dates.sort_by(|a, b| cmp_desc(a, b));
        assert_eq!(dates, vec!["2021-05-01", "2019-01-01", "", "Present"]);
    }
}
