//! Date-of-birth parsing for age derivation.

use chrono::NaiveDate;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

/// Parses the date formats seen in uploads.
///
/// Accepts `YYYY-MM-DD`, ISO date-times (the date part is used),
/// `YYYY/MM/DD`, `MM/DD/YYYY`, `DD-Mon-YYYY` and compact `YYYYMMDD`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chd_reconcile::dates::parse_date;
///
/// let expected = NaiveDate::from_ymd_opt(1970, 1, 31);
/// assert_eq!(parse_date("1970-01-31"), expected);
/// assert_eq!(parse_date("1970-01-31T08:15:00"), expected);
/// assert_eq!(parse_date("31-Jan-1970"), expected);
/// assert_eq!(parse_date("19700131"), expected);
/// assert_eq!(parse_date("unknown"), None);
/// ```
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(date) = parse_compact(trimmed) {
        return Some(date);
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    let (date_part, _) = trimmed.split_once(['T', ' '])?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_compact(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = value[0..4].parse().ok()?;
    let month = value[4..6].parse().ok()?;
    let day = value[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whole years between `dob` and `reference`, counted as 365-day blocks.
pub fn age_in_years(dob: NaiveDate, reference: NaiveDate) -> i64 {
    (reference - dob).num_days().div_euclid(365)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_slash_formats() {
        assert_eq!(parse_date("1970/01/31"), Some(ymd(1970, 1, 31)));
        assert_eq!(parse_date("01/31/1970"), Some(ymd(1970, 1, 31)));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(parse_date("19701332"), None);
        assert_eq!(parse_date("2020-02-30"), None);
        assert_eq!(parse_date("  "), None);
    }

    #[test]
    fn age_uses_365_day_years() {
        assert_eq!(age_in_years(ymd(1970, 1, 1), ymd(2020, 1, 1)), 50);
        assert_eq!(age_in_years(ymd(2001, 1, 1), ymd(2001, 12, 31)), 0);
        assert_eq!(age_in_years(ymd(2020, 6, 1), ymd(2020, 1, 1)), -1);
    }
}
