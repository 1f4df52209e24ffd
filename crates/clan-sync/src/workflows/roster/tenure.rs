use chrono::{Datelike, NaiveDate};

/// Format of the in-game roster export, e.g. `07-Mar-2024`.
pub const JOINED_DATE_FORMAT: &str = "%d-%b-%Y";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("join date '{value}' is not in DD-Mon-YYYY form: {source}")]
pub struct ParseError {
    pub value: String,
    #[source]
    pub source: chrono::ParseError,
}

pub fn parse_joined_date(raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw.trim(), JOINED_DATE_FORMAT).map_err(|source| ParseError {
        value: raw.to_string(),
        source,
    })
}

/// Calendar-month difference. Day of month is ignored on both sides, so
/// 31-Jan to 01-Feb counts as one month.
pub fn months_between(joined: NaiveDate, today: NaiveDate) -> i64 {
    let years = i64::from(today.year()) - i64::from(joined.year());
    let months = i64::from(today.month()) - i64::from(joined.month());
    years * 12 + months
}

/// Whole months in clan; a join date in a later month than `today` yields 0.
pub fn months_in_clan(joined_date: &str, today: NaiveDate) -> Result<u32, ParseError> {
    let joined = parse_joined_date(joined_date)?;
    let months = months_between(joined, today).max(0);
    Ok(u32::try_from(months).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_roster_export_format() {
        assert_eq!(parse_joined_date("07-Mar-2024").unwrap(), date(2024, 3, 7));
        assert_eq!(parse_joined_date(" 1-Dec-2023 ").unwrap(), date(2023, 12, 1));
    }

    #[test]
    fn rejects_other_formats() {
        for raw in ["2024-03-07", "07/03/2024", "", "31-Feb-2024"] {
            let err = parse_joined_date(raw).expect_err("malformed date rejected");
            assert_eq!(err.value, raw);
        }
    }

    #[test]
    fn counts_calendar_months_across_years() {
        assert_eq!(months_between(date(2023, 11, 15), date(2024, 2, 1)), 3);
        assert_eq!(months_between(date(2024, 2, 1), date(2024, 2, 29)), 0);
    }

    #[test]
    fn day_of_month_never_changes_the_count() {
        let today = date(2025, 6, 1);
        for day in 1..=30 {
            assert_eq!(months_between(date(2025, 4, day), today), 2, "day {day}");
        }
        let joined = date(2025, 4, 30);
        for day in 1..=30 {
            assert_eq!(months_between(joined, date(2025, 6, day)), 2, "today day {day}");
        }
    }

    #[test]
    fn future_join_dates_clamp_to_zero() {
        let months = months_in_clan("10-Aug-2025", date(2025, 6, 1)).expect("parses");
        assert_eq!(months, 0);
    }
}
