//! # Temporal Types — Calendar Dates and Period Buckets
//!
//! Defines [`CalendarDate`], a strict calendar date with no time-of-day or
//! timezone component, and the [`Period`] granularities used to bucket
//! session history into comparable [`PeriodKey`]s.
//!
//! ## Invariant
//!
//! The engine has no notion of "now". The only reference point is the
//! request date supplied by the caller, so every computation here is a pure
//! function of its inputs.
//!
//! ## ISO Week-Year
//!
//! Weekly buckets use the ISO 8601 week-year: a week belongs to the year that
//! contains its Thursday. Dates near January 1 and December 31 can therefore
//! land in the adjacent year's bucket:
//!
//! ```text
//! 2021-01-01 (Friday)  -> 2020-W53
//! 2024-12-30 (Monday)  -> 2025-W01
//! ```

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DateParseError;

/// Wire format accepted for every date field.
const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// CalendarDate
// ---------------------------------------------------------------------------

/// A calendar date (`YYYY-MM-DD`) without time or timezone semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parse a strict `YYYY-MM-DD` date.
    ///
    /// `field` names the request field carrying the value so that the error
    /// identifies it. Timestamps, trailing characters, and impossible dates
    /// such as `2023-02-29` are rejected.
    pub fn parse(field: &str, text: &str) -> Result<Self, DateParseError> {
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Self)
            .map_err(|e| DateParseError {
                field: field.to_string(),
                value: text.to_string(),
                reason: e.to_string(),
            })
    }

    /// Build a date from its components, returning `None` if it does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Wrap an existing `chrono::NaiveDate`.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Whole days from `earlier` to `self`. Negative if `earlier` is later.
    pub fn days_since(&self, earlier: CalendarDate) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }

    /// The bucket this date falls into for the given period.
    pub fn period_key(&self, period: Period) -> PeriodKey {
        period.key(*self)
    }

    /// Render as `YYYY-MM-DD`.
    pub fn to_iso8601(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// Reporting granularity for frequency limits.
///
/// Serialized with the policy vocabulary (`diario`, `semanal`, `mensal`,
/// `anual`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    /// One calendar day.
    #[serde(rename = "diario")]
    Daily,
    /// One ISO week (Monday to Sunday).
    #[serde(rename = "semanal")]
    Weekly,
    /// One calendar month.
    #[serde(rename = "mensal")]
    Monthly,
    /// One calendar year.
    #[serde(rename = "anual")]
    Annual,
}

impl Period {
    /// Every supported period.
    pub const ALL: [Period; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Annual];

    /// Policy name of this period.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "diario",
            Self::Weekly => "semanal",
            Self::Monthly => "mensal",
            Self::Annual => "anual",
        }
    }

    /// Look up a period by its policy name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
    }

    /// Map a date to its canonical bucket for this period.
    pub fn key(self, date: CalendarDate) -> PeriodKey {
        let d = date.0;
        match self {
            Self::Daily => PeriodKey::Daily {
                year: d.year(),
                month: d.month(),
                day: d.day(),
            },
            Self::Weekly => {
                let week = d.iso_week();
                PeriodKey::Weekly {
                    iso_year: week.year(),
                    iso_week: week.week(),
                }
            }
            Self::Monthly => PeriodKey::Monthly {
                year: d.year(),
                month: d.month(),
            },
            Self::Annual => PeriodKey::Annual { year: d.year() },
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PeriodKey
// ---------------------------------------------------------------------------

/// A comparable bucket identifier. Two dates share a bucket iff their keys
/// are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    /// `(year, month, day)`.
    Daily { year: i32, month: u32, day: u32 },
    /// `(iso_year, iso_week)`; `iso_year` may differ from the calendar year.
    Weekly { iso_year: i32, iso_week: u32 },
    /// `(year, month)`.
    Monthly { year: i32, month: u32 },
    /// `(year,)`.
    Annual { year: i32 },
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily { year, month, day } => write!(f, "{year:04}-{month:02}-{day:02}"),
            Self::Weekly { iso_year, iso_week } => write!(f, "{iso_year:04}-W{iso_week:02}"),
            Self::Monthly { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Annual { year } => write!(f, "{year:04}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse("test", s).unwrap()
    }

    // ---- parsing ----

    #[test]
    fn parse_accepts_iso_date() {
        assert_eq!(date("2024-03-05").to_iso8601(), "2024-03-05");
    }

    #[test]
    fn parse_rejects_non_dates() {
        assert!(CalendarDate::parse("f", "").is_err());
        assert!(CalendarDate::parse("f", "not-a-date").is_err());
        assert!(CalendarDate::parse("f", "05/03/2024").is_err());
        assert!(CalendarDate::parse("f", "2023-02-29").is_err());
        assert!(CalendarDate::parse("f", "2024-03-05T10:00:00Z").is_err());
    }

    #[test]
    fn parse_error_names_field_and_value() {
        let err = CalendarDate::parse("procedimento.data_solicitacao", "2024-13-01").unwrap_err();
        assert_eq!(err.field, "procedimento.data_solicitacao");
        assert_eq!(err.value, "2024-13-01");
    }

    #[test]
    fn leap_day_is_valid() {
        assert!(CalendarDate::from_ymd(2024, 2, 29).is_some());
        assert!(CalendarDate::from_ymd(2023, 2, 29).is_none());
    }

    #[test]
    fn days_since_counts_whole_days() {
        assert_eq!(date("2024-03-10").days_since(date("2024-03-07")), 3);
        assert_eq!(date("2024-03-01").days_since(date("2024-02-28")), 2);
        assert_eq!(date("2024-03-07").days_since(date("2024-03-10")), -3);
    }

    #[test]
    fn serde_uses_iso_string() {
        let json = serde_json::to_string(&date("2024-01-02")).unwrap();
        assert_eq!(json, "\"2024-01-02\"");
    }

    // ---- period names ----

    #[test]
    fn period_names_are_case_insensitive() {
        assert_eq!(Period::from_name("mensal"), Some(Period::Monthly));
        assert_eq!(Period::from_name("SEMANAL"), Some(Period::Weekly));
        assert_eq!(Period::from_name("Anual"), Some(Period::Annual));
        assert_eq!(Period::from_name("quinzenal"), None);
        assert_eq!(Period::from_name(""), None);
    }

    #[test]
    fn period_serde_matches_policy_vocabulary() {
        assert_eq!(serde_json::to_string(&Period::Daily).unwrap(), "\"diario\"");
        let p: Period = serde_json::from_str("\"semanal\"").unwrap();
        assert_eq!(p, Period::Weekly);
    }

    // ---- period keys ----

    #[test]
    fn daily_key() {
        assert_eq!(
            date("2024-03-05").period_key(Period::Daily),
            PeriodKey::Daily { year: 2024, month: 3, day: 5 }
        );
    }

    #[test]
    fn monthly_and_annual_keys() {
        assert_eq!(
            date("2024-03-05").period_key(Period::Monthly),
            PeriodKey::Monthly { year: 2024, month: 3 }
        );
        assert_eq!(
            date("2024-03-05").period_key(Period::Annual),
            PeriodKey::Annual { year: 2024 }
        );
    }

    #[test]
    fn weekly_key_spans_month_boundary() {
        // Monday 2024-01-29 and Sunday 2024-02-04 are in the same ISO week.
        assert_eq!(
            date("2024-01-29").period_key(Period::Weekly),
            date("2024-02-04").period_key(Period::Weekly)
        );
        assert_ne!(
            date("2024-02-04").period_key(Period::Weekly),
            date("2024-02-05").period_key(Period::Weekly)
        );
    }

    #[test]
    fn january_first_in_previous_iso_year() {
        // 2021-01-01 is a Friday: ISO week 53 of 2020.
        assert_eq!(
            date("2021-01-01").period_key(Period::Weekly),
            PeriodKey::Weekly { iso_year: 2020, iso_week: 53 }
        );
        // 2023-01-01 is a Sunday: ISO week 52 of 2022.
        assert_eq!(
            date("2023-01-01").period_key(Period::Weekly),
            PeriodKey::Weekly { iso_year: 2022, iso_week: 52 }
        );
    }

    #[test]
    fn december_end_in_next_iso_year() {
        // 2024-12-30 is a Monday whose Thursday is 2025-01-02.
        assert_eq!(
            date("2024-12-30").period_key(Period::Weekly),
            PeriodKey::Weekly { iso_year: 2025, iso_week: 1 }
        );
        assert_eq!(
            date("2024-12-30").period_key(Period::Weekly),
            date("2025-01-05").period_key(Period::Weekly)
        );
    }

    #[test]
    fn calendar_year_differs_from_iso_year_for_annual() {
        // Annual buckets use the calendar year, not the ISO year.
        assert_eq!(
            date("2021-01-01").period_key(Period::Annual),
            PeriodKey::Annual { year: 2021 }
        );
    }

    #[test]
    fn period_key_display() {
        let d = date("2021-01-01");
        assert_eq!(d.period_key(Period::Daily).to_string(), "2021-01-01");
        assert_eq!(d.period_key(Period::Weekly).to_string(), "2020-W53");
        assert_eq!(d.period_key(Period::Monthly).to_string(), "2021-01");
        assert_eq!(d.period_key(Period::Annual).to_string(), "2021");
    }
}
