//! Rolling periods that bound operation listings and analytics.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{Error, category::CategoryType};

/// The number of days looked back over when no period is given.
///
/// Treating "no period" as roughly the last year keeps unfiltered requests
/// bounded. Every period filter uses this same default.
pub const DEFAULT_PERIOD_DAYS: u32 = 364;

/// A period selector, serialized as its number of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    /// The number of days the period looks back over.
    pub fn days(self) -> u32 {
        match self {
            Period::Day => 1,
            Period::Week => 7,
            Period::Month => 31,
        }
    }
}

impl TryFrom<i64> for Period {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Period::Day),
            7 => Ok(Period::Week),
            31 => Ok(Period::Month),
            other => Err(Error::InvalidPeriod(other)),
        }
    }
}

impl From<Period> for i64 {
    fn from(period: Period) -> Self {
        i64::from(period.days())
    }
}

/// Query parameters for requests bounded by an optional period.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<Period>,
}

/// Query parameters for requests filtered by category type and bounded by an
/// optional period.
#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub period: Option<Period>,
}

/// The first date included by `period`, counting back from `today`.
///
/// Uses [DEFAULT_PERIOD_DAYS] when `period` is `None`.
pub fn start_date(period: Option<Period>, today: Date) -> Date {
    let days = period.map_or(DEFAULT_PERIOD_DAYS, Period::days);

    days_before(today, days)
}

/// `today` minus `days`, saturating at the earliest representable date.
pub fn days_before(today: Date, days: u32) -> Date {
    today
        .checked_sub(Duration::days(days.into()))
        .unwrap_or(Date::MIN)
}

#[cfg(test)]
mod period_tests {
    use time::macros::date;

    use crate::{
        Error,
        category::CategoryType,
        period::{DEFAULT_PERIOD_DAYS, Period, PeriodQuery, TypeQuery, days_before, start_date},
    };

    #[test]
    fn periods_subtract_their_days() {
        let today = date!(2025 - 03 - 01);

        assert_eq!(start_date(Some(Period::Day), today), date!(2025 - 02 - 28));
        assert_eq!(start_date(Some(Period::Week), today), date!(2025 - 02 - 22));
        assert_eq!(start_date(Some(Period::Month), today), date!(2025 - 01 - 29));
    }

    #[test]
    fn no_period_defaults_to_364_days() {
        let today = date!(2025 - 10 - 18);

        let got = start_date(None, today);

        assert_eq!(DEFAULT_PERIOD_DAYS, 364);
        assert_eq!(got, date!(2024 - 10 - 19));
    }

    #[test]
    fn zero_days_is_today() {
        let today = date!(2025 - 10 - 18);

        assert_eq!(days_before(today, 0), today);
    }

    #[test]
    fn saturates_at_earliest_date() {
        let got = days_before(time::Date::MIN, 7);

        assert_eq!(got, time::Date::MIN);
    }

    #[test]
    fn parses_known_day_counts() {
        assert_eq!(Period::try_from(1_i64), Ok(Period::Day));
        assert_eq!(Period::try_from(7_i64), Ok(Period::Week));
        assert_eq!(Period::try_from(31_i64), Ok(Period::Month));
        assert_eq!(Period::try_from(30_i64), Err(Error::InvalidPeriod(30)));
    }

    #[test]
    fn absent_period_deserializes_to_none() {
        let query: PeriodQuery = serde_json::from_str("{}").unwrap();

        assert_eq!(query.period, None);
    }

    #[test]
    fn period_deserializes_from_integer() {
        let query: PeriodQuery = serde_json::from_str(r#"{"period": 7}"#).unwrap();

        assert_eq!(query.period, Some(Period::Week));
        assert!(serde_json::from_str::<PeriodQuery>(r#"{"period": 2}"#).is_err());
    }

    #[test]
    fn type_query_requires_a_valid_type() {
        let query: TypeQuery = serde_json::from_str(r#"{"type": "income"}"#).unwrap();

        assert_eq!(query.category_type, CategoryType::Income);
        assert_eq!(query.period, None);
        assert!(serde_json::from_str::<TypeQuery>(r#"{"type": "savings"}"#).is_err());
        assert!(serde_json::from_str::<TypeQuery>(r#"{"period": 7}"#).is_err());
    }
}
