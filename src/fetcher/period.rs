use crate::model::FetchError;
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::str::FromStr;

/// Lookback range understood by the data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    /// Last excluded day when the range ends on `end`: only dates strictly after
    /// the cutoff belong to the period. `None` means unbounded.
    pub fn cutoff(self, end: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::OneDay => Some(end - Duration::days(1)),
            Period::FiveDays => Some(end - Duration::days(5)),
            Period::OneMonth => end.checked_sub_months(Months::new(1)),
            Period::ThreeMonths => end.checked_sub_months(Months::new(3)),
            Period::SixMonths => end.checked_sub_months(Months::new(6)),
            Period::OneYear => end.checked_sub_months(Months::new(12)),
            Period::TwoYears => end.checked_sub_months(Months::new(24)),
            Period::FiveYears => end.checked_sub_months(Months::new(60)),
            Period::TenYears => end.checked_sub_months(Months::new(120)),
            Period::YearToDate => NaiveDate::from_ymd_opt(end.year(), 1, 1)
                .and_then(|jan_first| jan_first.pred_opt()),
            Period::Max => None,
        }
    }
}

impl FromStr for Period {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(Period::OneDay),
            "5d" => Ok(Period::FiveDays),
            "1mo" => Ok(Period::OneMonth),
            "3mo" => Ok(Period::ThreeMonths),
            "6mo" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "2y" => Ok(Period::TwoYears),
            "5y" => Ok(Period::FiveYears),
            "10y" => Ok(Period::TenYears),
            "ytd" => Ok(Period::YearToDate),
            "max" => Ok(Period::Max),
            other => Err(FetchError::InvalidRequest(format!("unknown period '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_provider_vocabulary() {
        for text in ["1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max"] {
            let period: Period = text.parse().unwrap();
            assert_eq!(period.as_str(), text);
        }
        assert_eq!("1Y".parse::<Period>().unwrap(), Period::OneYear);
        assert_eq!(Period::default(), Period::OneYear);
    }

    #[test]
    fn rejects_unknown_period() {
        assert!(matches!(
            "fortnight".parse::<Period>(),
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn cutoffs() {
        let end = date(2024, 3, 31);
        assert_eq!(Period::OneDay.cutoff(end), Some(date(2024, 3, 30)));
        assert_eq!(Period::OneMonth.cutoff(end), Some(date(2024, 2, 29)));
        assert_eq!(Period::OneYear.cutoff(end), Some(date(2023, 3, 31)));
        assert_eq!(Period::YearToDate.cutoff(end), Some(date(2023, 12, 31)));
        assert_eq!(Period::Max.cutoff(end), None);
    }
}
