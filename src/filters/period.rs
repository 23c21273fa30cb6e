//! Quick date-range presets for the filter bar.

use chrono::{Datelike, Duration, Months, NaiveDate};

use super::{Filter, FilterPatch};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Yesterday,
    /// Sunday through today.
    ThisWeek,
    /// The full Sunday-to-Saturday week before this one.
    LastWeek,
    ThisMonth,
    LastMonth,
    LastSixMonths,
}

pub const PRESETS: [Period; 7] = [
    Period::Today,
    Period::Yesterday,
    Period::ThisWeek,
    Period::LastWeek,
    Period::ThisMonth,
    Period::LastMonth,
    Period::LastSixMonths,
];

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Yesterday => "Yesterday",
            Period::ThisWeek => "This week",
            Period::LastWeek => "Last week",
            Period::ThisMonth => "This month",
            Period::LastMonth => "Last month",
            Period::LastSixMonths => "Last 6 months",
        }
    }

    /// Inclusive date range relative to `today`.
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
        let month_start = today.with_day(1).unwrap_or(today);

        match self {
            Period::Today => (today, today),
            Period::Yesterday => {
                let yesterday = today - Duration::days(1);
                (yesterday, yesterday)
            }
            Period::ThisWeek => (week_start, today),
            Period::LastWeek => {
                let start = week_start - Duration::days(7);
                (start, start + Duration::days(6))
            }
            Period::ThisMonth => (month_start, today),
            Period::LastMonth => {
                let end = month_start - Duration::days(1);
                (end.with_day(1).unwrap_or(end), end)
            }
            Period::LastSixMonths => {
                let start = today.checked_sub_months(Months::new(6)).unwrap_or(today);
                (start, today)
            }
        }
    }

    pub fn patch(self, today: NaiveDate) -> FilterPatch {
        let (start, end) = self.range(today);
        FilterPatch {
            start: Some(start.format(DATE_FORMAT).to_string()),
            end: Some(end.format(DATE_FORMAT).to_string()),
            ..FilterPatch::default()
        }
    }

    /// The preset whose range equals the filter's dates, if any.
    pub fn detect(filter: &Filter, today: NaiveDate) -> Option<Period> {
        PRESETS.into_iter().find(|period| {
            let patch = period.patch(today);
            patch.start == filter.start && patch.end == filter.end
        })
    }
}
