use chrono::{Datelike, Days, Months, NaiveDate};

use crate::aggregate::first_of_month;

/// A contiguous inclusive date range used to group a chart series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PeriodBucket {
    pub(crate) label: String,
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl PeriodBucket {
    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

pub(crate) fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// 7-day spans from `start`, the last one cut short at `end`.
pub(crate) fn weeks_between<F>(start: NaiveDate, end: NaiveDate, label: F) -> Vec<PeriodBucket>
where
    F: Fn(usize, NaiveDate) -> String,
{
    let mut buckets = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let week_end = cursor
            .checked_add_days(Days::new(6))
            .map_or(end, |d| d.min(end));
        buckets.push(PeriodBucket {
            label: label(buckets.len() + 1, cursor),
            start: cursor,
            end: week_end,
        });
        match week_end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    buckets
}

pub(crate) fn week_number_label(n: usize, _start: NaiveDate) -> String {
    format!("Week {n}")
}

pub(crate) fn week_start_label(_n: usize, start: NaiveDate) -> String {
    start.format("%b %-d").to_string()
}

/// Weeks of `today`'s month, through the month's last day.
pub(crate) fn weeks_in_month(today: NaiveDate) -> Vec<PeriodBucket> {
    weeks_between(first_of_month(today), last_of_month(today), week_number_label)
}

/// One bucket per day from the 1st through `today`.
pub(crate) fn days_of_month(today: NaiveDate) -> Vec<PeriodBucket> {
    (1..=today.day())
        .filter_map(|day| today.with_day(day))
        .map(|d| PeriodBucket {
            label: d.day().to_string(),
            start: d,
            end: d,
        })
        .collect()
}

/// Whole calendar months from January through `today`'s month.
pub(crate) fn months_of_year(today: NaiveDate) -> Vec<PeriodBucket> {
    (1..=today.month())
        .filter_map(|m| NaiveDate::from_ymd_opt(today.year(), m, 1))
        .map(|first| PeriodBucket {
            label: first.format("%b").to_string(),
            start: first,
            end: last_of_month(first),
        })
        .collect()
}
