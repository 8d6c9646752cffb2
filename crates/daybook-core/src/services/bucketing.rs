//! Date bucketing
//!
//! Partitions records into one bucket per calendar day of a fixed window.
//! Reducing a bucket to a number (count, sum) is a separate step so the
//! same partition can feed several charts.

use chrono::NaiveDate;
use serde::Serialize;

use super::dates::{weekday_label, window_dates};

/// Records that fall on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket<R> {
    pub date: NaiveDate,
    pub records: Vec<R>,
}

impl<R> DayBucket<R> {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of a numeric field over the bucket
    pub fn sum_by<F>(&self, value_of: F) -> f64
    where
        F: Fn(&R) -> f64,
    {
        self.records.iter().map(value_of).sum()
    }

    pub fn weekday_label(&self) -> &'static str {
        weekday_label(self.date)
    }
}

/// Partition `records` into `window_len` day buckets starting at `window_start`.
///
/// Always yields exactly `window_len` buckets in date order, empty days
/// included. Records dated outside the window are dropped; records inside
/// keep their input order within their bucket.
pub fn bucket_by_day<'a, R, F>(
    records: &'a [R],
    date_of: F,
    window_start: NaiveDate,
    window_len: u32,
) -> Vec<DayBucket<&'a R>>
where
    F: Fn(&R) -> NaiveDate,
{
    let mut buckets: Vec<DayBucket<&'a R>> = window_dates(window_start, window_len)
        .into_iter()
        .map(|date| DayBucket { date, records: Vec::new() })
        .collect();

    for record in records {
        let offset = (date_of(record) - window_start).num_days();
        if offset < 0 || offset >= window_len as i64 {
            continue;
        }
        buckets[offset as usize].records.push(record);
    }

    buckets
}

/// Per-day counts of a bucket sequence
pub fn daily_counts<R>(buckets: &[DayBucket<R>]) -> Vec<(NaiveDate, usize)> {
    buckets.iter().map(|b| (b.date, b.count())).collect()
}

/// Sum of `value_of` across every bucket of the window.
pub fn window_total<R, F>(buckets: &[DayBucket<R>], value_of: F) -> f64
where
    F: Fn(&R) -> f64,
{
    buckets.iter().map(|b| b.sum_by(&value_of)).sum()
}
