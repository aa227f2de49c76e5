//! Assigning time-stamped records to calendar-day buckets.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::time::{Timestamp, Zone};

/// Any record with a point-in-time attribute.
pub trait TimedRecord {
    /// The record's due date, date or start time.
    fn timestamp(&self) -> &Timestamp;

    /// End of the record's span, if it has one.
    fn end_timestamp(&self) -> Option<&Timestamp> {
        None
    }

    /// Whether the record covers a whole day rather than a time slot.
    fn all_day(&self) -> bool {
        false
    }
}

impl<T: TimedRecord + ?Sized> TimedRecord for &T {
    fn timestamp(&self) -> &Timestamp {
        (**self).timestamp()
    }

    fn end_timestamp(&self) -> Option<&Timestamp> {
        (**self).end_timestamp()
    }

    fn all_day(&self) -> bool {
        (**self).all_day()
    }
}

/// A calendar day and the records that fall on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket<'a, T> {
    pub date: NaiveDate,
    pub records: Vec<&'a T>,
}

impl<T> DayBucket<'_, T> {
    /// Whether no record fell on this day.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records on this day.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Ordered day buckets for a sequence of days.
///
/// Every requested day has a bucket, empty or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBuckets<'a, T> {
    buckets: Vec<DayBucket<'a, T>>,
}

impl<'a, T> DayBuckets<'a, T> {
    /// Records on `day`, or `None` when the day was not requested.
    #[must_use]
    pub fn get(&self, day: NaiveDate) -> Option<&[&'a T]> {
        self.buckets
            .iter()
            .find(|b| b.date == day)
            .map(|b| b.records.as_slice())
    }

    /// Iterate buckets in day order.
    pub fn iter(&self) -> impl Iterator<Item = &DayBucket<'a, T>> {
        self.buckets.iter()
    }

    /// The requested days, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.iter().map(|b| b.date)
    }

    /// Total number of bucketed records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(DayBucket::len).sum()
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether there are no buckets at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<'a, T> IntoIterator for DayBuckets<'a, T> {
    type Item = DayBucket<'a, T>;
    type IntoIter = std::vec::IntoIter<DayBucket<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

/// Bucket records by calendar day in `zone`.
///
/// Records keep their source order inside a bucket. Records whose day is
/// not in `days` are dropped; a day listed twice yields a single bucket.
pub fn bucket_by_day<'a, T, I>(records: I, days: &[NaiveDate], zone: &Zone) -> DayBuckets<'a, T>
where
    T: TimedRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut buckets: Vec<DayBucket<'a, T>> = Vec::with_capacity(days.len());
    let mut index: HashMap<NaiveDate, usize> = HashMap::with_capacity(days.len());

    for &date in days {
        index.entry(date).or_insert_with(|| {
            buckets.push(DayBucket {
                date,
                records: Vec::new(),
            });
            buckets.len() - 1
        });
    }

    let mut dropped = 0usize;
    for record in records {
        let day = zone.calendar_day(record.timestamp());
        match index.get(&day) {
            Some(&slot) => buckets[slot].records.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, "records outside the requested days were skipped");
    }

    DayBuckets { buckets }
}

/// Like [`bucket_by_day`], with each bucket sorted by start instant.
///
/// The sort is stable, so records sharing an instant keep source order.
pub fn bucket_by_day_sorted<'a, T, I>(
    records: I,
    days: &[NaiveDate],
    zone: &Zone,
) -> DayBuckets<'a, T>
where
    T: TimedRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut buckets = bucket_by_day(records, days, zone);
    for bucket in &mut buckets.buckets {
        bucket.records.sort_by_key(|r| zone.instant(r.timestamp()));
    }
    buckets
}

/// Records on a single calendar day, in source order.
pub fn records_on<'a, T, I>(records: I, day: NaiveDate, zone: &Zone) -> Vec<&'a T>
where
    T: TimedRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|r| zone.calendar_day(r.timestamp()) == day)
        .collect()
}

/// Records starting at or after `from`, ascending by start, first `limit`.
pub fn upcoming<'a, T, I>(records: I, zone: &Zone, from: DateTime<Utc>, limit: usize) -> Vec<&'a T>
where
    T: TimedRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut selected: Vec<(DateTime<Utc>, &'a T)> = records
        .into_iter()
        .map(|r| (zone.instant(r.timestamp()), r))
        .filter(|(at, _)| *at >= from)
        .collect();
    selected.sort_by_key(|(at, _)| *at);
    selected.into_iter().take(limit).map(|(_, r)| r).collect()
}

/// All records ascending by start, first `limit`, regardless of `now`.
///
/// Used for the sidebar of a period view, where the backend already
/// scoped the records to the visible window.
pub fn chronological<'a, T, I>(records: I, zone: &Zone, limit: usize) -> Vec<&'a T>
where
    T: TimedRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sorted: Vec<&'a T> = records.into_iter().collect();
    sorted.sort_by_key(|r| zone.instant(r.timestamp()));
    sorted.truncate(limit);
    sorted
}
