//! # Session History Queries
//!
//! Read-only aggregation over a caller-supplied, already materialized session
//! log. The log is append-only from the engine's point of view: these queries
//! borrow it, never sort or mutate it, and do no I/O.

use crate::context::SessionRecord;
use crate::identity::TherapyType;
use crate::temporal::{CalendarDate, Period};

/// A borrowed view over a session history.
#[derive(Debug, Clone, Copy)]
pub struct SessionHistory<'a> {
    records: &'a [SessionRecord],
}

impl<'a> SessionHistory<'a> {
    /// Wrap a slice of session records.
    pub fn new(records: &'a [SessionRecord]) -> Self {
        Self { records }
    }

    /// Number of records in the history, of any type.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn of_type<'t>(&self, therapy: &'t TherapyType) -> impl Iterator<Item = &'a SessionRecord> + 't
    where
        'a: 't,
    {
        self.records
            .iter()
            .filter(move |record| record.therapy_type == *therapy)
    }

    /// Count sessions of `therapy` in the same `period` bucket as `reference`.
    ///
    /// Sessions after `reference` still count if they fall in the bucket.
    pub fn count_in_period(
        &self,
        therapy: &TherapyType,
        period: Period,
        reference: CalendarDate,
    ) -> usize {
        let bucket = period.key(reference);
        self.of_type(therapy)
            .filter(|record| period.key(record.date) == bucket)
            .count()
    }

    /// Latest session date of `therapy` that is on or before `cutoff`.
    pub fn last_on_or_before(
        &self,
        therapy: &TherapyType,
        cutoff: CalendarDate,
    ) -> Option<CalendarDate> {
        self.of_type(therapy)
            .map(|record| record.date)
            .filter(|date| *date <= cutoff)
            .max()
    }

    /// Number of sessions of `therapy` on exactly `date`.
    pub fn count_on_date(&self, therapy: &TherapyType, date: CalendarDate) -> usize {
        self.of_type(therapy)
            .filter(|record| record.date == date)
            .count()
    }
}
