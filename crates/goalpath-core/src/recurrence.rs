//! Recurrence evaluation for habits.
//!
//! Decides whether a habit occurrence exists on a calendar date. The rule
//! set is closed; see [`RecurrenceKind`]. The weekly anchor weekday is
//! fixed by the habit's start date at creation and never recalculated.

use chrono::{Datelike, Local, NaiveDate, Weekday};

use crate::item::{Item, ItemKind, RecurrenceKind};

/// Whether an occurrence exists on `date`.
///
/// A weekly rule with no anchor start date is treated as never-occurring
/// rather than an error; visibility is fail-closed for malformed items.
pub fn occurs_on(date: NaiveDate, start_date: Option<NaiveDate>, kind: RecurrenceKind) -> bool {
    match kind {
        RecurrenceKind::Daily => true,
        RecurrenceKind::WeekdaysOnly => !is_weekend(date.weekday()),
        RecurrenceKind::WeekendsOnly => is_weekend(date.weekday()),
        RecurrenceKind::WeeklyOnAnchor => match start_date {
            Some(anchor) => date.weekday() == anchor.weekday(),
            None => false,
        },
    }
}

/// [`occurs_on`] for an item, reading its habit fields.
///
/// Non-habits and habits missing their recurrence rule never occur.
pub fn item_occurs_on(item: &Item, date: NaiveDate) -> bool {
    if item.kind != ItemKind::Habit {
        return false;
    }
    let Some(kind) = item.recurrence else {
        return false;
    };
    let anchor = item
        .start_date
        .map(|d| d.with_timezone(&Local).date_naive());
    occurs_on(date, anchor, kind)
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}
