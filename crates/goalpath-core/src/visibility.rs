//! Date-window membership: which items are in scope for a calendar date.
//!
//! An item is in scope for a date when any of the following holds, and
//! its kind is among the requested kinds:
//!
//! - its exact reminder time falls inside the date's local day interval;
//! - it has no reminder time and its deadline falls inside that interval;
//! - it is a habit whose start date is not after the interval's end and
//!   whose recurrence rule produces an occurrence on the date;
//! - it is a focus item (standing reminders are visible on every date).
//!
//! Missing required fields fail closed: a habit without a recurrence rule
//! is simply never in scope. The one deliberate exception is the local
//! day interval itself: if the calendar cannot produce bounds for a valid
//! date (a DST edge), the filter admits everything rather than silently
//! hiding the user's items. That fail-open choice is intentional.

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::day_part::DayPart;
use crate::item::{Item, ItemKind};
use crate::recurrence::item_occurs_on;

/// Bounds of `date` in the local calendar: midnight to next midnight.
///
/// Returns `None` when either bound does not exist in local time.
pub fn local_day_interval(date: NaiveDate) -> Option<(DateTime<Local>, DateTime<Local>)> {
    let start = Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .single()?;
    let end = Local
        .from_local_datetime(&date.succ_opt()?.and_hms_opt(0, 0, 0)?)
        .single()?;
    Some((start, end))
}

/// Whether `item` is in scope for `date`, limited to `kinds`.
pub fn is_in_scope(item: &Item, date: NaiveDate, kinds: &[ItemKind]) -> bool {
    if !kinds.contains(&item.kind) {
        return false;
    }
    if item.kind == ItemKind::Focus {
        return true;
    }
    let Some((start, end)) = local_day_interval(date) else {
        // Fail open: admitting everything beats hiding everything.
        return true;
    };
    let in_window = |instant: DateTime<chrono::Utc>| {
        let local = instant.with_timezone(&Local);
        start <= local && local < end
    };

    let by_time = item.time.map(in_window).unwrap_or(false);
    let by_deadline = item.time.is_none() && item.deadline.map(in_window).unwrap_or(false);
    let by_recurrence = item.kind == ItemKind::Habit
        && item
            .start_date
            .map(|s| s.with_timezone(&Local) < end)
            .unwrap_or(true)
        && item_occurs_on(item, date);

    by_time || by_deadline || by_recurrence
}

/// Whether `item` matches a requested day-part bucket on `date`.
///
/// When `date` is today, the today override wins if set, otherwise the
/// stored bucket is compared directly; symmetric for yesterday. For any
/// other date only the stored bucket counts. Note this matches the stored
/// bucket, not the time-derived one: the filter narrows by what the user
/// scheduled, not by reminder clock time.
pub fn matches_day_part(item: &Item, date: NaiveDate, today: NaiveDate, bucket: DayPart) -> bool {
    let yesterday = today.pred_opt().unwrap_or(today);
    let moved = if date == today {
        item.today_moved_to
    } else if date == yesterday {
        item.yesterday_moved_to
    } else {
        None
    };
    match moved {
        Some(m) => m == bucket,
        None => item.day_part == Some(bucket),
    }
}
