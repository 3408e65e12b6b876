//! Day-part classification.
//!
//! Maps clock time onto a fixed set of coarse buckets and resolves the
//! *effective* day part of an item for a reference date, honoring the
//! one-shot today/yesterday overrides. The override fields are never
//! cleared by evaluation; because resolution always compares against the
//! current wall-clock date, a stale override from two days ago is simply
//! never read.

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Coarse time-of-day bucket.
///
/// The derived `Ord` follows declaration order:
/// morning < afternoon < evening < night < unknown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
    /// Explicit fallback value; never produced by classification.
    Unknown,
}

impl DayPart {
    /// All buckets, in comparison order.
    pub const ALL: [DayPart; 5] = [
        DayPart::Morning,
        DayPart::Afternoon,
        DayPart::Evening,
        DayPart::Night,
        DayPart::Unknown,
    ];

    /// Classify a clock time.
    ///
    /// Morning is [05:00, 12:00), afternoon [12:00, 18:00), evening
    /// [18:00, 23:00), everything else night.
    pub fn of_time(time: NaiveTime) -> DayPart {
        match time.hour() {
            5..=11 => DayPart::Morning,
            12..=17 => DayPart::Afternoon,
            18..=22 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    /// Stable storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Afternoon => "afternoon",
            DayPart::Evening => "evening",
            DayPart::Night => "night",
            DayPart::Unknown => "unknown",
        }
    }

    /// Parse a stable storage key.
    pub fn parse_key(key: &str) -> Option<Self> {
        match key {
            "morning" => Some(DayPart::Morning),
            "afternoon" => Some(DayPart::Afternoon),
            "evening" => Some(DayPart::Evening),
            "night" => Some(DayPart::Night),
            "unknown" => Some(DayPart::Unknown),
            _ => None,
        }
    }
}

/// Resolve the day part an item effectively occupies on `on`.
///
/// Precedence: the today override (when `on` is today), then the
/// yesterday override (when `on` is yesterday), then the classification
/// of the exact reminder time, then the stored bucket. Returns `None`
/// when the item has neither a time nor a bucket.
pub fn effective_day_part(item: &Item, on: NaiveDate, today: NaiveDate) -> Option<DayPart> {
    let yesterday = today.pred_opt().unwrap_or(today);
    if on == today {
        if let Some(moved) = item.today_moved_to {
            return Some(moved);
        }
    } else if on == yesterday {
        if let Some(moved) = item.yesterday_moved_to {
            return Some(moved);
        }
    }
    if let Some(time) = item.time {
        return Some(DayPart::of_time(time.with_timezone(&Local).time()));
    }
    item.day_part
}
