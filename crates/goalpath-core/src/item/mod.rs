//! Item types: the schedulable unit and its closed enumerations.
//!
//! An [`Item`] is one of five kinds, and the kind drives which optional
//! fields are meaningful:
//!
//! - task / milestone / inbox: scheduled by `deadline`
//! - habit: scheduled by `start_date` + `recurrence`
//! - focus: a standing reminder with no date fields at all
//!
//! Enum variants carry stable storage keys (via [`serde`] renames and
//! `as_str`/`parse_key`) that are distinct from any user-facing label, so
//! display text can be localized without touching persisted identity.

pub mod category;

pub use category::{Category, LifeArea};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::day_part::DayPart;
use crate::error::{ScheduleError, ValidationError};

/// Kind of item, fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// One-shot piece of work with a deadline.
    Task,
    /// Repeating item driven by `start_date` + `recurrence`.
    Habit,
    /// Measurable step contributing a fraction of its category's progress.
    Milestone,
    /// Standing reminder, visible on every date.
    Focus,
    /// Unattached capture; triaged into a task or a category later.
    Inbox,
}

impl ItemKind {
    /// All kinds, in display order.
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Task,
        ItemKind::Habit,
        ItemKind::Milestone,
        ItemKind::Focus,
        ItemKind::Inbox,
    ];

    /// Stable storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Task => "task",
            ItemKind::Habit => "habit",
            ItemKind::Milestone => "milestone",
            ItemKind::Focus => "focus",
            ItemKind::Inbox => "inbox",
        }
    }

    /// Parse a stable storage key.
    pub fn parse_key(key: &str) -> Option<Self> {
        match key {
            "task" => Some(ItemKind::Task),
            "habit" => Some(ItemKind::Habit),
            "milestone" => Some(ItemKind::Milestone),
            "focus" => Some(ItemKind::Focus),
            "inbox" => Some(ItemKind::Inbox),
            _ => None,
        }
    }
}

/// Recurrence rule for habits.
///
/// Intentionally a small closed set; there is no "every N days" and no
/// exclusion list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    /// Occurs every day.
    Daily,
    /// Occurs Monday through Friday.
    WeekdaysOnly,
    /// Occurs Saturday and Sunday.
    WeekendsOnly,
    /// Occurs on the weekday of the habit's start date.
    WeeklyOnAnchor,
}

impl RecurrenceKind {
    /// Stable storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::WeekdaysOnly => "weekdays_only",
            RecurrenceKind::WeekendsOnly => "weekends_only",
            RecurrenceKind::WeeklyOnAnchor => "weekly_on_anchor",
        }
    }

    /// Parse a stable storage key.
    pub fn parse_key(key: &str) -> Option<Self> {
        match key {
            "daily" => Some(RecurrenceKind::Daily),
            "weekdays_only" => Some(RecurrenceKind::WeekdaysOnly),
            "weekends_only" => Some(RecurrenceKind::WeekendsOnly),
            "weekly_on_anchor" => Some(RecurrenceKind::WeeklyOnAnchor),
            _ => None,
        }
    }
}

/// The unit the engine schedules.
///
/// An item optionally belongs to exactly one [`Category`]; absence means
/// it sits in the inbox. Exactly one of `time`/`day_part` is the source of
/// truth for effective scheduling, with `time` winning when both are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier
    pub id: String,
    /// Immutable item kind selected at creation
    pub kind: ItemKind,
    /// Item title
    pub title: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Whether the item is completed
    pub is_completed: bool,
    /// User-pinned/highlighted flag
    pub is_active: bool,
    /// Due instant for task/milestone/inbox items
    pub deadline: Option<DateTime<Utc>>,
    /// Exact reminder instant; its local clock time classifies the item
    /// into a day part and takes precedence over `day_part`
    pub time: Option<DateTime<Utc>>,
    /// Coarse scheduling bucket, used when `time` is absent
    pub day_part: Option<DayPart>,
    /// One-shot day-part override applying only while the reference date
    /// is today; never persisted past the day boundary by evaluation
    pub today_moved_to: Option<DayPart>,
    /// One-shot day-part override applying only while the reference date
    /// is yesterday
    pub yesterday_moved_to: Option<DayPart>,
    /// Anchor start date for habits
    pub start_date: Option<DateTime<Utc>>,
    /// Recurrence rule for habits
    pub recurrence: Option<RecurrenceKind>,
    /// Milestone share of the parent category's progress, a multiple of
    /// 25 in [25, 100]
    pub fraction_of_parent: Option<f64>,
    /// Last calendar day the nightly completion reset ran for this habit
    pub last_rollover_date: Option<NaiveDate>,
    /// Manual display order
    pub display_order: i32,
    /// Owning category; `None` means inbox/unattached
    pub category_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a new item with default values.
    pub fn new(kind: ItemKind, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Item {
            id: format!("item-{}-{}", now.timestamp(), uuid::Uuid::new_v4()),
            kind,
            title: title.into(),
            notes: String::new(),
            is_completed: false,
            is_active: false,
            deadline: None,
            time: None,
            day_part: None,
            today_moved_to: None,
            yesterday_moved_to: None,
            start_date: None,
            recurrence: None,
            fraction_of_parent: None,
            last_rollover_date: None,
            display_order: 0,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a habit with its anchor start date and recurrence rule.
    ///
    /// Habits always carry both fields; this is the only constructor that
    /// sets them together.
    pub fn new_habit(
        title: impl Into<String>,
        start_date: DateTime<Utc>,
        recurrence: RecurrenceKind,
    ) -> Self {
        let mut item = Item::new(ItemKind::Habit, title);
        item.start_date = Some(start_date);
        item.recurrence = Some(recurrence);
        item
    }

    /// Set the deadline.
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the exact reminder time.
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the coarse scheduling bucket.
    pub fn with_day_part(mut self, day_part: DayPart) -> Self {
        self.day_part = Some(day_part);
        self
    }

    /// Attach to a category at creation time.
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Whether this item sits in the inbox (no owning category).
    pub fn is_inbox(&self) -> bool {
        self.kind == ItemKind::Inbox && self.category_id.is_none()
    }

    /// Check that the schedule fields required by this item's kind are
    /// present. Editors call this before saving a habit; evaluation
    /// itself never errors on malformed items (they fall out of scope).
    ///
    /// # Errors
    /// Returns an error for a habit missing its start date or its
    /// recurrence rule. Other kinds always validate.
    pub fn validate_schedule(&self) -> Result<(), ScheduleError> {
        if self.kind != ItemKind::Habit {
            return Ok(());
        }
        if self.start_date.is_none() {
            return Err(ScheduleError::MissingStartDate {
                item_id: self.id.clone(),
            });
        }
        if self.recurrence.is_none() {
            return Err(ScheduleError::MissingRecurrence {
                item_id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Set the milestone fraction, coercing 0 to 25.
    ///
    /// # Errors
    /// Returns an error unless the value (after coercion) is a multiple
    /// of 25 in [25, 100].
    pub fn set_fraction_of_parent(&mut self, value: f64) -> Result<(), ValidationError> {
        let value = if value == 0.0 { 25.0 } else { value };
        let valid = value.fract() == 0.0 && matches!(value as i64, 25 | 50 | 75 | 100);
        if !valid {
            return Err(ValidationError::InvalidFraction { value });
        }
        self.fraction_of_parent = Some(value);
        self.touch();
        Ok(())
    }

    /// Bump the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
