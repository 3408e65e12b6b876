//! # Goalpath Core Library
//!
//! This library provides the core business logic for Goalpath, a personal
//! goal and task tracker. The presentation layer is expected to be a thin
//! shell over this crate: it fetches items, asks the engine which ones are
//! relevant for a date, and applies user actions through the engine.
//!
//! ## Architecture
//!
//! - **Day parts**: A fixed classification of clock time into coarse
//!   buckets (morning/afternoon/evening/night), with per-day overrides
//!   that let an item be "moved" within today or yesterday without
//!   touching its permanent schedule
//! - **Recurrence**: A small closed set of repetition rules for habits
//!   (daily, weekday-only, weekend-only, weekly on the anchor weekday)
//! - **Visibility**: The date-window membership test deciding which items
//!   show up on a given calendar day
//! - **Ordering**: A deterministic multi-criterion sort for display
//! - **Completion**: The toggle/reschedule/rollover state transitions,
//!   including the nightly reset of habit completion flags
//! - **Storage**: SQLite-based item storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`GoalEngine`]: The facade the UI talks to
//! - [`ItemStore`]: The persistence seam consumed by the engine
//! - [`Database`]: SQLite implementation of [`ItemStore`]
//! - [`Item`] / [`Category`]: The scheduled unit and its container

pub mod completion;
pub mod day_part;
pub mod engine;
pub mod error;
pub mod item;
pub mod ordering;
pub mod recurrence;
pub mod storage;
pub mod visibility;

pub use completion::{status_of, ItemStatus};
pub use day_part::{effective_day_part, DayPart};
pub use engine::GoalEngine;
pub use error::{ConfigError, CoreError, ScheduleError, StoreError, ValidationError};
pub use item::{Category, Item, ItemKind, LifeArea, RecurrenceKind};
pub use ordering::ItemOrderingPolicy;
pub use recurrence::occurs_on;
pub use storage::{AppConfig, Database, ItemStore};
pub use visibility::{is_in_scope, matches_day_part};
