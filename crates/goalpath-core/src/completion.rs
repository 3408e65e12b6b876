//! Completion, reschedule, and rollover transitions.
//!
//! Every transition here is a pure function from an item (or a category
//! cascade) to its mutated successor; the engine persists the result and
//! only then lets callers observe it. "Missed" is a derived view, never a
//! stored flag.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::day_part::{effective_day_part, DayPart};
use crate::item::category::next_order_in_area;
use crate::item::{Category, Item, ItemKind};

/// Derived presentation state of an item on a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    Completed,
    Missed,
}

/// Derive an item's status for `on`.
///
/// An item with a deadline is missed when the reference date is yesterday
/// and it was not completed by end of yesterday, or when the reference
/// date is today, it is not completed, and its effective day part has
/// already passed relative to `now_clock`.
pub fn status_of(item: &Item, on: NaiveDate, today: NaiveDate, now_clock: NaiveTime) -> ItemStatus {
    if item.is_completed {
        return ItemStatus::Completed;
    }
    if item.deadline.is_none() {
        return ItemStatus::Pending;
    }
    let yesterday = today.pred_opt().unwrap_or(today);
    if on == yesterday {
        return ItemStatus::Missed;
    }
    if on == today {
        if let Some(part) = effective_day_part(item, on, today) {
            if part < DayPart::of_time(now_clock) {
                return ItemStatus::Missed;
            }
        }
    }
    ItemStatus::Pending
}

/// Flip an item's completion flag.
pub fn toggle_complete(item: &Item) -> Item {
    let mut updated = item.clone();
    updated.is_completed = !updated.is_completed;
    updated.touch();
    updated
}

/// Toggle a category's completion, cascading to its contained items.
///
/// Completing clears the activation flag on the category and every
/// contained item, and moves the category to the back of its life area
/// (`order` becomes max existing + 1). Un-completing flips the flag back
/// without any re-ordering or flag changes.
pub fn toggle_category_complete(
    category: &Category,
    contained: &[Item],
    peers: &[Category],
) -> (Category, Vec<Item>) {
    let mut updated = category.clone();
    let completing = !updated.is_completed;
    updated.is_completed = completing;
    updated.touch();

    let mut items = Vec::new();
    if completing {
        updated.is_active = false;
        updated.order = next_order_in_area(peers, updated.life_area);
        for item in contained {
            if item.is_active {
                let mut cleared = item.clone();
                cleared.is_active = false;
                cleared.touch();
                items.push(cleared);
            }
        }
    }
    (updated, items)
}

/// Complete an item immediately, regardless of its date window.
///
/// This is the inbox-triage bridge: an undated capture can be marked done
/// whenever the user looks at it, no deadline required. Idempotent.
pub fn complete_now(item: &Item) -> Item {
    let mut updated = item.clone();
    updated.is_completed = true;
    updated.touch();
    updated
}

/// Move an item to a different day part for today or yesterday only.
///
/// Returns `None` when `to` already equals the item's current effective
/// day part for the context date (a UI-level no-op). An item with no
/// deadline gets `deadline = now` first, since a day-part move is
/// meaningless without an anchoring date.
pub fn reschedule(
    item: &Item,
    to: DayPart,
    is_today_context: bool,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Option<Item> {
    let on = if is_today_context {
        today
    } else {
        today.pred_opt().unwrap_or(today)
    };
    if effective_day_part(item, on, today) == Some(to) {
        return None;
    }
    let mut updated = item.clone();
    if updated.deadline.is_none() {
        updated.deadline = Some(now);
    }
    if is_today_context {
        updated.today_moved_to = Some(to);
    } else {
        updated.yesterday_moved_to = Some(to);
    }
    updated.touch();
    Some(updated)
}

/// Nightly reset of habit completion flags.
///
/// For each habit: a missing `last_rollover_date` is stamped with `today`
/// without resetting completion (first-run guard); a stale one resets
/// `is_completed` and stamps `today`. Returns only the habits that
/// changed, so running twice on the same day returns nothing the second
/// time.
pub fn rollover(items: &[Item], today: NaiveDate) -> Vec<Item> {
    let mut changed = Vec::new();
    for item in items {
        if item.kind != ItemKind::Habit {
            continue;
        }
        match item.last_rollover_date {
            None => {
                let mut updated = item.clone();
                updated.last_rollover_date = Some(today);
                updated.touch();
                changed.push(updated);
            }
            Some(last) if last != today => {
                let mut updated = item.clone();
                updated.is_completed = false;
                updated.last_rollover_date = Some(today);
                updated.touch();
                changed.push(updated);
            }
            Some(_) => {}
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{LifeArea, RecurrenceKind};
    use chrono::{Duration, Local};

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn at(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn completed_items_report_completed() {
        let mut item = Item::new(ItemKind::Task, "t").with_deadline(Utc::now());
        item.is_completed = true;
        assert_eq!(status_of(&item, today(), today(), at(10)), ItemStatus::Completed);
    }

    #[test]
    fn undated_items_are_never_missed() {
        let item = Item::new(ItemKind::Inbox, "capture");
        let yesterday = today() - Duration::days(1);
        assert_eq!(status_of(&item, yesterday, today(), at(10)), ItemStatus::Pending);
    }

    #[test]
    fn incomplete_yesterday_item_is_missed() {
        let item = Item::new(ItemKind::Task, "t").with_deadline(Utc::now() - Duration::days(1));
        let yesterday = today() - Duration::days(1);
        assert_eq!(status_of(&item, yesterday, today(), at(10)), ItemStatus::Missed);
    }

    #[test]
    fn today_item_missed_once_its_bucket_has_passed() {
        let item = Item::new(ItemKind::Task, "t")
            .with_deadline(Utc::now())
            .with_day_part(DayPart::Morning);

        // At 14:00 the morning bucket has passed.
        assert_eq!(status_of(&item, today(), today(), at(14)), ItemStatus::Missed);
        // At 09:00 it has not.
        assert_eq!(status_of(&item, today(), today(), at(9)), ItemStatus::Pending);
    }

    #[test]
    fn toggle_flips_both_ways() {
        let item = Item::new(ItemKind::Task, "t");
        let done = toggle_complete(&item);
        assert!(done.is_completed);
        let undone = toggle_complete(&done);
        assert!(!undone.is_completed);
    }

    #[test]
    fn completing_category_clears_flags_and_reorders() {
        let mut category = Category::new("Gym", LifeArea::Health);
        category.is_active = true;
        let mut peer = Category::new("Diet", LifeArea::Health);
        peer.order = 6;

        let mut active_item = Item::new(ItemKind::Task, "squat").with_category(category.id.clone());
        active_item.is_active = true;
        let inactive_item = Item::new(ItemKind::Task, "bench").with_category(category.id.clone());

        let (updated, items) = toggle_category_complete(
            &category,
            &[active_item, inactive_item],
            &[category.clone(), peer],
        );

        assert!(updated.is_completed);
        assert!(!updated.is_active);
        assert_eq!(updated.order, 7);
        // Only the item that actually had the flag set needs saving.
        assert_eq!(items.len(), 1);
        assert!(!items[0].is_active);
    }

    #[test]
    fn uncompleting_category_does_not_reorder() {
        let mut category = Category::new("Gym", LifeArea::Health);
        category.is_completed = true;
        category.order = 3;

        let (updated, items) = toggle_category_complete(&category, &[], &[category.clone()]);

        assert!(!updated.is_completed);
        assert_eq!(updated.order, 3);
        assert!(items.is_empty());
    }

    #[test]
    fn complete_now_works_without_deadline() {
        // Scenario: inbox item with no deadline.
        let item = Item::new(ItemKind::Inbox, "capture");
        assert!(item.deadline.is_none());

        let done = complete_now(&item);
        assert!(done.is_completed);
        assert!(done.deadline.is_none());
    }

    #[test]
    fn reschedule_is_noop_at_current_effective_part() {
        let mut item = Item::new(ItemKind::Task, "t")
            .with_deadline(Utc::now())
            .with_day_part(DayPart::Morning);
        assert!(reschedule(&item, DayPart::Morning, true, Utc::now(), today()).is_none());

        // With a today override in place, the override is the effective part.
        item.today_moved_to = Some(DayPart::Evening);
        assert!(reschedule(&item, DayPart::Evening, true, Utc::now(), today()).is_none());
    }

    #[test]
    fn reschedule_round_trips_through_effective_day_part() {
        let item = Item::new(ItemKind::Task, "t")
            .with_deadline(Utc::now())
            .with_day_part(DayPart::Morning);

        let moved = reschedule(&item, DayPart::Night, true, Utc::now(), today()).unwrap();
        assert_eq!(effective_day_part(&moved, today(), today()), Some(DayPart::Night));
        assert_eq!(moved.day_part, Some(DayPart::Morning)); // permanent schedule untouched
    }

    #[test]
    fn reschedule_yesterday_context_sets_yesterday_override() {
        let item = Item::new(ItemKind::Task, "t")
            .with_deadline(Utc::now() - Duration::days(1))
            .with_day_part(DayPart::Morning);

        let moved = reschedule(&item, DayPart::Evening, false, Utc::now(), today()).unwrap();
        assert_eq!(moved.yesterday_moved_to, Some(DayPart::Evening));
        assert!(moved.today_moved_to.is_none());
    }

    #[test]
    fn reschedule_assigns_deadline_to_undated_items() {
        let item = Item::new(ItemKind::Inbox, "capture").with_day_part(DayPart::Morning);
        let before = Utc::now();
        let moved = reschedule(&item, DayPart::Evening, true, before, today()).unwrap();
        assert_eq!(moved.deadline, Some(before));
    }

    #[test]
    fn rollover_first_run_stamps_without_reset() {
        let mut habit = Item::new_habit("run", Utc::now(), RecurrenceKind::Daily);
        habit.is_completed = true;

        let changed = rollover(&[habit], today());
        assert_eq!(changed.len(), 1);
        assert!(changed[0].is_completed); // first-run guard: no reset
        assert_eq!(changed[0].last_rollover_date, Some(today()));
    }

    #[test]
    fn rollover_resets_stale_habits() {
        // Scenario: habit completed two days ago.
        let mut habit = Item::new_habit("run", Utc::now(), RecurrenceKind::Daily);
        habit.is_completed = true;
        habit.last_rollover_date = Some(today() - Duration::days(2));

        let changed = rollover(&[habit], today());
        assert_eq!(changed.len(), 1);
        assert!(!changed[0].is_completed);
        assert_eq!(changed[0].last_rollover_date, Some(today()));
    }

    #[test]
    fn rollover_is_idempotent_within_a_day() {
        let mut habit = Item::new_habit("run", Utc::now(), RecurrenceKind::Daily);
        habit.is_completed = true;
        habit.last_rollover_date = Some(today() - Duration::days(1));

        let first = rollover(&[habit], today());
        assert_eq!(first.len(), 1);

        let second = rollover(&first, today());
        assert!(second.is_empty());
        assert!(!first[0].is_completed);
        assert_eq!(first[0].last_rollover_date, Some(today()));
    }

    #[test]
    fn rollover_ignores_non_habits() {
        let mut task = Item::new(ItemKind::Task, "t");
        task.is_completed = true;
        assert!(rollover(&[task], today()).is_empty());
    }
}
