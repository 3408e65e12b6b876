//! Display ordering for in-scope items.
//!
//! A priority chain evaluated top-down, returning at the first criterion
//! that discriminates:
//!
//! 1. effective day part (only when both items resolve to one): morning
//!    items come before evening items;
//! 2. exact reminder time, hour then minute; a timed item sorts before an
//!    untimed one;
//! 3. active/pinned items before inactive peers;
//! 4. owning category's life area by fixed display order;
//! 5. otherwise equal, and the stable sort preserves incoming order.
//!
//! The chain is pure and deterministic for identical inputs, which the UI
//! relies on for diffing and animation stability.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Local, NaiveDate, Timelike};

use crate::day_part::effective_day_part;
use crate::item::{Category, Item, LifeArea};

/// Comparator over items for one reference date.
///
/// Carries the reference date, the current calendar day (for the
/// today/yesterday override rule), and a category-to-life-area lookup for
/// the final criterion.
pub struct ItemOrderingPolicy {
    on: NaiveDate,
    today: NaiveDate,
    life_areas: HashMap<String, LifeArea>,
}

impl ItemOrderingPolicy {
    /// Build a policy from the fetched categories.
    pub fn new(on: NaiveDate, today: NaiveDate, categories: &[Category]) -> Self {
        let life_areas = categories
            .iter()
            .map(|c| (c.id.clone(), c.life_area))
            .collect();
        ItemOrderingPolicy { on, today, life_areas }
    }

    /// Compare two items per the priority chain.
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        // 1. Effective day part, when both resolve.
        let part_a = effective_day_part(a, self.on, self.today);
        let part_b = effective_day_part(b, self.on, self.today);
        if let (Some(pa), Some(pb)) = (part_a, part_b) {
            match pa.cmp(&pb) {
                Ordering::Equal => {}
                other => return other,
            }
        }

        // 2. Exact reminder time; timed items sort before untimed.
        match (a.time, b.time) {
            (Some(ta), Some(tb)) => {
                let key = |t: chrono::DateTime<chrono::Utc>| {
                    let local = t.with_timezone(&Local).time();
                    (local.hour(), local.minute())
                };
                match key(ta).cmp(&key(tb)) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => {}
        }

        // 3. Active items surface above inactive peers.
        match (a.is_active, b.is_active) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }

        // 4. Life area of the owning category; uncategorized items sink
        //    below every area.
        self.area_rank(a).cmp(&self.area_rank(b))
    }

    /// Stable-sort items in place per the chain.
    pub fn sort(&self, items: &mut [Item]) {
        items.sort_by(|a, b| self.compare(a, b));
    }

    fn area_rank(&self, item: &Item) -> u8 {
        item.category_id
            .as_deref()
            .and_then(|id| self.life_areas.get(id))
            .map(|area| area.display_rank())
            .unwrap_or(u8::MAX)
    }
}
