//! The engine facade consumed by the presentation layer.
//!
//! Construct one [`GoalEngine`] per process with its store collaborator
//! and pass references to consumers explicitly; there is no ambient
//! global instance. Every mutation follows the same shape: derive the
//! updated value from a clone, commit it through the store, and only
//! return it on success, so in-memory state never reflects a failed
//! commit.

use chrono::{Local, NaiveDate, Utc};

use crate::completion::{self, ItemStatus};
use crate::day_part::DayPart;
use crate::error::{Result, ValidationError};
use crate::item::category::next_order_in_area;
use crate::item::{Category, Item, ItemKind, LifeArea};
use crate::ordering::ItemOrderingPolicy;
use crate::storage::ItemStore;
use crate::visibility::{is_in_scope, matches_day_part};

/// Facade over the scheduling engine and its persistence collaborator.
pub struct GoalEngine<S: ItemStore> {
    store: S,
}

impl<S: ItemStore> GoalEngine<S> {
    /// Create an engine over a store.
    pub fn new(store: S) -> Self {
        GoalEngine { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Items in scope for `on`, filtered and ordered for display.
    ///
    /// Fetches everything and narrows in memory; there is no query
    /// pushdown. The result is deterministic for identical store
    /// contents.
    pub fn visible_items(
        &self,
        on: NaiveDate,
        kinds: &[ItemKind],
        day_part: Option<DayPart>,
    ) -> Result<Vec<Item>> {
        let items = self.store.fetch_all_items()?;
        let categories = self.store.fetch_all_categories()?;
        let today = Self::today();

        let mut visible: Vec<Item> = items
            .into_iter()
            .filter(|item| is_in_scope(item, on, kinds))
            .filter(|item| {
                day_part.map_or(true, |bucket| matches_day_part(item, on, today, bucket))
            })
            .collect();

        let policy = ItemOrderingPolicy::new(on, today, &categories);
        policy.sort(&mut visible);
        Ok(visible)
    }

    /// Derived status of an item for a reference date.
    pub fn status_of(&self, item: &Item, on: NaiveDate) -> ItemStatus {
        let now = Local::now();
        completion::status_of(item, on, now.date_naive(), now.time())
    }

    /// Flip an item's completion flag and persist it.
    pub fn toggle_complete(&self, item: &Item) -> Result<Item> {
        let updated = completion::toggle_complete(item);
        self.store.save(&[], std::slice::from_ref(&updated))?;
        Ok(updated)
    }

    /// Toggle a category's completion, cascading to its items.
    ///
    /// The category and every touched item commit in one store call.
    pub fn toggle_category_complete(&self, category: &Category) -> Result<(Category, Vec<Item>)> {
        let contained: Vec<Item> = self
            .store
            .fetch_all_items()?
            .into_iter()
            .filter(|item| item.category_id.as_deref() == Some(category.id.as_str()))
            .collect();
        let peers = self.store.fetch_all_categories()?;

        let (updated, items) = completion::toggle_category_complete(category, &contained, &peers);
        self.store.save(std::slice::from_ref(&updated), &items)?;
        Ok((updated, items))
    }

    /// Complete an item immediately (inbox triage) and persist it.
    pub fn complete_now(&self, item: &Item) -> Result<Item> {
        let updated = completion::complete_now(item);
        self.store.save(&[], std::slice::from_ref(&updated))?;
        Ok(updated)
    }

    /// Move an item to a different day part for today or yesterday.
    ///
    /// Returns `Ok(None)` when the move is a no-op (the target equals the
    /// current effective day part); nothing is persisted in that case.
    pub fn reschedule(
        &self,
        item: &Item,
        to: DayPart,
        is_today_context: bool,
    ) -> Result<Option<Item>> {
        let Some(updated) =
            completion::reschedule(item, to, is_today_context, Utc::now(), Self::today())
        else {
            return Ok(None);
        };
        self.store.save(&[], std::slice::from_ref(&updated))?;
        Ok(Some(updated))
    }

    /// Run the nightly habit reset for the current calendar day.
    ///
    /// Intended to run once per app foreground/launch; running it twice
    /// on the same day persists nothing the second time.
    pub fn rollover(&self) -> Result<Vec<Item>> {
        let items = self.store.fetch_all_items()?;
        let changed = completion::rollover(&items, Self::today());
        if !changed.is_empty() {
            self.store.save(&[], &changed)?;
        }
        Ok(changed)
    }

    /// Create a category, assigning it the next order in its life area.
    ///
    /// # Errors
    /// Rejects titles that case-insensitively collide with an existing
    /// category.
    pub fn create_category(
        &self,
        title: impl Into<String>,
        notes: impl Into<String>,
        life_area: LifeArea,
    ) -> Result<Category> {
        let title = title.into();
        let existing = self.store.fetch_all_categories()?;
        if title_collides(&existing, &title, None) {
            return Err(ValidationError::DuplicateCategoryTitle { title }.into());
        }
        let mut category = Category::new(title, life_area);
        category.notes = notes.into();
        category.order = next_order_in_area(&existing, life_area);
        self.store.save(std::slice::from_ref(&category), &[])?;
        Ok(category)
    }

    /// Rename a category, with the same duplicate-title check.
    pub fn rename_category(&self, category: &Category, new_title: impl Into<String>) -> Result<Category> {
        let new_title = new_title.into();
        let existing = self.store.fetch_all_categories()?;
        if title_collides(&existing, &new_title, Some(&category.id)) {
            return Err(ValidationError::DuplicateCategoryTitle { title: new_title }.into());
        }
        let mut updated = category.clone();
        updated.title = new_title;
        updated.touch();
        self.store.save(std::slice::from_ref(&updated), &[])?;
        Ok(updated)
    }

    /// Attach an item to a category, removing inbox status.
    pub fn attach_to_category(&self, item: &Item, category: &Category) -> Result<Item> {
        let mut updated = item.clone();
        updated.category_id = Some(category.id.clone());
        if updated.kind == ItemKind::Inbox {
            updated.kind = ItemKind::Task;
        }
        updated.touch();
        self.store.save(&[], std::slice::from_ref(&updated))?;
        Ok(updated)
    }

    /// Turn an inbox item into a category of its own.
    ///
    /// The item is deleted only after the new category commits, so a
    /// failure can leave both behind but never neither.
    pub fn promote_to_category(&self, item: &Item, life_area: LifeArea) -> Result<Category> {
        if item.kind != ItemKind::Inbox {
            return Err(ValidationError::NotAnInboxItem {
                id: item.id.clone(),
            }
            .into());
        }
        let category = self.create_category(item.title.clone(), item.notes.clone(), life_area)?;
        self.store.delete_item(&item.id)?;
        Ok(category)
    }

    /// Delete a category and its contained items.
    pub fn delete_category(&self, category: &Category) -> Result<()> {
        self.store.delete_category(&category.id)?;
        Ok(())
    }
}

fn title_collides(categories: &[Category], title: &str, exclude_id: Option<&str>) -> bool {
    let needle = title.to_lowercase();
    categories.iter().any(|c| {
        exclude_id.map_or(true, |id| c.id != id) && c.title.to_lowercase() == needle
    })
}
