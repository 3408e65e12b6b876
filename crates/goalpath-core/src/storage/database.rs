//! SQLite-backed item and category storage.
//!
//! Enum columns hold the stable storage keys (`ItemKind::as_str` and
//! friends), instants are RFC 3339 text, and calendar days are
//! `YYYY-MM-DD` text. `save` runs inside a single transaction so a
//! category-plus-items cascade commits or fails as one unit.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use super::ItemStore;
use crate::day_part::DayPart;
use crate::error::StoreError;
use crate::item::{Category, Item, ItemKind, LifeArea, RecurrenceKind};

/// SQLite database holding the user's goal list.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/goalpath/goalpath.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = super::data_dir()?.join("goalpath.db");
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and ephemeral use).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS categories (
                id            TEXT PRIMARY KEY,
                title         TEXT NOT NULL,
                notes         TEXT NOT NULL DEFAULT '',
                life_area     TEXT NOT NULL,
                display_order INTEGER NOT NULL DEFAULT 0,
                is_active     INTEGER NOT NULL DEFAULT 0,
                is_completed  INTEGER NOT NULL DEFAULT 0,
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS items (
                id                 TEXT PRIMARY KEY,
                kind               TEXT NOT NULL,
                title              TEXT NOT NULL,
                notes              TEXT NOT NULL DEFAULT '',
                is_completed       INTEGER NOT NULL DEFAULT 0,
                is_active          INTEGER NOT NULL DEFAULT 0,
                deadline           TEXT,
                time               TEXT,
                day_part           TEXT,
                today_moved_to     TEXT,
                yesterday_moved_to TEXT,
                start_date         TEXT,
                recurrence         TEXT,
                fraction_of_parent REAL,
                last_rollover_date TEXT,
                display_order      INTEGER NOT NULL DEFAULT 0,
                category_id        TEXT,
                created_at         TEXT NOT NULL,
                updated_at         TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_items_category_id ON items(category_id);
            CREATE INDEX IF NOT EXISTS idx_items_kind ON items(kind);",
        )?;
        Ok(())
    }

    fn upsert_category(&self, category: &Category) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO categories
             (id, title, notes, life_area, display_order, is_active, is_completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                category.id,
                category.title,
                category.notes,
                category.life_area.as_str(),
                category.order,
                category.is_active,
                category.is_completed,
                category.created_at.to_rfc3339(),
                category.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn upsert_item(&self, item: &Item) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO items
             (id, kind, title, notes, is_completed, is_active, deadline, time, day_part,
              today_moved_to, yesterday_moved_to, start_date, recurrence, fraction_of_parent,
              last_rollover_date, display_order, category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                item.id,
                item.kind.as_str(),
                item.title,
                item.notes,
                item.is_completed,
                item.is_active,
                item.deadline.map(|d| d.to_rfc3339()),
                item.time.map(|t| t.to_rfc3339()),
                item.day_part.map(|p| p.as_str()),
                item.today_moved_to.map(|p| p.as_str()),
                item.yesterday_moved_to.map(|p| p.as_str()),
                item.start_date.map(|d| d.to_rfc3339()),
                item.recurrence.map(|r| r.as_str()),
                item.fraction_of_parent,
                item.last_rollover_date.map(|d| d.format("%Y-%m-%d").to_string()),
                item.display_order,
                item.category_id,
                item.created_at.to_rfc3339(),
                item.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl ItemStore for Database {
    fn fetch_all_items(&self) -> Result<Vec<Item>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, title, notes, is_completed, is_active, deadline, time, day_part,
                    today_moved_to, yesterday_moved_to, start_date, recurrence, fraction_of_parent,
                    last_rollover_date, display_order, category_id, created_at, updated_at
             FROM items
             ORDER BY display_order, created_at",
        )?;
        let rows = stmt.query_map([], item_from_row)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    fn fetch_all_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, notes, life_area, display_order, is_active, is_completed,
                    created_at, updated_at
             FROM categories
             ORDER BY life_area, display_order",
        )?;
        let rows = stmt.query_map([], category_from_row)?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }

    fn save(&self, categories: &[Category], items: &[Item]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        for category in categories {
            self.upsert_category(category)?;
        }
        for item in items {
            self.upsert_item(item)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_item(&self, id: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM items WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        self.conn
            .execute("DELETE FROM items WHERE category_id = ?1", params![id])?;
        self.conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        kind: decode_key(1, &row.get::<_, String>(1)?, ItemKind::parse_key, "item kind")?,
        title: row.get(2)?,
        notes: row.get(3)?,
        is_completed: row.get(4)?,
        is_active: row.get(5)?,
        deadline: parse_opt_utc(6, row.get(6)?)?,
        time: parse_opt_utc(7, row.get(7)?)?,
        day_part: decode_opt_key(8, row.get(8)?, DayPart::parse_key, "day part")?,
        today_moved_to: decode_opt_key(9, row.get(9)?, DayPart::parse_key, "day part")?,
        yesterday_moved_to: decode_opt_key(10, row.get(10)?, DayPart::parse_key, "day part")?,
        start_date: parse_opt_utc(11, row.get(11)?)?,
        recurrence: decode_opt_key(12, row.get(12)?, RecurrenceKind::parse_key, "recurrence")?,
        fraction_of_parent: row.get(13)?,
        last_rollover_date: parse_opt_date(14, row.get(14)?)?,
        display_order: row.get(15)?,
        category_id: row.get(16)?,
        created_at: parse_utc(17, row.get(17)?)?,
        updated_at: parse_utc(18, row.get(18)?)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        title: row.get(1)?,
        notes: row.get(2)?,
        life_area: decode_key(3, &row.get::<_, String>(3)?, LifeArea::parse_key, "life area")?,
        order: row.get(4)?,
        is_active: row.get(5)?,
        is_completed: row.get(6)?,
        created_at: parse_utc(7, row.get(7)?)?,
        updated_at: parse_utc(8, row.get(8)?)?,
    })
}

fn decode_key<T>(
    col: usize,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
    what: &str,
) -> rusqlite::Result<T> {
    parse(key).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            col,
            Type::Text,
            format!("unknown {what} key: {key}").into(),
        )
    })
}

fn decode_opt_key<T>(
    col: usize,
    key: Option<String>,
    parse: impl Fn(&str) -> Option<T>,
    what: &str,
) -> rusqlite::Result<Option<T>> {
    key.map(|k| decode_key(col, &k, parse, what)).transpose()
}

fn parse_utc(col: usize, text: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(e)))
}

fn parse_opt_utc(col: usize, text: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    text.map(|t| parse_utc(col, t)).transpose()
}

fn parse_opt_date(col: usize, text: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    text.map(|t| {
        NaiveDate::parse_from_str(&t, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(e)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::RecurrenceKind;
    use chrono::Duration;

    #[test]
    fn item_round_trip() {
        let db = Database::open_memory().unwrap();
        let mut item = Item::new_habit("Run", Utc::now(), RecurrenceKind::WeeklyOnAnchor)
            .with_day_part(DayPart::Morning);
        item.last_rollover_date = Some(Utc::now().date_naive());
        item.today_moved_to = Some(DayPart::Evening);

        db.save(&[], std::slice::from_ref(&item)).unwrap();
        let fetched = db.fetch_all_items().unwrap();

        assert_eq!(fetched.len(), 1);
        let got = &fetched[0];
        assert_eq!(got.id, item.id);
        assert_eq!(got.kind, ItemKind::Habit);
        assert_eq!(got.recurrence, Some(RecurrenceKind::WeeklyOnAnchor));
        assert_eq!(got.day_part, Some(DayPart::Morning));
        assert_eq!(got.today_moved_to, Some(DayPart::Evening));
        assert_eq!(got.last_rollover_date, item.last_rollover_date);
        assert_eq!(got.start_date.map(|d| d.timestamp()), item.start_date.map(|d| d.timestamp()));
    }

    #[test]
    fn category_round_trip() {
        let db = Database::open_memory().unwrap();
        let mut category = Category::new("Gym", LifeArea::Health);
        category.order = 4;
        category.is_active = true;

        db.save(std::slice::from_ref(&category), &[]).unwrap();
        let fetched = db.fetch_all_categories().unwrap();

        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].life_area, LifeArea::Health);
        assert_eq!(fetched[0].order, 4);
        assert!(fetched[0].is_active);
    }

    #[test]
    fn save_overwrites_by_id() {
        let db = Database::open_memory().unwrap();
        let mut item = Item::new(ItemKind::Task, "Before");
        db.save(&[], std::slice::from_ref(&item)).unwrap();

        item.title = "After".to_string();
        item.is_completed = true;
        db.save(&[], std::slice::from_ref(&item)).unwrap();

        let fetched = db.fetch_all_items().unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].title, "After");
        assert!(fetched[0].is_completed);
    }

    #[test]
    fn delete_category_cascades_to_items() {
        let db = Database::open_memory().unwrap();
        let category = Category::new("Gym", LifeArea::Health);
        let owned = Item::new(ItemKind::Task, "squat").with_category(category.id.clone());
        let loose = Item::new(ItemKind::Inbox, "loose");

        db.save(std::slice::from_ref(&category), &[owned, loose.clone()])
            .unwrap();
        db.delete_category(&category.id).unwrap();

        assert!(db.fetch_all_categories().unwrap().is_empty());
        let remaining = db.fetch_all_items().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, loose.id);
    }

    #[test]
    fn delete_item() {
        let db = Database::open_memory().unwrap();
        let item = Item::new(ItemKind::Task, "t");
        db.save(&[], std::slice::from_ref(&item)).unwrap();
        db.delete_item(&item.id).unwrap();
        assert!(db.fetch_all_items().unwrap().is_empty());
    }

    #[test]
    fn fetch_orders_by_display_order() {
        let db = Database::open_memory().unwrap();
        let mut first = Item::new(ItemKind::Task, "second-created");
        first.display_order = 0;
        let mut second = Item::new(ItemKind::Task, "first-created");
        second.display_order = 1;
        // created_at differs by construction order; display_order wins.
        first.created_at = first.created_at + Duration::seconds(5);

        db.save(&[], &[second.clone(), first.clone()]).unwrap();
        let fetched = db.fetch_all_items().unwrap();
        assert_eq!(fetched[0].id, first.id);
        assert_eq!(fetched[1].id, second.id);
    }

    #[test]
    fn unknown_enum_key_is_an_error() {
        let db = Database::open_memory().unwrap();
        let item = Item::new(ItemKind::Task, "t");
        db.save(&[], std::slice::from_ref(&item)).unwrap();
        db.conn
            .execute("UPDATE items SET kind = 'someday'", [])
            .unwrap();
        assert!(db.fetch_all_items().is_err());
    }
}
