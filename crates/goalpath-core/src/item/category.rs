//! Category types: the labeled container items belong to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Life area a category belongs to.
///
/// A fixed four-value classification with a fixed display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LifeArea {
    Health,
    Relations,
    Wealth,
    Personal,
}

impl LifeArea {
    /// All areas, in display order.
    pub const ALL: [LifeArea; 4] = [
        LifeArea::Health,
        LifeArea::Relations,
        LifeArea::Wealth,
        LifeArea::Personal,
    ];

    /// Fixed display rank: health < relations < wealth < personal.
    pub fn display_rank(&self) -> u8 {
        match self {
            LifeArea::Health => 0,
            LifeArea::Relations => 1,
            LifeArea::Wealth => 2,
            LifeArea::Personal => 3,
        }
    }

    /// Stable storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifeArea::Health => "health",
            LifeArea::Relations => "relations",
            LifeArea::Wealth => "wealth",
            LifeArea::Personal => "personal",
        }
    }

    /// Parse a stable storage key.
    pub fn parse_key(key: &str) -> Option<Self> {
        match key {
            "health" => Some(LifeArea::Health),
            "relations" => Some(LifeArea::Relations),
            "wealth" => Some(LifeArea::Wealth),
            "personal" => Some(LifeArea::Personal),
            _ => None,
        }
    }
}

/// A labeled container for items within one life area.
///
/// `order` is unique within the life area: assigned as max-existing + 1 at
/// creation, and reassigned the same way when the category is completed so
/// finished categories sink to the back of their area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: String,
    /// Category title
    pub title: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Owning life area
    pub life_area: LifeArea,
    /// Display order within the life area
    pub order: i32,
    /// User-pinned/highlighted flag
    pub is_active: bool,
    /// Whether the category is completed
    pub is_completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category. `order` starts at 0 and is assigned by the
    /// engine when the category is saved.
    pub fn new(title: impl Into<String>, life_area: LifeArea) -> Self {
        let now = Utc::now();
        Category {
            id: format!("cat-{}-{}", now.timestamp(), uuid::Uuid::new_v4()),
            title: title.into(),
            notes: String::new(),
            life_area,
            order: 0,
            is_active: false,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Next free `order` value within a life area: max existing + 1.
pub fn next_order_in_area(categories: &[Category], area: LifeArea) -> i32 {
    categories
        .iter()
        .filter(|c| c.life_area == area)
        .map(|c| c.order)
        .max()
        .map(|max| max + 1)
        .unwrap_or(0)
}
