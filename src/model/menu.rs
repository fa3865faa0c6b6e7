use serde::{Deserialize, Serialize};

use crate::error::ShopError;

/// Size of a regular cup in ounces.
pub const REGULAR_SIZE_OUNCES: u32 = 8;
/// Size of a large cup in ounces.
pub const LARGE_SIZE_OUNCES: u32 = 12;
/// Roughly 1 g of coffee per 17 ml of water, rounded to 2 g per ounce.
pub const REGULAR_RATIO_GRAMS_PER_OUNCE: u32 = 2;
/// Double strength.
pub const STRONG_RATIO_GRAMS_PER_OUNCE: u32 = 4;

/// A drink on the menu.
///
/// `size` is the finished volume in ounces and `coffee_ratio` the grams of
/// beans ground per ounce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub size: u32,
    pub coffee_ratio: u32,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, size: u32, coffee_ratio: u32) -> Self {
        Self { name: name.into(), size, coffee_ratio }
    }

    /// Grams of whole beans that have to be ground for this drink.
    pub fn beans_required(&self) -> u32 {
        self.coffee_ratio.saturating_mul(self.size)
    }
}

/// The read-only list of drinks a shop serves.
///
/// Serializes as a plain JSON list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Parses a menu from a JSON list. A menu needs at least one drink, and
    /// every drink a non-zero size and ratio.
    pub fn from_json(json: &str) -> Result<Self, ShopError> {
        let menu: Menu = serde_json::from_str(json)
            .map_err(|e| ShopError::InvalidConfig(format!("invalid menu: {e}")))?;
        if menu.is_empty() {
            return Err(ShopError::InvalidConfig("the menu has no drinks".into()));
        }
        if let Some(item) = menu.items.iter().find(|i| i.size == 0 || i.coffee_ratio == 0) {
            return Err(ShopError::InvalidConfig(format!(
                "`{}` needs a non-zero size and coffee ratio",
                item.name
            )));
        }
        Ok(menu)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new(vec![
            MenuItem::new("Regular", REGULAR_SIZE_OUNCES, REGULAR_RATIO_GRAMS_PER_OUNCE),
            MenuItem::new("Regular Strong", REGULAR_SIZE_OUNCES, STRONG_RATIO_GRAMS_PER_OUNCE),
            MenuItem::new("Large Regular", LARGE_SIZE_OUNCES, REGULAR_RATIO_GRAMS_PER_OUNCE),
            MenuItem::new("Large Strong", LARGE_SIZE_OUNCES, STRONG_RATIO_GRAMS_PER_OUNCE),
        ])
    }
}
