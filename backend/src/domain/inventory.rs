//! Inventory catalogue model and derived read projections.
//!
//! Items carry a non-negative on-hand quantity and unit price. Zero is a
//! legitimate value for both; only absent or negative values are rejected.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum allowed length for an item name, in characters.
pub const ITEM_NAME_MAX: usize = 100;

/// Validation errors returned by the inventory constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryValidationError {
    /// Identifier was zero or negative.
    NonPositiveId,
    /// Name was empty once trimmed.
    EmptyName,
    /// Name exceeded `max` characters.
    NameTooLong { max: usize },
    /// Quantity was below zero.
    NegativeQuantity,
    /// Price was negative or not finite.
    InvalidPrice,
}

impl fmt::Display for InventoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "inventory id must be a positive integer"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::NegativeQuantity => write!(f, "quantity must be zero or greater"),
            Self::InvalidPrice => write!(f, "price must be a finite number, zero or greater"),
        }
    }
}

impl std::error::Error for InventoryValidationError {}

/// Stable inventory item identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct InventoryItemId(i32);

impl InventoryItemId {
    /// Validate and construct an [`InventoryItemId`].
    pub fn new(id: i32) -> Result<Self, InventoryValidationError> {
        if id <= 0 {
            return Err(InventoryValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer value as stored.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<InventoryItemId> for i32 {
    fn from(value: InventoryItemId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for InventoryItemId {
    type Error = InventoryValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name of a catalogue item; trimmed, non-empty, bounded length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemName(String);

impl ItemName {
    /// Validate and construct an [`ItemName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, InventoryValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InventoryValidationError::EmptyName);
        }
        if trimmed.chars().count() > ITEM_NAME_MAX {
            return Err(InventoryValidationError::NameTooLong { max: ITEM_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Quantity on hand for an item; never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StockQuantity(i32);

impl StockQuantity {
    /// Validate and construct a [`StockQuantity`].
    pub fn new(quantity: i32) -> Result<Self, InventoryValidationError> {
        if quantity < 0 {
            return Err(InventoryValidationError::NegativeQuantity);
        }
        Ok(Self(quantity))
    }

    /// Raw integer value as stored.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// Unit price of an item; finite and never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct UnitPrice(f64);

impl UnitPrice {
    /// Validate and construct a [`UnitPrice`].
    pub fn new(price: f64) -> Result<Self, InventoryValidationError> {
        if !price.is_finite() || price < 0.0 {
            return Err(InventoryValidationError::InvalidPrice);
        }
        Ok(Self(price))
    }

    /// Raw value as stored.
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Catalogue item.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    /// Store-assigned identifier.
    pub id: InventoryItemId,
    /// Display name.
    pub name: ItemName,
    /// Units currently on hand.
    pub quantity: StockQuantity,
    /// Price per unit.
    pub price: UnitPrice,
}

/// Insert payload for a new catalogue item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    /// Display name.
    pub name: ItemName,
    /// Initial units on hand.
    pub quantity: StockQuantity,
    /// Price per unit.
    pub price: UnitPrice,
}

/// Partial update for a catalogue item. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryItemPatch {
    /// Replacement name, if any.
    pub name: Option<ItemName>,
    /// Replacement on-hand quantity, if any.
    pub quantity: Option<StockQuantity>,
    /// Replacement unit price, if any.
    pub price: Option<UnitPrice>,
}

impl InventoryItemPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.price.is_none()
    }

    /// Apply the patch to an item, keeping values for omitted fields.
    ///
    /// # Examples
    /// ```
    /// use inventory_backend::domain::{
    ///     InventoryItem, InventoryItemId, InventoryItemPatch, ItemName, StockQuantity, UnitPrice,
    /// };
    ///
    /// let item = InventoryItem {
    ///     id: InventoryItemId::new(1).unwrap(),
    ///     name: ItemName::new("Widget").unwrap(),
    ///     quantity: StockQuantity::new(10).unwrap(),
    ///     price: UnitPrice::new(2.5).unwrap(),
    /// };
    /// let patch = InventoryItemPatch {
    ///     quantity: Some(StockQuantity::new(3).unwrap()),
    ///     ..InventoryItemPatch::default()
    /// };
    /// let updated = patch.apply_to(item);
    /// assert_eq!(updated.quantity.get(), 3);
    /// assert_eq!(updated.name.as_ref(), "Widget");
    /// ```
    pub fn apply_to(&self, item: InventoryItem) -> InventoryItem {
        InventoryItem {
            id: item.id,
            name: self.name.clone().unwrap_or(item.name),
            quantity: self.quantity.unwrap_or(item.quantity),
            price: self.price.unwrap_or(item.price),
        }
    }
}

/// Catalogue-wide totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventorySummary {
    /// Number of catalogue items.
    pub total_items: usize,
    /// Sum of quantity times price, rounded to cents.
    pub total_value: f64,
}

impl InventorySummary {
    /// Summarise a catalogue: item count and Σ(quantity × price) rounded to
    /// two decimal places.
    ///
    /// # Examples
    /// ```
    /// use inventory_backend::domain::InventorySummary;
    ///
    /// let summary = InventorySummary::from_items(&[]);
    /// assert_eq!(summary.total_items, 0);
    /// assert_eq!(summary.total_value, 0.0);
    /// ```
    pub fn from_items(items: &[InventoryItem]) -> Self {
        let raw: f64 = items
            .iter()
            .map(|item| f64::from(item.quantity.get()) * item.price.get())
            .sum();
        Self {
            total_items: items.len(),
            total_value: round_to_cents(raw),
        }
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One allocation row joined with its catalogue item, as read from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingRow {
    /// Item the allocation refers to.
    pub item_id: InventoryItemId,
    /// Current item name.
    pub name: ItemName,
    /// Current unit price.
    pub price: UnitPrice,
    /// Quantity recorded on this allocation row.
    pub allocated: i32,
}

/// Per-item view of what a user holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    /// Item held.
    pub item_id: InventoryItemId,
    /// Current item name.
    pub name: ItemName,
    /// Current unit price.
    pub price: UnitPrice,
    /// Total allocated to the user across all rows for this item.
    pub quantity: i64,
}

/// Collapse allocation rows into one entry per item, summing quantities.
///
/// Output is ordered by item id.
pub fn aggregate_holdings(rows: Vec<HoldingRow>) -> Vec<Holding> {
    let mut by_item: BTreeMap<InventoryItemId, Holding> = BTreeMap::new();
    for row in rows {
        by_item
            .entry(row.item_id)
            .and_modify(|holding| holding.quantity += i64::from(row.allocated))
            .or_insert_with(|| Holding {
                item_id: row.item_id,
                name: row.name.clone(),
                price: row.price,
                quantity: i64::from(row.allocated),
            });
    }
    by_item.into_values().collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn item(id: i32, name: &str, quantity: i32, price: f64) -> InventoryItem {
        InventoryItem {
            id: InventoryItemId::new(id).expect("id"),
            name: ItemName::new(name).expect("name"),
            quantity: StockQuantity::new(quantity).expect("quantity"),
            price: UnitPrice::new(price).expect("price"),
        }
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    fn stock_quantity_accepts_zero_and_positive(#[case] raw: i32) {
        assert_eq!(StockQuantity::new(raw).map(StockQuantity::get), Ok(raw));
    }

    #[rstest]
    fn stock_quantity_rejects_negative() {
        assert_eq!(
            StockQuantity::new(-1),
            Err(InventoryValidationError::NegativeQuantity)
        );
    }

    #[rstest]
    #[case(-0.01)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn unit_price_rejects_invalid(#[case] raw: f64) {
        assert_eq!(UnitPrice::new(raw), Err(InventoryValidationError::InvalidPrice));
    }

    #[rstest]
    fn unit_price_accepts_zero() {
        assert!(UnitPrice::new(0.0).is_ok());
    }

    #[rstest]
    #[case("", InventoryValidationError::EmptyName)]
    #[case("  ", InventoryValidationError::EmptyName)]
    #[case(&"n".repeat(ITEM_NAME_MAX + 1), InventoryValidationError::NameTooLong { max: ITEM_NAME_MAX })]
    fn item_name_rejects_invalid(#[case] raw: &str, #[case] expected: InventoryValidationError) {
        assert_eq!(ItemName::new(raw), Err(expected));
    }

    #[rstest]
    fn summary_of_empty_catalogue_is_zero() {
        let summary = InventorySummary::from_items(&[]);
        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.total_value, 0.0);
    }

    #[rstest]
    fn summary_sums_quantity_times_price() {
        let summary = InventorySummary::from_items(&[
            item(1, "Widget", 10, 2.50),
            item(2, "Gadget", 4, 1.25),
        ]);
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_value, 30.00);
    }

    #[rstest]
    fn summary_rounds_to_cents() {
        let summary = InventorySummary::from_items(&[item(1, "Bolt", 3, 0.333)]);
        assert_eq!(summary.total_value, 1.0);
    }

    #[rstest]
    fn patch_keeps_omitted_fields() {
        let patch = InventoryItemPatch {
            name: Some(ItemName::new("Sprocket").expect("name")),
            ..InventoryItemPatch::default()
        };
        let updated = patch.apply_to(item(5, "Widget", 10, 2.5));
        assert_eq!(updated.name.as_ref(), "Sprocket");
        assert_eq!(updated.quantity.get(), 10);
        assert_eq!(updated.price.get(), 2.5);
        assert_eq!(updated.id.get(), 5);
    }

    #[rstest]
    fn aggregate_holdings_sums_duplicate_items() {
        let row = |id: i32, allocated: i32| HoldingRow {
            item_id: InventoryItemId::new(id).expect("id"),
            name: ItemName::new(format!("item-{id}")).expect("name"),
            price: UnitPrice::new(1.0).expect("price"),
            allocated,
        };
        let holdings = aggregate_holdings(vec![row(2, 3), row(1, 1), row(2, 4)]);
        let summary: Vec<(i32, i64)> = holdings
            .iter()
            .map(|holding| (holding.item_id.get(), holding.quantity))
            .collect();
        assert_eq!(summary, vec![(1, 1), (2, 7)]);
    }
}
