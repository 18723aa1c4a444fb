//! # Rows
//!
//! A row is a fixed-arity group of same-type items inside a truck, and the
//! unit a strap is applied to.
//!
//! ## Validity Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Row Validity                                     │
//! │                                                                         │
//! │   [Pallet][Pallet]              → valid   (RowKind::Pallet)            │
//! │   [Car][Car][Car]               → valid   (RowKind::Car)               │
//! │   [Pallet][Car]                 → invalid (mixed)                      │
//! │   [Pallet]                      → invalid (short)                      │
//! │   [Car][Car][Car][Car]          → invalid (oversized)                  │
//! │   []                            → invalid (empty)                      │
//! │                                                                         │
//! │   A valid row requires exactly 1 strap; an invalid row requires 0.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed rows are representable on purpose: the scanner's forced-close
//! path emits short rows, and the truck records them as history. Validity is
//! derived, never stored.

use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemType};

// =============================================================================
// Row Kind
// =============================================================================

/// Classification of a row's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// A valid row of 2 pallets.
    Pallet,
    /// A valid row of 3 cars.
    Car,
    /// Anything else: mixed, short, oversized or empty.
    Invalid,
}

impl From<ItemType> for RowKind {
    fn from(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Pallet => RowKind::Pallet,
            ItemType::Car => RowKind::Car,
        }
    }
}

// =============================================================================
// Row
// =============================================================================

/// A group of items occupying one row position inside a truck.
///
/// ## Identity
/// `row_id` is unique within its truck and assigned by whoever creates the
/// row (the scanner's flush path, or test code composing rows directly).
///
/// ## Immutability
/// A row never changes after construction; it is appended to exactly one
/// truck and stays there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// 1-indexed id, unique within the owning truck.
    pub row_id: u32,

    /// The items in this row, in scan order.
    pub items: Vec<Item>,
}

impl Row {
    /// Creates a row from pre-collected items.
    pub fn new(row_id: u32, items: Vec<Item>) -> Self {
        Row { row_id, items }
    }

    /// Checks whether the row follows the crossdock rules:
    /// exactly 2 pallets, or exactly 3 cars.
    pub fn is_valid(&self) -> bool {
        let all_of = |t: ItemType| self.items.iter().all(|i| i.item_type == t);

        (self.items.len() == crate::PALLET_ROW_SIZE && all_of(ItemType::Pallet))
            || (self.items.len() == crate::CAR_ROW_SIZE && all_of(ItemType::Car))
    }

    /// Returns the row's kind: the common item type if valid, else
    /// [`RowKind::Invalid`].
    pub fn row_kind(&self) -> RowKind {
        if self.is_valid() {
            // is_valid guarantees at least one item of a uniform type
            RowKind::from(self.items[0].item_type)
        } else {
            RowKind::Invalid
        }
    }

    /// Number of straps this row requires: 1 if valid, 0 otherwise.
    ///
    /// Straps are only spent on rows that follow the rules; an invalid row is
    /// recorded but never strapped.
    #[inline]
    pub fn required_straps(&self) -> u32 {
        if self.is_valid() {
            1
        } else {
            0
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pallet(suffix: &str) -> Item {
        Item::new(suffix, ItemType::Pallet, true, false, "BAY-A")
    }

    fn car(suffix: &str) -> Item {
        Item::new(suffix, ItemType::Car, true, false, "BAY-B")
    }

    #[test]
    fn test_two_pallets_is_valid() {
        let row = Row::new(1, vec![pallet("1"), pallet("2")]);
        assert!(row.is_valid());
        assert_eq!(row.row_kind(), RowKind::Pallet);
    }

    #[test]
    fn test_three_cars_is_valid() {
        let row = Row::new(1, vec![car("1"), car("2"), car("3")]);
        assert!(row.is_valid());
        assert_eq!(row.row_kind(), RowKind::Car);
    }

    #[test]
    fn test_invalid_combinations() {
        // Mixed
        let mixed = Row::new(1, vec![pallet("1"), car("1")]);
        // Wrong lengths
        let empty = Row::new(2, vec![]);
        let short_pallet = Row::new(3, vec![pallet("1")]);
        let short_car = Row::new(4, vec![car("1"), car("2")]);
        let long_pallet = Row::new(5, vec![pallet("1"), pallet("2"), pallet("3")]);
        let long_car = Row::new(6, vec![car("1"), car("2"), car("3"), car("4")]);
        // Right length, wrong composition
        let two_cars_one_pallet = Row::new(7, vec![car("1"), car("2"), pallet("1")]);

        for row in [
            &mixed,
            &empty,
            &short_pallet,
            &short_car,
            &long_pallet,
            &long_car,
            &two_cars_one_pallet,
        ] {
            assert!(!row.is_valid(), "row {} should be invalid", row.row_id);
            assert_eq!(row.row_kind(), RowKind::Invalid);
        }
    }

    #[test]
    fn test_required_straps_only_for_valid_rows() {
        // Pins the chosen semantics: straps derive from validity, there is
        // no stored per-row strap constant.
        let valid = Row::new(1, vec![pallet("1"), pallet("2")]);
        assert_eq!(valid.required_straps(), 1);

        let invalid = Row::new(2, vec![pallet("1"), car("1")]);
        assert_eq!(invalid.required_straps(), 0);

        let short = Row::new(3, vec![car("1")]);
        assert_eq!(short.required_straps(), 0);
    }
}
