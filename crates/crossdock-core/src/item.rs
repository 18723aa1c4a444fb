//! # Scannable Items
//!
//! Core item types for the crossdock pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Item Types                                     │
//! │                                                                         │
//! │  ┌─────────────────┐          ┌─────────────────┐                      │
//! │  │    ItemType     │          │      Item       │                      │
//! │  │  ─────────────  │          │  ─────────────  │                      │
//! │  │  Pallet         │◄─────────│  id             │                      │
//! │  │  Car            │          │  item_type      │                      │
//! │  └─────────────────┘          │  barcode_valid  │                      │
//! │                               │  label_damaged  │                      │
//! │   tagged enum, not a          │  destination    │                      │
//! │   class hierarchy             └─────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability Contract
//! An `Item`'s attributes are fixed at creation. The scanner only ever reads
//! `barcode_valid`, `label_damaged`, `item_type` and `id`; nothing in the
//! pipeline mutates an item after it enters a batch.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Item Type
// =============================================================================

/// The kind of scannable unit.
///
/// `ItemType` is the discriminator for everything type-dependent in the
/// pipeline: buffer selection, row completion thresholds, row validity.
/// Being a closed enum, "unrecognized type" inputs are unrepresentable -
/// the scanner's buffering match is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    /// A pallet; two of these complete a row.
    Pallet,
    /// A car (cage trolley); three of these complete a row.
    Car,
}

impl ItemType {
    /// Number of items of this type that complete one row.
    #[inline]
    pub const fn row_size(&self) -> usize {
        match self {
            ItemType::Pallet => crate::PALLET_ROW_SIZE,
            ItemType::Car => crate::CAR_ROW_SIZE,
        }
    }

    /// The label used in ids and log records (`PALLET` / `CAR`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemType::Pallet => "PALLET",
            ItemType::Car => "CAR",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Item
// =============================================================================

/// A scannable unit moving through the crossdock.
///
/// ## Identity
/// `id` is `"{TYPE}-{suffix}"` (e.g. `PALLET-P-03`), globally unique within a
/// run; the suffix is caller-provided.
///
/// ## Quality Attributes
/// `barcode_valid` and `label_damaged` are resolved once at creation (by the
/// generator, or explicitly by test code) and drive the per-attempt scan
/// success probability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, `"{TYPE}-{suffix}"`.
    pub id: String,

    /// Discriminator: pallet or car.
    pub item_type: ItemType,

    /// Whether the barcode is readable at all.
    pub barcode_valid: bool,

    /// Whether the label is damaged (degrades scan success).
    pub label_damaged: bool,

    /// Destination bay identifier (one of [`crate::DESTINATION_BAYS`]).
    pub destination: String,
}

impl Item {
    /// Creates an item with fully resolved attributes.
    ///
    /// This is the external-generation contract: callers (the generator, or
    /// tests) decide the quality flags; the pipeline only reads them.
    pub fn new(
        suffix: &str,
        item_type: ItemType,
        barcode_valid: bool,
        label_damaged: bool,
        destination: impl Into<String>,
    ) -> Self {
        Item {
            id: format!("{}-{}", item_type.as_str(), suffix),
            item_type,
            barcode_valid,
            label_damaged,
            destination: destination.into(),
        }
    }

    /// Checks whether the item is cleanly scannable.
    ///
    /// True when the barcode is valid and the label is intact. A non-scannable
    /// item can still succeed in the retry loop, just with degraded odds.
    #[inline]
    pub fn is_scannable(&self) -> bool {
        self.barcode_valid && !self.label_damaged
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_shape() {
        let item = Item::new("P-01", ItemType::Pallet, true, false, "BAY-A");
        assert_eq!(item.id, "PALLET-P-01");

        let item = Item::new("C-07", ItemType::Car, true, false, "BAY-D");
        assert_eq!(item.id, "CAR-C-07");
    }

    #[test]
    fn test_row_sizes() {
        assert_eq!(ItemType::Pallet.row_size(), 2);
        assert_eq!(ItemType::Car.row_size(), 3);
    }

    #[test]
    fn test_is_scannable() {
        let clean = Item::new("1", ItemType::Pallet, true, false, "BAY-A");
        assert!(clean.is_scannable());

        let bad_barcode = Item::new("2", ItemType::Pallet, false, false, "BAY-A");
        assert!(!bad_barcode.is_scannable());

        let damaged = Item::new("3", ItemType::Pallet, true, true, "BAY-A");
        assert!(!damaged.is_scannable());
    }

    #[test]
    fn test_item_type_display() {
        assert_eq!(ItemType::Pallet.to_string(), "PALLET");
        assert_eq!(ItemType::Car.to_string(), "CAR");
    }
}
