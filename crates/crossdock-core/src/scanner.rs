//! # Scanner
//!
//! The scan/confirm/buffer/flush state machine at the heart of the pipeline.
//!
//! ## Per-Item Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    process_batch (per item)                             │
//! │                                                                         │
//! │   item ──► scan_item (≤ max_attempts, probabilistic)                   │
//! │               │ success                  │ failure                     │
//! │               ▼                          ▼                              │
//! │         scan_door_in              door_in_ok = false                   │
//! │               │ ok                                                      │
//! │               ▼                                                         │
//! │      push to per-truck, per-type FIFO buffer                           │
//! │               │                                                         │
//! │               ▼                                                         │
//! │      buffer at threshold? ──yes──► dequeue exactly threshold items,    │
//! │      (2 pallets / 3 cars)          build Row(id = rows + 1), append    │
//! │                                    to truck, push RowLogEntry          │
//! │               │                                                         │
//! │               ▼                                                         │
//! │      push ItemLogEntry (always, success or not)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! A `Scanner` is a plain single-threaded value: one instance serves one
//! logical operator/session, and buffer mutation plus log appends are
//! unsynchronized. Concurrent drivers must serialize access externally
//! (the simulator app wraps it in `Arc<Mutex<_>>` for exactly this reason).
//!
//! ## Randomness
//! Every stochastic draw (scan success, door confirmation, attempt duration)
//! flows through the scanner's own injected [`ScanDice`]. Construct with
//! [`Scanner::from_seed`] for reproducible runs, [`Scanner::with_rng`] to
//! supply a custom RNG, or [`Scanner::with_dice`] to pin outcomes outright
//! in tests.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{CoreResult, ValidationError};
use crate::item::{Item, ItemType};
use crate::log::{ItemLogEntry, RowLogEntry, ScanOutcome, ScannerMetrics};
use crate::round2;
use crate::row::Row;
use crate::truck::Truck;

// =============================================================================
// Scan Model Constants
// =============================================================================

/// Per-attempt success probability when the barcode is unreadable.
const INVALID_BARCODE_SUCCESS_PROB: f64 = 0.12;

/// Multiplier on `base_success` when the label is damaged.
const DAMAGED_LABEL_FACTOR: f64 = 0.6;

/// Mean duration of retry attempts (first attempt uses `mean_time_s`).
const RETRY_MEAN_TIME_S: f64 = 1.4;

/// Gaussian spread of attempt durations.
const ATTEMPT_TIME_SIGMA: f64 = 0.5;

/// Floor for a single attempt's duration, seconds.
const MIN_ATTEMPT_TIME_S: f64 = 0.4;

/// Success probability of the door-in (wall) QR confirmation.
const DOOR_IN_SUCCESS_PROB: f64 = 0.9954;

/// Success probability of the door-out (floor) QR confirmation.
const DOOR_OUT_SUCCESS_PROB: f64 = 0.995;

/// Note attached to row logs emitted by a forced close.
const FORCED_CLOSE_NOTE: &str = "forced close; may be invalid";

// =============================================================================
// Randomness Seam
// =============================================================================

/// The random draws the scan model consumes.
///
/// Keeping Bernoulli trials and duration noise behind this seam means tests
/// can pin outcomes directly instead of steering a distribution sampler
/// through raw RNG words.
pub trait ScanDice {
    /// One Bernoulli trial with the given success probability.
    fn roll(&mut self, success_prob: f64) -> bool;

    /// One standard-normal draw for attempt-duration noise.
    fn duration_noise(&mut self) -> f64;
}

/// Production dice backed by a `rand` RNG.
#[derive(Debug)]
pub struct RngDice<R: Rng = StdRng> {
    rng: R,
}

impl RngDice<StdRng> {
    /// Dice backed by a `StdRng` seeded from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        RngDice {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngDice<R> {
    /// Dice backed by an explicitly injected RNG.
    pub fn new(rng: R) -> Self {
        RngDice { rng }
    }
}

impl<R: Rng> ScanDice for RngDice<R> {
    fn roll(&mut self, success_prob: f64) -> bool {
        self.rng.gen_bool(success_prob)
    }

    fn duration_noise(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

// =============================================================================
// Scanner Configuration
// =============================================================================

/// The fixed set of named knobs a scanner is built from.
///
/// Validated at construction - a `Scanner` that exists is always
/// well-configured.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Operator name or device id; appears on every log record.
    pub name: String,

    /// Base probability of a successful barcode scan (intact label),
    /// in (0, 1].
    pub base_success: f64,

    /// Mean duration of the first scan attempt, seconds.
    pub mean_time_s: f64,

    /// Maximum scan attempts per item, ≥ 1.
    pub max_attempts: u32,

    /// QR confirmation failure rate, in [0, 1).
    ///
    /// Carried configuration knob: the current door model uses the fixed
    /// probabilities of the facility's QR checkpoints, not this rate. It is
    /// validated and retained for the removal-flow extension.
    pub door_fail_rate: f64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            name: "Scanner-01".to_string(),
            base_success: 0.98,
            mean_time_s: 2.8,
            max_attempts: 3,
            door_fail_rate: 0.001,
        }
    }
}

impl ScannerConfig {
    /// Checks every knob against its allowed range.
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }
        if !(self.base_success > 0.0 && self.base_success <= 1.0) {
            return Err(ValidationError::ProbabilityOutOfRange {
                field: "base_success",
                range: "(0, 1]",
                value: self.base_success,
            });
        }
        if !(self.mean_time_s > 0.0) {
            return Err(ValidationError::MustBePositive {
                field: "mean_time_s",
                value: self.mean_time_s,
            });
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::NoAttemptsAllowed);
        }
        if !(self.door_fail_rate >= 0.0 && self.door_fail_rate < 1.0) {
            return Err(ValidationError::ProbabilityOutOfRange {
                field: "door_fail_rate",
                range: "[0, 1)",
                value: self.door_fail_rate,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Per-Truck Buffers
// =============================================================================

/// FIFO queues of scanned-and-confirmed items awaiting row completion,
/// one queue per item type.
#[derive(Debug, Default)]
struct TypeBuffers {
    pallets: VecDeque<Item>,
    cars: VecDeque<Item>,
}

impl TypeBuffers {
    fn queue(&self, item_type: ItemType) -> &VecDeque<Item> {
        match item_type {
            ItemType::Pallet => &self.pallets,
            ItemType::Car => &self.cars,
        }
    }

    fn queue_mut(&mut self, item_type: ItemType) -> &mut VecDeque<Item> {
        match item_type {
            ItemType::Pallet => &mut self.pallets,
            ItemType::Car => &mut self.cars,
        }
    }

    fn clear(&mut self) {
        self.pallets.clear();
        self.cars.clear();
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// A simulated scanning operator/device.
///
/// ## State
/// - per-truck, per-type FIFO buffers of confirmed items
/// - append-only `item_logs` and `row_logs`
/// - owned, injected dice for every random draw
///
/// ## Invariants
/// - Immediately after processing, each type buffer holds at most
///   (threshold − 1) items: buffers are flushed the moment they fill
/// - Items are never mutated; logs and truck rows are append-only
/// - One scanner serves one logical session; state persists across trucks
///   and batches until cleared by a truck close
#[derive(Debug)]
pub struct Scanner<D: ScanDice = RngDice> {
    config: ScannerConfig,
    dice: D,
    /// truck_id → per-type FIFO buffers, created lazily on first reference.
    buffers: HashMap<String, TypeBuffers>,
    item_logs: Vec<ItemLogEntry>,
    row_logs: Vec<RowLogEntry>,
}

impl Scanner<RngDice<StdRng>> {
    /// Creates a scanner with a `StdRng` seeded from `seed`.
    ///
    /// Same config + same seed + same batches = the identical run.
    pub fn from_seed(config: ScannerConfig, seed: u64) -> CoreResult<Self> {
        Scanner::with_dice(config, RngDice::from_seed(seed))
    }
}

impl<R: Rng> Scanner<RngDice<R>> {
    /// Creates a scanner with an explicitly injected RNG.
    pub fn with_rng(config: ScannerConfig, rng: R) -> CoreResult<Self> {
        Scanner::with_dice(config, RngDice::new(rng))
    }
}

impl<D: ScanDice> Scanner<D> {
    /// Creates a scanner with explicitly injected dice.
    ///
    /// Returns a validation error if any config knob is out of range.
    pub fn with_dice(config: ScannerConfig, dice: D) -> CoreResult<Self> {
        config.validate()?;
        Ok(Scanner {
            config,
            dice,
            buffers: HashMap::new(),
            item_logs: Vec::new(),
            row_logs: Vec::new(),
        })
    }

    /// The operator name / device id.
    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Per-item outcome records, in processing order.
    #[inline]
    pub fn item_logs(&self) -> &[ItemLogEntry] {
        &self.item_logs
    }

    /// Row creation records, in creation order.
    #[inline]
    pub fn row_logs(&self) -> &[RowLogEntry] {
        &self.row_logs
    }

    /// Number of items buffered for a truck/type, awaiting row completion.
    ///
    /// Returns 0 for trucks the scanner has never seen.
    pub fn pending(&self, truck_id: &str, item_type: ItemType) -> usize {
        self.buffers
            .get(truck_id)
            .map_or(0, |b| b.queue(item_type).len())
    }

    // -------------------------------------------------------------------------
    // Scan Process
    // -------------------------------------------------------------------------

    /// Per-attempt success probability for an item, from its quality flags.
    fn scan_probability(&self, item: &Item) -> f64 {
        if !item.barcode_valid {
            INVALID_BARCODE_SUCCESS_PROB
        } else if item.label_damaged {
            self.config.base_success * DAMAGED_LABEL_FACTOR
        } else {
            self.config.base_success
        }
    }

    /// Draws one attempt's duration: Gaussian around the attempt's mean,
    /// clamped to the floor.
    fn attempt_duration(&mut self, attempt: u32) -> f64 {
        let mean = if attempt == 1 {
            self.config.mean_time_s
        } else {
            RETRY_MEAN_TIME_S
        };
        let noise = self.dice.duration_noise();
        (mean + ATTEMPT_TIME_SIGMA * noise).max(MIN_ATTEMPT_TIME_S)
    }

    /// Attempts to scan a single item, up to `max_attempts` times.
    ///
    /// The first attempt takes longer on average (`mean_time_s`); retries are
    /// faster (1.4 s mean). Stops at the first success or when attempts are
    /// exhausted, whichever comes first. A failed scan is an ordinary
    /// outcome, not an error.
    pub fn scan_item(&mut self, item: &Item) -> ScanOutcome {
        let success_prob = self.scan_probability(item);

        let mut attempts = 0;
        let mut success = false;
        let mut total_time = 0.0;

        while attempts < self.config.max_attempts && !success {
            attempts += 1;
            total_time += self.attempt_duration(attempts);
            success = self.dice.roll(success_prob);
        }

        ScanOutcome {
            success,
            attempts,
            time_s: round2(total_time),
        }
    }

    // -------------------------------------------------------------------------
    // QR Confirmation Scans
    // -------------------------------------------------------------------------

    /// Scans the QR code on the wall as an item enters the truck.
    ///
    /// An independent Bernoulli trial, unaffected by item quality or scan
    /// attempts.
    pub fn scan_door_in(&mut self, _truck: &Truck) -> bool {
        self.dice.roll(DOOR_IN_SUCCESS_PROB)
    }

    /// Scans the QR code on the floor as an item exits the truck.
    ///
    /// Reserved extension point for a removal flow; not invoked by
    /// [`Scanner::process_batch`].
    pub fn scan_door_out(&mut self, _truck: &Truck) -> bool {
        self.dice.roll(DOOR_OUT_SUCCESS_PROB)
    }

    // -------------------------------------------------------------------------
    // Buffer & Row Handling
    // -------------------------------------------------------------------------

    /// Ensures the buffer structure exists for the given truck.
    fn ensure_buffers(&mut self, truck_id: &str) {
        if !self.buffers.contains_key(truck_id) {
            self.buffers
                .insert(truck_id.to_string(), TypeBuffers::default());
        }
    }

    /// Flushes one row if the type buffer has reached its threshold.
    ///
    /// Dequeues exactly `threshold` items FIFO, builds a row with
    /// `row_id = rows + 1`, appends it to the truck and logs the creation.
    /// Returns the new row's id, or `None` if the buffer was below threshold.
    fn flush_if_full(&mut self, truck: &mut Truck, item_type: ItemType) -> Option<u32> {
        let needed = item_type.row_size();

        let queue = self
            .buffers
            .entry(truck.truck_id.clone())
            .or_default()
            .queue_mut(item_type);
        if queue.len() < needed {
            return None;
        }
        let items_for_row: Vec<Item> = queue.drain(..needed).collect();

        let row_id = truck.total_rows() as u32 + 1;
        let row = Row::new(row_id, items_for_row);
        let row_kind = row.row_kind();
        let items_count = row.items.len();
        truck.add_row(row);

        self.row_logs.push(RowLogEntry {
            timestamp: Utc::now(),
            scanner: self.config.name.clone(),
            truck_id: truck.truck_id.clone(),
            door: truck.door.clone(),
            row_id,
            row_kind,
            items_count,
            note: None,
        });

        Some(row_id)
    }

    // -------------------------------------------------------------------------
    // Main Process Flow
    // -------------------------------------------------------------------------

    /// Processes a batch of items assigned to one truck.
    ///
    /// Per item, in order:
    /// 1. Barcode scan (bounded retries)
    /// 2. Door-in confirmation - only attempted if the scan succeeded
    /// 3. On confirmation, append to the type buffer; flush a row if the
    ///    buffer reached its threshold
    /// 4. Push an [`ItemLogEntry`] unconditionally
    ///
    /// No return value: outcomes are observable via the logs and the truck's
    /// row list.
    pub fn process_batch(&mut self, items: Vec<Item>, truck: &mut Truck) {
        self.ensure_buffers(&truck.truck_id);

        for item in items {
            let outcome = self.scan_item(&item);

            let door_in_ok = if outcome.success {
                self.scan_door_in(truck)
            } else {
                false
            };

            // Log fields captured before the item moves into the buffer.
            let item_id = item.id.clone();
            let item_type = item.item_type;
            let barcode_valid = item.barcode_valid;
            let label_damaged = item.label_damaged;

            let mut row_created_id = None;
            if door_in_ok {
                self.buffers
                    .entry(truck.truck_id.clone())
                    .or_default()
                    .queue_mut(item_type)
                    .push_back(item);
                row_created_id = self.flush_if_full(truck, item_type);
            }

            self.item_logs.push(ItemLogEntry {
                scanner: self.config.name.clone(),
                truck_id: truck.truck_id.clone(),
                door: truck.door.clone(),
                item_id,
                item_type,
                barcode_valid,
                label_damaged,
                scan_success: outcome.success,
                attempts: outcome.attempts,
                scan_time_s: outcome.time_s,
                door_in_ok,
                // Reserved for the removal flow
                door_out_ok: None,
                row_created_id,
            });
        }
    }

    // -------------------------------------------------------------------------
    // Truck Closing
    // -------------------------------------------------------------------------

    /// Clears or finalizes a truck's buffers when it is ready to depart.
    ///
    /// ## Modes
    /// - `finalize_incomplete_rows = false` (default policy): pending
    ///   buffered items are dropped without creating rows. Items never
    ///   scanned into a row are simply lost - the truck departs and no more
    ///   rows are possible.
    /// - `finalize_incomplete_rows = true` (forced close): each nonempty type
    ///   buffer is emptied into one row regardless of threshold. Such rows
    ///   are usually below size and therefore invalid; their row-log entries
    ///   carry the forced-close note.
    ///
    /// Idempotent for trucks the scanner has never seen.
    pub fn close_truck(&mut self, truck: &mut Truck, finalize_incomplete_rows: bool) {
        self.ensure_buffers(&truck.truck_id);

        if !finalize_incomplete_rows {
            if let Some(buffers) = self.buffers.get_mut(&truck.truck_id) {
                buffers.clear();
            }
            return;
        }

        for item_type in [ItemType::Pallet, ItemType::Car] {
            let leftover: Vec<Item> = self
                .buffers
                .entry(truck.truck_id.clone())
                .or_default()
                .queue_mut(item_type)
                .drain(..)
                .collect();
            if leftover.is_empty() {
                continue;
            }

            let row_id = truck.total_rows() as u32 + 1;
            let row = Row::new(row_id, leftover);
            let row_kind = row.row_kind();
            let items_count = row.items.len();
            truck.add_row(row);

            self.row_logs.push(RowLogEntry {
                timestamp: Utc::now(),
                scanner: self.config.name.clone(),
                truck_id: truck.truck_id.clone(),
                door: truck.door.clone(),
                row_id,
                row_kind,
                items_count,
                note: Some(FORCED_CLOSE_NOTE.to_string()),
            });
        }
    }

    // -------------------------------------------------------------------------
    // Metrics
    // -------------------------------------------------------------------------

    /// Computes session KPIs as a pure read of the item logs.
    ///
    /// Returns the all-zero record when no items have been processed.
    pub fn metrics(&self) -> ScannerMetrics {
        if self.item_logs.is_empty() {
            return ScannerMetrics::empty(&self.config.name);
        }

        let n = self.item_logs.len();
        let successes = self.item_logs.iter().filter(|e| e.scan_success).count();
        let door_ok = self.item_logs.iter().filter(|e| e.door_in_ok).count();
        let total_time: f64 = self.item_logs.iter().map(|e| e.scan_time_s).sum();
        let total_attempts: u32 = self.item_logs.iter().map(|e| e.attempts).sum();

        ScannerMetrics {
            scanner: self.config.name.clone(),
            items_processed: n,
            scan_success_pct: round2(100.0 * successes as f64 / n as f64),
            door_scan_ok_pct: round2(100.0 * door_ok as f64 / n as f64),
            avg_scan_time_s: round2(total_time / n as f64),
            avg_attempts: round2(f64::from(total_attempts) / n as f64),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::RowKind;

    /// Stub dice: every roll succeeds, durations carry no noise.
    struct AlwaysDice;

    impl ScanDice for AlwaysDice {
        fn roll(&mut self, _success_prob: f64) -> bool {
            true
        }
        fn duration_noise(&mut self) -> f64 {
            0.0
        }
    }

    /// Stub dice: every roll fails, durations carry no noise.
    struct NeverDice;

    impl ScanDice for NeverDice {
        fn roll(&mut self, _success_prob: f64) -> bool {
            false
        }
        fn duration_noise(&mut self) -> f64 {
            0.0
        }
    }

    fn succeeding_scanner() -> Scanner<AlwaysDice> {
        Scanner::with_dice(ScannerConfig::default(), AlwaysDice).unwrap()
    }

    fn failing_scanner() -> Scanner<NeverDice> {
        Scanner::with_dice(ScannerConfig::default(), NeverDice).unwrap()
    }

    /// Stub dice: every roll succeeds, every duration draw returns the
    /// wrapped noise value.
    struct FixedNoise(f64);

    impl ScanDice for FixedNoise {
        fn roll(&mut self, _success_prob: f64) -> bool {
            true
        }
        fn duration_noise(&mut self) -> f64 {
            self.0
        }
    }

    fn truck() -> Truck {
        Truck::new("TRK-1", Some("D1".to_string()), 3)
    }

    fn pallet(suffix: &str) -> Item {
        Item::new(suffix, ItemType::Pallet, true, false, "BAY-A")
    }

    fn car(suffix: &str) -> Item {
        Item::new(suffix, ItemType::Car, true, false, "BAY-B")
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    #[test]
    fn test_config_rejections() {
        let cases = [
            ScannerConfig {
                name: "  ".to_string(),
                ..ScannerConfig::default()
            },
            ScannerConfig {
                base_success: 0.0,
                ..ScannerConfig::default()
            },
            ScannerConfig {
                base_success: 1.5,
                ..ScannerConfig::default()
            },
            ScannerConfig {
                mean_time_s: -2.8,
                ..ScannerConfig::default()
            },
            ScannerConfig {
                max_attempts: 0,
                ..ScannerConfig::default()
            },
            ScannerConfig {
                door_fail_rate: 1.0,
                ..ScannerConfig::default()
            },
        ];

        for config in cases {
            assert!(Scanner::with_dice(config.clone(), AlwaysDice).is_err());
        }
    }

    #[test]
    fn test_default_config_accepted() {
        let scanner = Scanner::from_seed(ScannerConfig::default(), 42).unwrap();
        assert_eq!(scanner.name(), "Scanner-01");
    }

    // -------------------------------------------------------------------------
    // Scan Model
    // -------------------------------------------------------------------------

    #[test]
    fn test_scan_succeeds_on_first_attempt() {
        let mut scanner = succeeding_scanner();
        let outcome = scanner.scan_item(&pallet("1"));

        assert!(outcome.success);
        assert_eq!(outcome.attempts, 1);
        // Zero noise: exactly the configured first-attempt mean.
        assert_eq!(outcome.time_s, 2.8);
    }

    #[test]
    fn test_scan_exhausts_attempts_on_failure() {
        let mut scanner = failing_scanner();
        let outcome = scanner.scan_item(&pallet("1"));

        assert!(!outcome.success);
        assert_eq!(outcome.attempts, 3);
        // 2.8 for the first attempt, 1.4 for each retry, zero noise.
        assert_eq!(outcome.time_s, 5.6);
    }

    #[test]
    fn test_attempt_duration_clamps_to_floor() {
        let mut scanner =
            Scanner::with_dice(ScannerConfig::default(), FixedNoise(-10.0)).unwrap();
        let outcome = scanner.scan_item(&pallet("1"));

        assert!(outcome.success);
        assert_eq!(outcome.time_s, MIN_ATTEMPT_TIME_S);
    }

    #[test]
    fn test_attempt_duration_adds_scaled_noise() {
        let mut scanner = Scanner::with_dice(ScannerConfig::default(), FixedNoise(1.0)).unwrap();
        let outcome = scanner.scan_item(&pallet("1"));

        // mean_time_s 2.8 + sigma 0.5 × noise 1.0.
        assert_eq!(outcome.time_s, 3.3);
    }

    #[test]
    fn test_scan_probability_degrades_with_quality() {
        let scanner = succeeding_scanner();

        let clean = pallet("1");
        let damaged = Item::new("2", ItemType::Pallet, true, true, "BAY-A");
        let unreadable = Item::new("3", ItemType::Pallet, false, false, "BAY-A");
        let unreadable_and_damaged = Item::new("4", ItemType::Pallet, false, true, "BAY-A");

        assert_eq!(scanner.scan_probability(&clean), 0.98);
        assert_eq!(scanner.scan_probability(&damaged), 0.98 * 0.6);
        assert_eq!(scanner.scan_probability(&unreadable), 0.12);
        // Unreadable barcode dominates label damage.
        assert_eq!(scanner.scan_probability(&unreadable_and_damaged), 0.12);
    }

    #[test]
    fn test_door_scans() {
        let truck = truck();

        let mut ok = succeeding_scanner();
        assert!(ok.scan_door_in(&truck));
        assert!(ok.scan_door_out(&truck));

        let mut bad = failing_scanner();
        assert!(!bad.scan_door_in(&truck));
        assert!(!bad.scan_door_out(&truck));
    }

    // -------------------------------------------------------------------------
    // Buffering & Row Emission
    // -------------------------------------------------------------------------

    #[test]
    fn test_two_pallets_emit_one_row() {
        let mut scanner = succeeding_scanner();
        let mut truck = truck();

        scanner.process_batch(vec![pallet("1"), pallet("2")], &mut truck);

        assert_eq!(truck.total_rows(), 1);
        assert_eq!(truck.rows[0].row_id, 1);
        assert_eq!(truck.rows[0].row_kind(), RowKind::Pallet);
        assert!(truck.rows[0].is_valid());
        assert_eq!(scanner.pending("TRK-1", ItemType::Pallet), 0);

        // The second item completed the row; the first did not.
        assert_eq!(scanner.item_logs()[0].row_created_id, None);
        assert_eq!(scanner.item_logs()[1].row_created_id, Some(1));

        let row_log = &scanner.row_logs()[0];
        assert_eq!(row_log.row_id, 1);
        assert_eq!(row_log.row_kind, RowKind::Pallet);
        assert_eq!(row_log.items_count, 2);
        assert_eq!(row_log.note, None);
    }

    #[test]
    fn test_third_pallet_waits_for_fourth() {
        let mut scanner = succeeding_scanner();
        let mut truck = truck();

        scanner.process_batch(vec![pallet("1"), pallet("2"), pallet("3")], &mut truck);
        assert_eq!(truck.total_rows(), 1);
        assert_eq!(scanner.pending("TRK-1", ItemType::Pallet), 1);

        scanner.process_batch(vec![pallet("4")], &mut truck);
        assert_eq!(truck.total_rows(), 2);
        assert_eq!(truck.rows[1].row_id, 2);
        assert_eq!(scanner.pending("TRK-1", ItemType::Pallet), 0);
    }

    #[test]
    fn test_cars_need_three() {
        let mut scanner = succeeding_scanner();
        let mut truck = truck();

        scanner.process_batch(vec![car("1"), car("2")], &mut truck);
        assert_eq!(truck.total_rows(), 0);
        assert_eq!(scanner.pending("TRK-1", ItemType::Car), 2);

        scanner.process_batch(vec![car("3")], &mut truck);
        assert_eq!(truck.total_rows(), 1);
        assert_eq!(truck.rows[0].row_kind(), RowKind::Car);
        assert_eq!(scanner.pending("TRK-1", ItemType::Car), 0);
    }

    #[test]
    fn test_types_buffer_independently() {
        let mut scanner = succeeding_scanner();
        let mut truck = truck();

        // Interleaved: pallets complete at 2 while cars still wait at 2.
        scanner.process_batch(vec![pallet("1"), car("1"), car("2"), pallet("2")], &mut truck);

        assert_eq!(truck.total_rows(), 1);
        assert_eq!(truck.rows[0].row_kind(), RowKind::Pallet);
        assert_eq!(scanner.pending("TRK-1", ItemType::Car), 2);
    }

    #[test]
    fn test_buffers_are_per_truck() {
        let mut scanner = succeeding_scanner();
        let mut truck_a = Truck::new("TRK-A", None, 3);
        let mut truck_b = Truck::new("TRK-B", None, 3);

        scanner.process_batch(vec![pallet("a1")], &mut truck_a);
        scanner.process_batch(vec![pallet("b1")], &mut truck_b);

        // One pallet per truck: neither buffer reached the threshold.
        assert_eq!(truck_a.total_rows(), 0);
        assert_eq!(truck_b.total_rows(), 0);
        assert_eq!(scanner.pending("TRK-A", ItemType::Pallet), 1);
        assert_eq!(scanner.pending("TRK-B", ItemType::Pallet), 1);
    }

    #[test]
    fn test_failed_scan_skips_door_and_buffer() {
        let mut scanner = failing_scanner();
        let mut truck = truck();

        scanner.process_batch(vec![pallet("1")], &mut truck);

        let entry = &scanner.item_logs()[0];
        assert!(!entry.scan_success);
        assert_eq!(entry.attempts, 3);
        assert!(!entry.door_in_ok);
        assert_eq!(entry.door_out_ok, None);
        assert_eq!(entry.row_created_id, None);

        assert_eq!(truck.total_rows(), 0);
        assert_eq!(scanner.pending("TRK-1", ItemType::Pallet), 0);
    }

    // -------------------------------------------------------------------------
    // Truck Closing
    // -------------------------------------------------------------------------

    /// Leaves 1 pallet and 2 cars buffered for the truck.
    fn partially_filled(scanner: &mut Scanner<AlwaysDice>, truck: &mut Truck) {
        scanner.process_batch(vec![pallet("1"), car("1"), car("2")], truck);
        assert_eq!(truck.total_rows(), 0);
        assert_eq!(scanner.pending("TRK-1", ItemType::Pallet), 1);
        assert_eq!(scanner.pending("TRK-1", ItemType::Car), 2);
    }

    #[test]
    fn test_close_truck_drops_incomplete_buffers() {
        let mut scanner = succeeding_scanner();
        let mut truck = truck();
        partially_filled(&mut scanner, &mut truck);

        scanner.close_truck(&mut truck, false);

        assert_eq!(truck.total_rows(), 0);
        assert_eq!(scanner.pending("TRK-1", ItemType::Pallet), 0);
        assert_eq!(scanner.pending("TRK-1", ItemType::Car), 0);
        assert!(scanner.row_logs().is_empty());
    }

    #[test]
    fn test_forced_close_emits_incomplete_rows() {
        let mut scanner = succeeding_scanner();
        let mut truck = truck();
        partially_filled(&mut scanner, &mut truck);

        scanner.close_truck(&mut truck, true);

        assert_eq!(truck.total_rows(), 2);

        // Pallet remainder first, then cars; both below threshold → invalid.
        assert_eq!(truck.rows[0].row_id, 1);
        assert_eq!(truck.rows[0].items.len(), 1);
        assert!(!truck.rows[0].is_valid());
        assert_eq!(truck.rows[1].row_id, 2);
        assert_eq!(truck.rows[1].items.len(), 2);
        assert!(!truck.rows[1].is_valid());

        assert_eq!(scanner.row_logs().len(), 2);
        for entry in scanner.row_logs() {
            assert_eq!(entry.row_kind, RowKind::Invalid);
            assert_eq!(entry.note.as_deref(), Some("forced close; may be invalid"));
        }

        assert_eq!(scanner.pending("TRK-1", ItemType::Pallet), 0);
        assert_eq!(scanner.pending("TRK-1", ItemType::Car), 0);
    }

    #[test]
    fn test_close_unseen_truck_is_idempotent() {
        let mut scanner = succeeding_scanner();
        let mut fresh = Truck::new("TRK-NEW", None, 3);

        scanner.close_truck(&mut fresh, false);
        scanner.close_truck(&mut fresh, true);

        assert_eq!(fresh.total_rows(), 0);
        assert!(scanner.row_logs().is_empty());
    }

    // -------------------------------------------------------------------------
    // Metrics
    // -------------------------------------------------------------------------

    #[test]
    fn test_metrics_empty() {
        let scanner = succeeding_scanner();
        let metrics = scanner.metrics();

        assert_eq!(metrics.items_processed, 0);
        assert_eq!(metrics.scan_success_pct, 0.0);
        assert_eq!(metrics.door_scan_ok_pct, 0.0);
        assert_eq!(metrics.avg_scan_time_s, 0.0);
        assert_eq!(metrics.avg_attempts, 0.0);
    }

    #[test]
    fn test_metrics_after_clean_batch() {
        let mut scanner = succeeding_scanner();
        let mut truck = truck();

        scanner.process_batch(vec![pallet("1"), pallet("2"), car("1"), car("2")], &mut truck);

        let metrics = scanner.metrics();
        assert_eq!(metrics.scanner, "Scanner-01");
        assert_eq!(metrics.items_processed, 4);
        assert_eq!(metrics.scan_success_pct, 100.0);
        assert_eq!(metrics.door_scan_ok_pct, 100.0);
        assert_eq!(metrics.avg_attempts, 1.0);
        assert_eq!(metrics.avg_scan_time_s, 2.8);
    }

    #[test]
    fn test_metrics_all_failures() {
        let mut scanner = failing_scanner();
        let mut truck = truck();

        scanner.process_batch(vec![pallet("1"), pallet("2")], &mut truck);

        let metrics = scanner.metrics();
        assert_eq!(metrics.items_processed, 2);
        assert_eq!(metrics.scan_success_pct, 0.0);
        assert_eq!(metrics.door_scan_ok_pct, 0.0);
        assert_eq!(metrics.avg_attempts, 3.0);
    }
}
