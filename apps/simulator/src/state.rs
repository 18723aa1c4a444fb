//! # Scanner State
//!
//! The single synchronization boundary around a shared scanner.
//!
//! ## Thread Safety
//! The scanner is wrapped in `Arc<Mutex<T>>` because:
//! 1. A `Scanner`'s buffers and logs are unsynchronized by design
//! 2. Only one caller may run `process_batch`/`close_truck` at a time
//! 3. Any concurrent driver (threads, a future service layer) must
//!    serialize through this wrapper rather than sharing the scanner raw
//!
//! The simulation itself is single-threaded; this wrapper exists so that the
//! serialization discipline lives in exactly one place.

use std::sync::{Arc, Mutex};

use crossdock_core::Scanner;

/// Shared handle to the session's scanner.
///
/// ## Why Not RwLock?
/// Almost every operation mutates state (buffers, logs); a RwLock would add
/// complexity with minimal benefit.
#[derive(Debug)]
pub struct ScannerState {
    scanner: Arc<Mutex<Scanner>>,
}

impl ScannerState {
    /// Wraps a configured scanner.
    pub fn new(scanner: Scanner) -> Self {
        ScannerState {
            scanner: Arc::new(Mutex::new(scanner)),
        }
    }

    /// Executes a function with read access to the scanner.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let kpis = state.with_scanner(|s| s.metrics());
    /// ```
    pub fn with_scanner<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Scanner) -> R,
    {
        let scanner = self.scanner.lock().expect("Scanner mutex poisoned");
        f(&scanner)
    }

    /// Executes a function with exclusive write access to the scanner.
    ///
    /// The lock is held for the whole closure, so a full
    /// `process_batch`/`close_truck` call is one atomic step to other
    /// drivers.
    pub fn with_scanner_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Scanner) -> R,
    {
        let mut scanner = self.scanner.lock().expect("Scanner mutex poisoned");
        f(&mut scanner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossdock_core::{Item, ItemType, ScannerConfig, Truck};

    #[test]
    fn test_state_serializes_batch_calls() {
        let scanner = Scanner::from_seed(ScannerConfig::default(), 42).unwrap();
        let state = ScannerState::new(scanner);
        let mut truck = Truck::new("TRK-1", None, 3);

        let items = vec![
            Item::new("P-01", ItemType::Pallet, true, false, "BAY-A"),
            Item::new("P-02", ItemType::Pallet, true, false, "BAY-A"),
        ];
        state.with_scanner_mut(|s| s.process_batch(items, &mut truck));

        let metrics = state.with_scanner(|s| s.metrics());
        assert_eq!(metrics.items_processed, 2);
    }
}
