//! # Order Identifier Generator
//!
//! Produces human-readable business identifiers of the form
//! `ORD-YYMMDDNNNNN`: a date prefix plus a 5-digit sequence that
//! restarts at `00001` each day.
//!
//! ```text
//! ORD-26083000042
//!     ───┬── ──┬──
//!        │     └── per-day sequence, 00001..99999
//!        └──────── order date, YYMMDD
//! ```
//!
//! ## Why a counter
//! Identifiers derived from a wall-clock timestamp collide as soon as
//! two orders land in the same instant. A monotonic per-day counter
//! makes uniqueness a property of the generator instead of a property
//! of luck. The generator holds the counter in memory; on restart (or
//! at day rollover) the caller re-seeds it from the highest persisted
//! sequence via [`OrderIdGenerator::restore`].

use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};

/// Highest sequence number a single day can hold.
const MAX_DAILY_SEQ: u32 = 99_999;

#[derive(Debug, Clone, Copy)]
struct DayState {
    day: NaiveDate,
    last_seq: u32,
}

/// Thread-safe generator for `ORD-YYMMDDNNNNN` identifiers.
///
/// One instance per store. Interior mutability keeps the API `&self`
/// so the generator can sit behind an `Arc` next to the pool.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    state: Mutex<Option<DayState>>,
}

impl OrderIdGenerator {
    /// Creates a generator with no seeded day; the first call to
    /// [`next_id`](Self::next_id) starts at sequence 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds (or re-seeds) the generator with the highest sequence
    /// already persisted for `day`.
    ///
    /// Idempotent for the same day: a restore below the current
    /// in-memory sequence is ignored, so a concurrent `next_id` can
    /// never be rewound.
    pub fn restore(&self, day: NaiveDate, last_seq: u32) {
        let mut guard = self.lock();
        match guard.as_mut() {
            Some(state) if state.day == day => {
                state.last_seq = state.last_seq.max(last_seq);
            }
            _ => {
                *guard = Some(DayState { day, last_seq });
            }
        }
    }

    /// Returns the next identifier for `day`.
    ///
    /// A `day` different from the seeded one resets the sequence to 1.
    /// Errors with [`CoreError::IdSpaceExhausted`] once the day's
    /// 99 999 slots are used up, leaving the state unchanged.
    pub fn next_id(&self, day: NaiveDate) -> CoreResult<String> {
        let mut guard = self.lock();
        let state = guard.get_or_insert_with(|| DayState { day, last_seq: 0 });
        if state.day != day {
            *state = DayState { day, last_seq: 0 };
        }

        if state.last_seq >= MAX_DAILY_SEQ {
            return Err(CoreError::IdSpaceExhausted { day });
        }
        state.last_seq += 1;

        Ok(format!("ORD-{}{:05}", day.format("%y%m%d"), state.last_seq))
    }

    /// The day the generator is currently seeded for, if any.
    pub fn current_day(&self) -> Option<NaiveDate> {
        self.lock().map(|s| s.day)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<DayState>> {
        // A poisoned lock only means another thread panicked mid-update;
        // the counter itself is always a valid u32.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the `ORD-YYMMDD` prefix shared by every identifier minted
/// on `day`. Used by the store to find the day's highest sequence.
pub fn day_prefix(day: NaiveDate) -> String {
    format!("ORD-{}", day.format("%y%m%d"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format() {
        let gen = OrderIdGenerator::new();
        let id = gen.next_id(day(2026, 8, 30)).unwrap();
        assert_eq!(id, "ORD-26083000001");
        assert_eq!(id.len(), 15);
    }

    #[test]
    fn test_sequence_increments_within_day() {
        let gen = OrderIdGenerator::new();
        let d = day(2026, 8, 30);
        assert_eq!(gen.next_id(d).unwrap(), "ORD-26083000001");
        assert_eq!(gen.next_id(d).unwrap(), "ORD-26083000002");
        assert_eq!(gen.next_id(d).unwrap(), "ORD-26083000003");
    }

    #[test]
    fn test_sequence_resets_on_new_day() {
        let gen = OrderIdGenerator::new();
        assert_eq!(gen.next_id(day(2026, 8, 30)).unwrap(), "ORD-26083000001");
        assert_eq!(gen.next_id(day(2026, 8, 31)).unwrap(), "ORD-26083100001");
        assert_eq!(gen.current_day(), Some(day(2026, 8, 31)));
    }

    #[test]
    fn test_restore_continues_sequence() {
        let gen = OrderIdGenerator::new();
        let d = day(2026, 8, 30);
        gen.restore(d, 41);
        assert_eq!(gen.next_id(d).unwrap(), "ORD-26083000042");
    }

    #[test]
    fn test_restore_never_rewinds_same_day() {
        let gen = OrderIdGenerator::new();
        let d = day(2026, 8, 30);
        gen.restore(d, 50);
        gen.restore(d, 10);
        assert_eq!(gen.next_id(d).unwrap(), "ORD-26083000051");
    }

    #[test]
    fn test_exhaustion() {
        let gen = OrderIdGenerator::new();
        let d = day(2026, 8, 30);
        gen.restore(d, MAX_DAILY_SEQ - 1);
        assert_eq!(gen.next_id(d).unwrap(), "ORD-26083099999");
        assert!(matches!(
            gen.next_id(d),
            Err(CoreError::IdSpaceExhausted { .. })
        ));
        // And stays exhausted
        assert!(gen.next_id(d).is_err());
    }

    #[test]
    fn test_day_prefix() {
        assert_eq!(day_prefix(day(2026, 8, 30)), "ORD-260830");
        assert_eq!(day_prefix(day(2026, 1, 2)), "ORD-260102");
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let gen = Arc::new(OrderIdGenerator::new());
        let d = day(2026, 8, 30);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let gen = Arc::clone(&gen);
            handles.push(std::thread::spawn(move || {
                (0..100)
                    .map(|_| gen.next_id(d).unwrap())
                    .collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
