use bitmaps::{Bitmap, Bits, BitsImpl};

use crate::counter::{
    CounterError,
    types::{CountChange, TokenAction},
};

/// Occupancy count plus one latch bit per registered token.
///
/// Pure state; callers provide the exclusion (a critical section in
/// [`Counter`](crate::counter::Counter)).
pub(crate) struct Ledger<const K: usize>
where
    BitsImpl<K>: Bits,
{
    count: u8,
    capacity: u8,
    latches: Bitmap<K>,
}

impl<const K: usize> Ledger<K>
where
    BitsImpl<K>: Bits,
{
    pub(crate) fn new(capacity: u8) -> Self {
        debug_assert!(capacity > 0, "capacity must be at least one slot");

        Self {
            count: 0,
            capacity,
            latches: Bitmap::new(),
        }
    }

    pub(crate) fn count(&self) -> u8 {
        self.count
    }

    pub(crate) fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    pub(crate) fn increment(&mut self) -> CountChange {
        if self.is_full() {
            return CountChange::Unchanged(self.count);
        }
        self.count += 1;
        CountChange::Changed(self.count)
    }

    pub(crate) fn decrement(&mut self) -> CountChange {
        if self.count == 0 {
            return CountChange::Unchanged(0);
        }
        self.count -= 1;
        CountChange::Changed(self.count)
    }

    pub(crate) fn reset(&mut self) {
        self.count = 0;
        self.latches = Bitmap::new();
    }

    pub(crate) fn is_latched(&self, slot: usize) -> Result<bool, CounterError> {
        Self::check_slot(slot)?;
        Ok(self.latches.get(slot))
    }

    pub(crate) fn any_latched(&self) -> bool {
        !self.latches.is_empty()
    }

    /// Applies one detection of the token owning `slot`.
    pub(crate) fn toggle(&mut self, slot: usize) -> Result<TokenAction, CounterError> {
        Self::check_slot(slot)?;

        if self.latches.get(slot) {
            // A manual exit may already have drained the count
            self.count = self.count.saturating_sub(1);
            self.latches.set(slot, false);
            return Ok(TokenAction::Left(self.count));
        }

        if self.is_full() {
            return Ok(TokenAction::Refused(self.count));
        }

        self.count += 1;
        self.latches.set(slot, true);
        Ok(TokenAction::Entered(self.count))
    }

    fn check_slot(slot: usize) -> Result<(), CounterError> {
        if slot >= K {
            return Err(CounterError::UnknownSlot);
        }
        Ok(())
    }
}
