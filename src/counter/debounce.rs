use core::cell::{Cell, RefCell};

use critical_section::Mutex;

use crate::counter::{token::TokenBytes, types::SourceId};

/// Quiet-window filter with one clock per [`SourceId`], plus one for the last
/// token identity reported by a reader interrupt.
///
/// Safe to call from interrupt context: each check is a single short critical
/// section with no blocking.
pub struct Debouncer {
    quiet_window_ms: u32,
    last_accepted: Mutex<Cell<[Option<u32>; SourceId::COUNT]>>,
    last_token: Mutex<RefCell<Option<(TokenBytes, u32)>>>,
}

impl core::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Debouncer")
            .field("quiet_window_ms", &self.quiet_window_ms)
            .finish_non_exhaustive()
    }
}

impl Debouncer {
    pub const fn new(quiet_window_ms: u32) -> Self {
        Self {
            quiet_window_ms,
            last_accepted: Mutex::new(Cell::new([None; SourceId::COUNT])),
            last_token: Mutex::new(RefCell::new(None)),
        }
    }

    /// Returns true and restarts the source's clock if `now_ms` lies outside
    /// the quiet window of the last accepted trigger.
    ///
    /// `now_ms` is milliseconds since boot; the difference is taken with
    /// wrapping arithmetic so the counter may roll over.
    pub fn accept(&self, source: SourceId, now_ms: u32) -> bool {
        critical_section::with(|cs| {
            let cell = self.last_accepted.borrow(cs);
            let mut clocks = cell.get();
            let slot = &mut clocks[source.index()];

            if let Some(last) = *slot {
                if now_ms.wrapping_sub(last) <= self.quiet_window_ms {
                    return false;
                }
            }

            *slot = Some(now_ms);
            cell.set(clocks);
            true
        })
    }

    /// Returns false if `identity` repeats the last accepted token inside the
    /// quiet window. A different identity is always accepted and restarts the
    /// clock.
    pub fn accept_token(&self, identity: &TokenBytes, now_ms: u32) -> bool {
        critical_section::with(|cs| {
            let mut last = self.last_token.borrow_ref_mut(cs);

            if let Some((last_id, at)) = last.as_ref() {
                if last_id == identity && now_ms.wrapping_sub(*at) <= self.quiet_window_ms {
                    return false;
                }
            }

            *last = Some((identity.clone(), now_ms));
            true
        })
    }

    /// Returns the timestamp of the last accepted trigger for `source`.
    pub fn last_accepted(&self, source: SourceId) -> Option<u32> {
        critical_section::with(|cs| self.last_accepted.borrow(cs).get()[source.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_trigger_is_always_accepted() {
        let debouncer = Debouncer::new(200);
        assert!(debouncer.accept(SourceId::Entry, 0));
        assert_eq!(debouncer.last_accepted(SourceId::Entry), Some(0));
    }

    #[test]
    fn retrigger_inside_window_is_suppressed() {
        let debouncer = Debouncer::new(200);
        assert!(debouncer.accept(SourceId::Entry, 1_000));
        assert!(!debouncer.accept(SourceId::Entry, 1_050));
        // Window edge is inclusive
        assert!(!debouncer.accept(SourceId::Entry, 1_200));
        assert!(debouncer.accept(SourceId::Entry, 1_201));
    }

    #[test]
    fn suppressed_trigger_does_not_extend_window() {
        let debouncer = Debouncer::new(200);
        assert!(debouncer.accept(SourceId::Exit, 0));
        assert!(!debouncer.accept(SourceId::Exit, 150));
        // Measured from 0, not from the suppressed 150
        assert!(debouncer.accept(SourceId::Exit, 201));
    }

    #[test]
    fn sources_have_independent_clocks() {
        let debouncer = Debouncer::new(200);
        assert!(debouncer.accept(SourceId::Entry, 500));
        assert!(debouncer.accept(SourceId::Exit, 510));
        assert!(debouncer.accept(SourceId::Reset, 520));
        assert!(!debouncer.accept(SourceId::Entry, 600));
        assert_eq!(debouncer.last_accepted(SourceId::Exit), Some(510));
    }

    #[test]
    fn repeated_token_inside_window_is_suppressed() {
        let debouncer = Debouncer::new(200);
        let card = TokenBytes::from_slice(&[0x90, 0x93, 0x18, 0x43]).unwrap();
        let tag = TokenBytes::from_slice(&[0x43, 0x76, 0xBB, 0x04]).unwrap();

        assert!(debouncer.accept_token(&card, 1_000));
        assert!(!debouncer.accept_token(&card, 1_200));
        // Another token is never held back by the previous one
        assert!(debouncer.accept_token(&tag, 1_210));
        assert!(debouncer.accept_token(&card, 1_220));
        assert!(debouncer.accept_token(&card, 1_421));
    }

    #[test]
    fn token_clock_is_separate_from_controls() {
        let debouncer = Debouncer::new(200);
        let card = TokenBytes::from_slice(&[1, 2, 3, 4]).unwrap();

        assert!(debouncer.accept(SourceId::Entry, 0));
        assert!(debouncer.accept_token(&card, 10));
        assert_eq!(debouncer.last_accepted(SourceId::Entry), Some(0));
    }

    #[test]
    fn clock_rollover_is_handled() {
        let debouncer = Debouncer::new(200);
        assert!(debouncer.accept(SourceId::Entry, u32::MAX - 50));
        // 100 ms later, after wrapping
        assert!(!debouncer.accept(SourceId::Entry, 49));
        assert!(debouncer.accept(SourceId::Entry, 200));
    }
}
