//! Interrupt-to-task handoff primitives.
//!
//! Every `give`/`raise`/`post` here is non-blocking and may be called from an
//! ISR. Waiting is only done from task context.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel, signal::Signal};

use crate::counter::token::TokenBytes;

/// Bounded counting signal.
///
/// Holds up to `C` pending events. A give on a full signal is dropped.
pub struct CountingSignal<const C: usize> {
    pending: Channel<CriticalSectionRawMutex, (), C>,
}

impl<const C: usize> CountingSignal<C> {
    pub const fn new() -> Self {
        const { assert!(C > 0, "signal capacity must be at least 1") };
        Self {
            pending: Channel::new(),
        }
    }

    /// Records one event. Returns false if the signal was full and the event
    /// was dropped.
    pub fn give(&self) -> bool {
        self.pending.try_send(()).is_ok()
    }

    /// Waits until an event is pending and consumes it.
    pub async fn take(&self) {
        self.pending.receive().await
    }

    /// Number of events given but not yet taken.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<const C: usize> Default for CountingSignal<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-slot flag. Raising an already raised flag has no further effect.
pub struct ResetFlag {
    flag: Signal<CriticalSectionRawMutex, ()>,
}

impl ResetFlag {
    pub const fn new() -> Self {
        Self { flag: Signal::new() }
    }

    pub fn raise(&self) {
        self.flag.signal(())
    }

    /// Waits for the flag and clears it.
    pub async fn wait(&self) {
        self.flag.wait().await
    }

    pub fn is_raised(&self) -> bool {
        self.flag.signaled()
    }
}

impl Default for ResetFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded queue of detected token identities.
pub struct TokenQueue<const C: usize> {
    detected: Channel<CriticalSectionRawMutex, TokenBytes, C>,
}

impl<const C: usize> TokenQueue<C> {
    pub const fn new() -> Self {
        const { assert!(C > 0, "token queue capacity must be at least 1") };
        Self {
            detected: Channel::new(),
        }
    }

    /// Queues `identity`. Returns false if the queue was full.
    pub fn post(&self, identity: TokenBytes) -> bool {
        self.detected.try_send(identity).is_ok()
    }

    pub async fn next(&self) -> TokenBytes {
        self.detected.receive().await
    }

    pub fn pending(&self) -> usize {
        self.detected.len()
    }
}

impl<const C: usize> Default for TokenQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// The full set of channels between interrupt handlers and tasks.
pub struct Signals<const C: usize> {
    pub entry: CountingSignal<C>,
    pub exit: CountingSignal<C>,
    pub reset: ResetFlag,
    pub tokens: TokenQueue<C>,
}

impl<const C: usize> Signals<C> {
    pub const fn new() -> Self {
        Self {
            entry: CountingSignal::new(),
            exit: CountingSignal::new(),
            reset: ResetFlag::new(),
            tokens: TokenQueue::new(),
        }
    }
}

impl<const C: usize> Default for Signals<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize> core::fmt::Debug for Signals<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signals")
            .field("entry", &self.entry.pending())
            .field("exit", &self.exit.pending())
            .field("reset", &self.reset.is_raised())
            .field("tokens", &self.tokens.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn counting_signal_drops_when_full() {
        let signal = CountingSignal::<2>::new();
        assert!(signal.give());
        assert!(signal.give());
        assert!(!signal.give());
        assert_eq!(signal.pending(), 2);
    }

    #[test]
    fn take_consumes_one_event() {
        let signal = CountingSignal::<5>::new();
        signal.give();
        signal.give();

        block_on(signal.take());
        assert_eq!(signal.pending(), 1);

        // Space freed by the take is usable again
        assert!(signal.give());
        assert_eq!(signal.pending(), 2);
    }

    #[test]
    fn reset_flag_collapses_repeated_raises() {
        let flag = ResetFlag::new();
        assert!(!flag.is_raised());

        flag.raise();
        flag.raise();
        assert!(flag.is_raised());

        block_on(flag.wait());
        assert!(!flag.is_raised());
    }

    #[test]
    fn token_queue_preserves_order() {
        let queue = TokenQueue::<2>::new();
        assert!(queue.post(TokenBytes::from_slice(&[1, 2, 3, 4]).unwrap()));
        assert!(queue.post(TokenBytes::from_slice(&[5, 6, 7, 8]).unwrap()));
        assert!(!queue.post(TokenBytes::from_slice(&[9]).unwrap()));

        assert_eq!(block_on(queue.next()).as_slice(), &[1, 2, 3, 4]);
        assert_eq!(block_on(queue.next()).as_slice(), &[5, 6, 7, 8]);
        assert_eq!(queue.pending(), 0);
    }
}
