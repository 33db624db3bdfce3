//! Task bodies for the four consumers.
//!
//! Each `*_task` loops forever around its `*_step`. A step waits on exactly one
//! channel (its only suspension point besides the bounded feedback delays) and
//! then runs one operation.
//!
//! The counter does not pick priorities. Spawn `reset_task` on a higher
//! priority executor than `entry_task`/`exit_task`, and the reader task above
//! both, for example with embassy's `InterruptExecutor`:
//!
//! ```rust,ignore
//! #[embassy_executor::task]
//! async fn entry(counter: &'static MyCounter) {
//!     counter.entry_task(embassy_time::Delay).await
//! }
//! ```

use bitmaps::{Bits, BitsImpl};
use embedded_hal_async::delay::DelayNs;

use crate::counter::{
    Counter,
    present::{Buzzer, Presenter},
    token::TokenReader,
    types::{CountChange, TokenOutcome},
};

impl<P, B, const K: usize, const C: usize> Counter<P, B, K, C>
where
    P: Presenter,
    B: Buzzer,
    BitsImpl<K>: Bits,
{
    /// Waits for one entry event and applies it.
    pub async fn entry_step<D: DelayNs>(&self, delay: &mut D) -> CountChange {
        self.signals.entry.take().await;
        self.increment(delay).await
    }

    pub async fn entry_task<D: DelayNs>(&self, mut delay: D) -> ! {
        loop {
            self.entry_step(&mut delay).await;
        }
    }

    /// Waits for one exit event and applies it.
    pub async fn exit_step<D: DelayNs>(&self, delay: &mut D) -> CountChange {
        self.signals.exit.take().await;
        self.decrement(delay).await
    }

    pub async fn exit_task<D: DelayNs>(&self, mut delay: D) -> ! {
        loop {
            self.exit_step(&mut delay).await;
        }
    }

    /// Waits for the reset flag and performs one reset.
    pub async fn reset_step<D: DelayNs>(&self, delay: &mut D) {
        self.signals.reset.wait().await;
        self.reset(delay).await
    }

    pub async fn reset_task<D: DelayNs>(&self, mut delay: D) -> ! {
        loop {
            self.reset_step(&mut delay).await;
        }
    }

    /// Waits for one identity posted by [`Counter::on_token_detected`] and
    /// runs it through the toggle state machine.
    pub async fn token_step<D: DelayNs>(&self, delay: &mut D) -> TokenOutcome {
        let identity = self.signals.tokens.next().await;
        self.detect_token(&identity, delay).await
    }

    pub async fn token_task<D: DelayNs>(&self, mut delay: D) -> ! {
        loop {
            self.token_step(&mut delay).await;
        }
    }

    /// Polls `reader` once.
    ///
    /// Returns `None` and backs off for the poll interval when no token is
    /// present or its identity could not be read. An unknown identity also
    /// backs off, so every step awaits at least one delay.
    pub async fn poll_step<R, D>(&self, reader: &mut R, delay: &mut D) -> Option<TokenOutcome>
    where
        R: TokenReader,
        D: DelayNs,
    {
        let identity = if reader.poll_for_token() {
            reader.read_identity()
        } else {
            None
        };

        let Some(identity) = identity else {
            delay.delay_ms(self.config.poll_interval_ms).await;
            return None;
        };

        let outcome = self.detect_token(&identity, delay).await;
        if outcome == TokenOutcome::Unknown {
            // No feedback delay ran; a foreign card may still be in the field
            delay.delay_ms(self.config.poll_interval_ms).await;
        }
        Some(outcome)
    }

    /// Reader task for readers without an interrupt line.
    pub async fn poll_reader<R, D>(&self, mut reader: R, mut delay: D) -> !
    where
        R: TokenReader,
        D: DelayNs,
    {
        loop {
            self.poll_step(&mut reader, &mut delay).await;
        }
    }
}
