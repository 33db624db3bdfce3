use core::cell::RefCell;

use bitmaps::{Bits, BitsImpl};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex as AsyncMutex};
use embedded_hal_async::delay::DelayNs;

use crate::counter::{
    CounterConfig, CounterError,
    debounce::Debouncer,
    ledger::Ledger,
    present::{Buzzer, Presenter},
    signal::Signals,
    token::{TokenRegistry, token_bytes},
    types::{CountChange, Indicator, SourceId, TokenAction, TokenOutcome, Tone, TriggerOutcome},
};

/// Shared occupancy counter.
///
/// One instance is shared (usually as `&'static`) between the interrupt
/// handlers and the entry, exit, reset and reader tasks.
///
/// # Const Generics
/// - `K`: Number of token latch slots (size of the token registry)
/// - `C`: Capacity of each counting signal and of the token queue
///
/// # Exclusion
/// Every operation that changes the count holds the display guard for the
/// whole mutate-then-render step, and touches the ledger only inside a
/// critical section. Renders therefore always show the latest count, and the
/// ISR-side getters never see a half-applied reset.
pub struct Counter<P, B, const K: usize, const C: usize>
where
    BitsImpl<K>: Bits,
{
    pub(crate) config: CounterConfig,
    pub(crate) ledger: critical_section::Mutex<RefCell<Ledger<K>>>,
    pub(crate) registry: TokenRegistry<K>,
    pub(crate) debouncer: Debouncer,
    pub(crate) signals: Signals<C>,
    pub(crate) display: AsyncMutex<CriticalSectionRawMutex, P>,
    pub(crate) buzzer: AsyncMutex<CriticalSectionRawMutex, B>,
}

impl<P, B, const K: usize, const C: usize> core::fmt::Debug for Counter<P, B, K, C>
where
    BitsImpl<K>: Bits,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Counter")
            .field("config", &self.config)
            .field("count", &self.count())
            .field("signals", &self.signals)
            .finish_non_exhaustive()
    }
}

impl<P, B, const K: usize, const C: usize> Counter<P, B, K, C>
where
    BitsImpl<K>: Bits,
{
    pub fn new(
        config: CounterConfig,
        presenter: P,
        buzzer: B,
        registry: TokenRegistry<K>,
    ) -> Result<Self, CounterError> {
        config.validate()?;

        Ok(Self {
            ledger: critical_section::Mutex::new(RefCell::new(Ledger::new(config.capacity))),
            registry,
            debouncer: Debouncer::new(config.quiet_window_ms),
            signals: Signals::new(),
            display: AsyncMutex::new(presenter),
            buzzer: AsyncMutex::new(buzzer),
            config,
        })
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn capacity(&self) -> u8 {
        self.config.capacity
    }

    pub fn registry(&self) -> &TokenRegistry<K> {
        &self.registry
    }

    pub fn signals(&self) -> &Signals<C> {
        &self.signals
    }

    /// Current number of occupied slots.
    pub fn count(&self) -> u8 {
        self.with_ledger(|ledger| ledger.count())
    }

    /// Returns true if the token owning `slot` is currently counted as in.
    pub fn is_latched(&self, slot: usize) -> Result<bool, CounterError> {
        self.with_ledger(|ledger| ledger.is_latched(slot))
    }

    /// Returns true if any registered token is currently counted as in.
    pub fn any_latched(&self) -> bool {
        self.with_ledger(|ledger| ledger.any_latched())
    }

    /// Number of events waiting for the task that serves `source`.
    pub fn pending(&self, source: SourceId) -> usize {
        match source {
            SourceId::Entry => self.signals.entry.pending(),
            SourceId::Exit => self.signals.exit.pending(),
            SourceId::Reset => usize::from(self.signals.reset.is_raised()),
        }
    }

    /// Entry point for a control's edge interrupt.
    ///
    /// Never blocks. `now_ms` is milliseconds since boot.
    pub fn on_raw_trigger(&self, source: SourceId, now_ms: u32) -> TriggerOutcome {
        if !self.debouncer.accept(source, now_ms) {
            debug!("{} trigger debounced at {} ms", source, now_ms);
            return TriggerOutcome::Debounced;
        }

        let delivered = match source {
            SourceId::Entry => self.signals.entry.give(),
            SourceId::Exit => self.signals.exit.give(),
            SourceId::Reset => {
                self.signals.reset.raise();
                true
            }
        };

        if delivered {
            TriggerOutcome::Forwarded
        } else {
            warn!("{} signal full, trigger dropped", source);
            TriggerOutcome::Dropped
        }
    }

    /// Entry point for a reader's card-present interrupt.
    ///
    /// Never blocks. `now_ms` is milliseconds since boot; the same identity
    /// reported again inside the quiet window is debounced. Identities that
    /// cannot be stored (empty or longer than
    /// [`MAX_TOKEN_LEN`](crate::counter::MAX_TOKEN_LEN)) can never match the
    /// registry and are dropped here.
    pub fn on_token_detected(&self, identity: &[u8], now_ms: u32) -> TriggerOutcome {
        let Ok(bytes) = token_bytes(identity) else {
            debug!("unusable token identity of {} bytes", identity.len());
            return TriggerOutcome::Dropped;
        };

        if !self.debouncer.accept_token(&bytes, now_ms) {
            debug!("token {} debounced at {} ms", identity, now_ms);
            return TriggerOutcome::Debounced;
        }

        if self.signals.tokens.post(bytes) {
            TriggerOutcome::Forwarded
        } else {
            warn!("token queue full, detection dropped");
            TriggerOutcome::Dropped
        }
    }

    pub(crate) fn with_ledger<R>(&self, f: impl FnOnce(&mut Ledger<K>) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.ledger.borrow_ref_mut(cs)))
    }
}

impl<P, B, const K: usize, const C: usize> Counter<P, B, K, C>
where
    P: Presenter,
    B: Buzzer,
    BitsImpl<K>: Bits,
{
    /// Adds one occupant.
    ///
    /// At capacity the count is left alone and the alarm sounds instead of a
    /// redraw. Reaching capacity also sounds the alarm.
    pub async fn increment<D: DelayNs>(&self, delay: &mut D) -> CountChange {
        let change = {
            let mut presenter = self.display.lock().await;
            let change = self.with_ledger(|ledger| ledger.increment());
            if change.is_changed() {
                self.render(&mut presenter, change.count(), delay).await;
            }
            change
        };

        let tone = self.entry_tone(change.count());
        self.feedback(tone, delay).await;
        change
    }

    /// Removes one occupant. Empty is a silent no-op apart from the chirp.
    pub async fn decrement<D: DelayNs>(&self, delay: &mut D) -> CountChange {
        let change = {
            let mut presenter = self.display.lock().await;
            let change = self.with_ledger(|ledger| ledger.decrement());
            if change.is_changed() {
                self.render(&mut presenter, change.count(), delay).await;
            }
            change
        };

        self.feedback(Tone::ExitChirp, delay).await;
        change
    }

    /// Empties the counter, clears every token latch and plays the double beep.
    pub async fn reset<D: DelayNs>(&self, delay: &mut D) {
        {
            let mut presenter = self.display.lock().await;
            self.with_ledger(|ledger| ledger.reset());
            info!("counter reset");
            self.render(&mut presenter, 0, delay).await;
        }

        self.buzzer.lock().await.play(Tone::ResetHigh);
        delay.delay_ms(self.config.reset_beep_ms).await;
        self.buzzer.lock().await.silence();
        delay.delay_ms(self.config.reset_gap_ms).await;
        self.feedback(Tone::ResetLow, delay).await;
    }

    /// Runs one detection of `identity` through the toggle state machine.
    ///
    /// Unknown identities change nothing and produce no feedback.
    pub async fn detect_token<D: DelayNs>(&self, identity: &[u8], delay: &mut D) -> TokenOutcome {
        debug!("token {} read", identity);

        let Some(slot) = self.registry.lookup(identity) else {
            info!("unknown token {}", identity);
            return TokenOutcome::Unknown;
        };

        let action = {
            let mut presenter = self.display.lock().await;
            let action = match self.with_ledger(|ledger| ledger.toggle(slot)) {
                Ok(action) => action,
                Err(_) => return TokenOutcome::Unknown,
            };
            if !matches!(action, TokenAction::Refused(_)) {
                self.render(&mut presenter, action.count(), delay).await;
            }
            action
        };

        let tone = match action {
            TokenAction::Entered(count) => self.entry_tone(count),
            TokenAction::Left(_) => Tone::ExitChirp,
            TokenAction::Refused(_) => {
                info!("token {} refused, counter full", slot);
                Tone::Alarm
            }
        };
        self.feedback(tone, delay).await;

        TokenOutcome::Applied { slot, action }
    }

    /// Redraws the current count without changing it.
    pub async fn refresh<D: DelayNs>(&self, delay: &mut D) {
        let mut presenter = self.display.lock().await;
        let count = self.count();
        self.render(&mut presenter, count, delay).await;
    }

    /// Draws `count` while the caller holds the display guard.
    async fn render<D: DelayNs>(&self, presenter: &mut P, count: u8, delay: &mut D) {
        let capacity = self.config.capacity;
        let remaining = capacity.saturating_sub(count);

        presenter.draw_remaining(remaining);
        presenter.set_indicator(Indicator::for_count(count, capacity));

        if count >= capacity {
            delay.delay_ms(self.config.blink_ms).await;
            presenter.clear_matrix();
            delay.delay_ms(self.config.blink_ms).await;
            presenter.draw_remaining(remaining);
        }
    }

    fn entry_tone(&self, count: u8) -> Tone {
        if count >= self.config.capacity {
            info!("counter full at {}", count);
            Tone::Alarm
        } else {
            Tone::EntryChirp
        }
    }

    async fn feedback<D: DelayNs>(&self, tone: Tone, delay: &mut D) {
        self.buzzer.lock().await.play(tone);
        delay.delay_ms(self.config.post_event_ms).await;
        self.buzzer.lock().await.silence();
    }
}
