use crate::counter::CounterError;

/// Capacity and timing parameters of a [`Counter`](crate::counter::Counter).
///
/// The defaults reproduce the reference installation: nine slots, a 200 ms
/// debounce window and half a second of feedback after each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CounterConfig {
    /// Number of slots (`N`).
    pub capacity: u8,
    /// Triggers closer than this to the last accepted one are discarded.
    pub quiet_window_ms: u32,
    /// Time a feedback tone sounds before the task waits again.
    pub post_event_ms: u32,
    /// Length of the first reset beep.
    pub reset_beep_ms: u32,
    /// Silence between the two reset beeps.
    pub reset_gap_ms: u32,
    /// Length of each phase of the full-counter blink.
    pub blink_ms: u32,
    /// Backoff between reader polls that found no token.
    pub poll_interval_ms: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            capacity: 9,
            quiet_window_ms: 200,
            post_event_ms: 500,
            reset_beep_ms: 150,
            reset_gap_ms: 300,
            blink_ms: 300,
            poll_interval_ms: 500,
        }
    }
}

impl CounterConfig {
    pub fn with_capacity(mut self, capacity: u8) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_quiet_window_ms(mut self, ms: u32) -> Self {
        self.quiet_window_ms = ms;
        self
    }

    pub fn with_post_event_ms(mut self, ms: u32) -> Self {
        self.post_event_ms = ms;
        self
    }

    pub fn with_reset_timing_ms(mut self, beep_ms: u32, gap_ms: u32) -> Self {
        self.reset_beep_ms = beep_ms;
        self.reset_gap_ms = gap_ms;
        self
    }

    pub fn with_blink_ms(mut self, ms: u32) -> Self {
        self.blink_ms = ms;
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Checks that the configuration describes a usable counter.
    ///
    /// # Errors
    /// * [`CounterError::ZeroCapacity`] - if `capacity` is 0
    pub fn validate(&self) -> Result<(), CounterError> {
        if self.capacity == 0 {
            return Err(CounterError::ZeroCapacity);
        }
        Ok(())
    }
}
