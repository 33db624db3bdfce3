/// Interrupt-driven control that feeds one of the counter's signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceId {
    /// Adds an occupant.
    Entry,
    /// Removes an occupant.
    Exit,
    /// Empties the counter and clears every token latch.
    Reset,
}

impl SourceId {
    /// Number of distinct sources, one debounce clock each.
    pub const COUNT: usize = 3;

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            SourceId::Entry => 0,
            SourceId::Exit => 1,
            SourceId::Reset => 2,
        }
    }
}

/// Tri-color status shown next to the slot display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Every slot is free.
    Blue,
    /// Some slots are taken, more than one is free.
    Green,
    /// Exactly one slot is free.
    Yellow,
    /// No slot is free.
    Red,
}

impl Indicator {
    /// Selects the indicator for `count` occupied slots out of `capacity`.
    ///
    /// An empty counter is always blue and a full one always red, so with a
    /// capacity of one there is no yellow or green state.
    ///
    /// # Example
    /// ```
    /// use slot_counter::prelude::Indicator;
    ///
    /// assert_eq!(Indicator::for_count(0, 9), Indicator::Blue);
    /// assert_eq!(Indicator::for_count(4, 9), Indicator::Green);
    /// assert_eq!(Indicator::for_count(8, 9), Indicator::Yellow);
    /// assert_eq!(Indicator::for_count(9, 9), Indicator::Red);
    /// ```
    pub fn for_count(count: u8, capacity: u8) -> Self {
        if count == 0 {
            Indicator::Blue
        } else if count >= capacity {
            Indicator::Red
        } else if count == capacity - 1 {
            Indicator::Yellow
        } else {
            Indicator::Green
        }
    }
}

/// Audible patterns requested from the [`Buzzer`](crate::counter::Buzzer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tone {
    /// Rising chirp after an entry.
    EntryChirp,
    /// Falling chirp after an exit.
    ExitChirp,
    /// Horn played when the counter is full.
    Alarm,
    /// First beep of the reset confirmation.
    ResetHigh,
    /// Second beep of the reset confirmation.
    ResetLow,
}

/// Result of an increment or decrement on the occupancy count.
///
/// Both variants carry the count after the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountChange {
    /// The count moved and the display was redrawn.
    Changed(u8),
    /// The count was saturated and left as is.
    Unchanged(u8),
}

impl CountChange {
    /// Returns true if the count moved.
    #[inline]
    pub fn is_changed(&self) -> bool {
        matches!(self, CountChange::Changed(_))
    }

    /// Returns the count after the operation.
    #[inline]
    pub fn count(&self) -> u8 {
        match self {
            CountChange::Changed(c) | CountChange::Unchanged(c) => *c,
        }
    }
}

/// Effect of a recognized token detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TokenAction {
    /// Latch was clear: an occupant was added and the latch set.
    Entered(u8),
    /// Latch was set: an occupant was removed and the latch cleared.
    Left(u8),
    /// Latch was clear but the counter is full; nothing changed.
    Refused(u8),
}

impl TokenAction {
    /// Returns the count after the detection was applied.
    #[inline]
    pub fn count(&self) -> u8 {
        match self {
            TokenAction::Entered(c) | TokenAction::Left(c) | TokenAction::Refused(c) => *c,
        }
    }
}

/// Result of feeding one token identity to the toggle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TokenOutcome {
    /// Identity is not in the registry; nothing changed.
    Unknown,
    /// Identity matched registry slot `slot`.
    Applied { slot: usize, action: TokenAction },
}

/// What happened to a raw trigger delivered from interrupt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerOutcome {
    /// Accepted and posted to the source's channel.
    Forwarded,
    /// Arrived inside the quiet window and was discarded.
    Debounced,
    /// Accepted but the channel was full, so the event was lost.
    Dropped,
}
