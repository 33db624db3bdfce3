use crate::counter::types::{Indicator, Tone};

/// Visual output driven by the counter: slot display, LED matrix and the
/// tri-color indicator.
///
/// Calls are made only while the counter holds its display guard, so an
/// implementation never sees two renders interleaved.
pub trait Presenter {
    /// Draws the number of free slots on the display and the LED matrix.
    fn draw_remaining(&mut self, remaining: u8);
    /// Switches the indicator to `indicator`.
    fn set_indicator(&mut self, indicator: Indicator);
    /// Blanks the LED matrix.
    fn clear_matrix(&mut self);
}

/// Audible output driven by the counter.
pub trait Buzzer {
    /// Starts playing `tone`; it keeps sounding until [`Buzzer::silence`].
    fn play(&mut self, tone: Tone);
    /// Stops any tone.
    fn silence(&mut self);
}

/// Buzzer that discards every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBuzzer;

impl Buzzer for NoBuzzer {
    fn play(&mut self, _tone: Tone) {}
    fn silence(&mut self) {}
}
