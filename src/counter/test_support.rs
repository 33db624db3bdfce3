//! Test support utilities - only compiled in test builds.

use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::counter::{
    Counter, CounterConfig,
    present::{Buzzer, Presenter},
    token::{TokenBytes, TokenReader, TokenRegistry},
    types::{Indicator, Tone},
};

/// Card and tag identities of the reference installation.
pub const CARD: [u8; 4] = [0x90, 0x93, 0x18, 0x43];
pub const TAG: [u8; 4] = [0x43, 0x76, 0xBB, 0x04];

const LOG_LEN: usize = 32;

/// Standard test configuration: two token slots, signal capacity 5.
pub type TestCounter = Counter<RecordingPresenter, RecordingBuzzer, 2, 5>;

/// One call observed by [`RecordingPresenter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Remaining(u8),
    Indicator(Indicator),
    Cleared,
}

/// Presenter that records the first calls it receives and always tracks the
/// latest state, so long-running tests can still check the final frame.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    frames: Vec<Frame, LOG_LEN>,
    last_remaining: Option<u8>,
    last_indicator: Option<Indicator>,
}

impl RecordingPresenter {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_remaining(&self) -> Option<u8> {
        self.last_remaining
    }

    pub fn last_indicator(&self) -> Option<Indicator> {
        self.last_indicator
    }

    fn record(&mut self, frame: Frame) {
        // Overflow only drops history, not the tracked state
        let _ = self.frames.push(frame);
    }
}

impl Presenter for RecordingPresenter {
    fn draw_remaining(&mut self, remaining: u8) {
        self.last_remaining = Some(remaining);
        self.record(Frame::Remaining(remaining));
    }

    fn set_indicator(&mut self, indicator: Indicator) {
        self.last_indicator = Some(indicator);
        self.record(Frame::Indicator(indicator));
    }

    fn clear_matrix(&mut self) {
        self.record(Frame::Cleared);
    }
}

/// One call observed by [`RecordingBuzzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Play(Tone),
    Silence,
}

#[derive(Debug, Default)]
pub struct RecordingBuzzer {
    sounds: Vec<Sound, LOG_LEN>,
}

impl RecordingBuzzer {
    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }
}

impl Buzzer for RecordingBuzzer {
    fn play(&mut self, tone: Tone) {
        let _ = self.sounds.push(Sound::Play(tone));
    }

    fn silence(&mut self) {
        let _ = self.sounds.push(Sound::Silence);
    }
}

/// Delay that returns immediately and records each requested wait in ms.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    waits: Vec<u32, LOG_LEN>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> &[u32] {
        &self.waits
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        let _ = self.waits.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        let _ = self.waits.push(ms);
    }
}

/// Delay that returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Reader that replays a fixed script: `Some(id)` is a token in the field,
/// `None` an empty poll. Polls past the end of the script find nothing.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    script: Vec<Option<TokenBytes>, LOG_LEN>,
    next: usize,
    current: Option<TokenBytes>,
    fail_reads: bool,
}

impl ScriptedReader {
    pub fn new(steps: &[Option<&[u8]>]) -> Self {
        let mut script = Vec::new();
        for step in steps {
            let entry = step.map(|id| TokenBytes::from_slice(id).unwrap());
            script.push(entry).unwrap();
        }
        Self {
            script,
            ..Self::default()
        }
    }

    /// Reader that always sees a token but never manages to read it.
    pub fn failing_read() -> Self {
        Self {
            script: Vec::from_slice(&[Some(TokenBytes::from_slice(&CARD).unwrap())]).unwrap(),
            fail_reads: true,
            ..Self::default()
        }
    }
}

impl TokenReader for ScriptedReader {
    fn poll_for_token(&mut self) -> bool {
        let step = self.script.get(self.next).cloned().flatten();
        self.next += 1;
        self.current = step;
        self.current.is_some()
    }

    fn read_identity(&mut self) -> Option<TokenBytes> {
        if self.fail_reads {
            return None;
        }
        self.current.take()
    }
}

/// Registry holding [`CARD`] in slot 0 and [`TAG`] in slot 1.
pub fn test_registry() -> TokenRegistry<2> {
    let mut registry = TokenRegistry::new();
    registry.register(&CARD).unwrap();
    registry.register(&TAG).unwrap();
    registry
}

/// Helper to create a counter with the default configuration.
pub fn test_counter() -> TestCounter {
    test_counter_with(CounterConfig::default())
}

pub fn test_counter_with(config: CounterConfig) -> TestCounter {
    Counter::new(
        config,
        RecordingPresenter::default(),
        RecordingBuzzer::default(),
        test_registry(),
    )
    .unwrap()
}

impl TestCounter {
    /// Sets the count by direct increments, without rendering or feedback.
    pub fn preload(&self, count: u8) {
        self.with_ledger(|ledger| {
            for _ in 0..count {
                ledger.increment();
            }
        });
    }

    pub fn with_presenter<R>(&self, f: impl FnOnce(&RecordingPresenter) -> R) -> R {
        let presenter = self.display.try_lock().expect("display guard is free");
        f(&presenter)
    }

    pub fn with_buzzer<R>(&self, f: impl FnOnce(&RecordingBuzzer) -> R) -> R {
        let buzzer = self.buzzer.try_lock().expect("buzzer is free");
        f(&buzzer)
    }

    /// Forgets everything recorded so far.
    pub fn clear_recordings(&self) {
        *self.display.try_lock().expect("display guard is free") = RecordingPresenter::default();
        *self.buzzer.try_lock().expect("buzzer is free") = RecordingBuzzer::default();
    }
}
