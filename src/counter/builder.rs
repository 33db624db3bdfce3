use core::marker::PhantomData;

use bitmaps::{Bits, BitsImpl};

use crate::counter::{
    Counter, CounterConfig, CounterError,
    present::{Buzzer, NoBuzzer, Presenter},
    token::TokenRegistry,
};

// Builder states
pub struct NeedPresenter;
pub struct NeedBuzzer;
pub struct NeedTokens;
pub struct Ready;

/// Step-by-step construction of a [`Counter`].
///
/// The presenter, buzzer and token registry must be supplied in that order;
/// the configuration can be changed at any step.
///
/// # Example
/// ```
/// use slot_counter::prelude::*;
///
/// struct Screen;
/// impl Presenter for Screen {
///     fn draw_remaining(&mut self, _remaining: u8) {}
///     fn set_indicator(&mut self, _indicator: Indicator) {}
///     fn clear_matrix(&mut self) {}
/// }
///
/// let counter: Counter<Screen, NoBuzzer, 1, 4> = CounterBuilder::new()
///     .capacity(4)
///     .presenter(Screen)
///     .no_buzzer()
///     .tokens(TokenRegistry::new())
///     .build()
///     .unwrap();
///
/// assert_eq!(counter.capacity(), 4);
/// ```
pub struct CounterBuilder<P, B, R, State> {
    config: CounterConfig,
    presenter: P,
    buzzer: B,
    registry: R,
    _state: PhantomData<State>,
}

// Start the builder
impl CounterBuilder<(), (), (), NeedPresenter> {
    pub fn new() -> Self {
        CounterBuilder {
            config: CounterConfig::default(),
            presenter: (),
            buzzer: (),
            registry: (),
            _state: PhantomData,
        }
    }
}

impl Default for CounterBuilder<(), (), (), NeedPresenter> {
    fn default() -> Self {
        Self::new()
    }
}

// Configuration is available in every state
impl<P, B, R, State> CounterBuilder<P, B, R, State> {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: CounterConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the number of slots.
    pub fn capacity(mut self, capacity: u8) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Sets the debounce quiet window.
    pub fn quiet_window_ms(mut self, ms: u32) -> Self {
        self.config.quiet_window_ms = ms;
        self
    }
}

// Set presenter
impl CounterBuilder<(), (), (), NeedPresenter> {
    pub fn presenter<P: Presenter>(self, presenter: P) -> CounterBuilder<P, (), (), NeedBuzzer> {
        CounterBuilder {
            config: self.config,
            presenter,
            buzzer: (),
            registry: (),
            _state: PhantomData,
        }
    }
}

// Set buzzer
impl<P: Presenter> CounterBuilder<P, (), (), NeedBuzzer> {
    pub fn buzzer<B: Buzzer>(self, buzzer: B) -> CounterBuilder<P, B, (), NeedTokens> {
        CounterBuilder {
            config: self.config,
            presenter: self.presenter,
            buzzer,
            registry: (),
            _state: PhantomData,
        }
    }

    /// Build without audible feedback.
    pub fn no_buzzer(self) -> CounterBuilder<P, NoBuzzer, (), NeedTokens> {
        self.buzzer(NoBuzzer)
    }
}

// Set token registry
impl<P: Presenter, B: Buzzer> CounterBuilder<P, B, (), NeedTokens> {
    pub fn tokens<const K: usize>(
        self,
        registry: TokenRegistry<K>,
    ) -> CounterBuilder<P, B, TokenRegistry<K>, Ready>
    where
        BitsImpl<K>: Bits,
    {
        CounterBuilder {
            config: self.config,
            presenter: self.presenter,
            buzzer: self.buzzer,
            registry,
            _state: PhantomData,
        }
    }
}

// Build
impl<P: Presenter, B: Buzzer, const K: usize> CounterBuilder<P, B, TokenRegistry<K>, Ready>
where
    BitsImpl<K>: Bits,
{
    /// Validates the configuration and builds the counter.
    ///
    /// `C` is the capacity of each counting signal and of the token queue.
    ///
    /// # Errors
    /// * [`CounterError::ZeroCapacity`] - if the configured capacity is 0
    pub fn build<const C: usize>(self) -> Result<Counter<P, B, K, C>, CounterError> {
        Counter::new(self.config, self.presenter, self.buzzer, self.registry)
    }
}
