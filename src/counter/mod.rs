pub mod builder;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub(crate) mod ledger;
pub mod present;
pub mod signal;
pub mod tasks;
pub mod token;
pub mod types;

#[cfg(test)]
mod test_support;

pub use builder::CounterBuilder;
pub use config::CounterConfig;
pub use debounce::Debouncer;
pub use engine::Counter;
pub use error::CounterError;
pub use present::{Buzzer, NoBuzzer, Presenter};
pub use signal::{CountingSignal, ResetFlag, Signals, TokenQueue};
pub use token::{MAX_TOKEN_LEN, TokenBytes, TokenReader, TokenRegistry, token_bytes};
pub use types::{
    CountChange, Indicator, SourceId, TokenAction, TokenOutcome, Tone, TriggerOutcome,
};

pub mod prelude {
    pub use super::{
        Buzzer, CountChange, Counter, CounterBuilder, CounterConfig, CounterError, Indicator,
        NoBuzzer, Presenter, SourceId, TokenAction, TokenBytes, TokenOutcome, TokenReader,
        TokenRegistry, Tone, TriggerOutcome,
    };
}
