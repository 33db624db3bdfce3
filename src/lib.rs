//! A `no_std`, no-alloc occupancy counter for embedded systems.
//!
//! This crate tracks how many of `N` slots are occupied. The count is driven by
//! three independent sources: an entry control, an exit control and a
//! proximity-token reader. A reset control returns everything to empty.
//!
//! # Features
//!
//! - **Interrupt-safe handoff** - ISRs post into bounded channels and never block
//! - **Debounced controls** - independent quiet-window filtering per source
//! - **Guarded state** - every mutation of the count runs under the display guard
//!   and a critical section, so no task observes a half-applied change
//! - **Token toggling** - repeated reads of the same token alternate between
//!   entry and exit
//! - **Zero heap allocation** - registry, latches and channels are fixed-size
//!
//! # Architecture
//!
//! ```text
//!  ISR context                      task context
//! ┌──────────────────┐  entry   ┌──────────────┐
//! │ on_raw_trigger() │─────────▶│ entry_task   │──┐
//! │   (debounce)     │  exit    ├──────────────┤  │   ┌──────────────┐
//! │                  │─────────▶│ exit_task    │──┼──▶│ DisplayGuard │──▶ Presenter
//! │                  │  reset   ├──────────────┤  │   │ + ledger     │
//! │                  │─────────▶│ reset_task   │──┤   └──────────────┘
//! │on_token_detected │  token   ├──────────────┤  │
//! │                  │─────────▶│ token_task   │──┤         Buzzer
//! └──────────────────┘          ├──────────────┤  │
//!            reader polling ───▶│ poll_reader  │──┘
//!                               └──────────────┘
//! ```
//!
//! - **ISRs** call [`Counter::on_raw_trigger`] or [`Counter::on_token_detected`];
//!   both return immediately and drop the event if the channel is full
//! - **Tasks** wait on their channel, then mutate the ledger and render while
//!   holding the display guard, then play feedback on the buzzer
//!
//! # Example
//!
//! ```rust,no_run
//! use slot_counter::prelude::*;
//!
//! # struct Screen;
//! # impl Presenter for Screen {
//! #     fn draw_remaining(&mut self, _remaining: u8) {}
//! #     fn set_indicator(&mut self, _indicator: Indicator) {}
//! #     fn clear_matrix(&mut self) {}
//! # }
//! let mut registry = TokenRegistry::<2>::new();
//! registry.register(&[0x90, 0x93, 0x18, 0x43]).unwrap();
//! registry.register(&[0x43, 0x76, 0xBB, 0x04]).unwrap();
//!
//! let counter: Counter<Screen, NoBuzzer, 2, 5> = CounterBuilder::new()
//!     .config(CounterConfig::default().with_capacity(9))
//!     .presenter(Screen)
//!     .buzzer(NoBuzzer)
//!     .tokens(registry)
//!     .build()
//!     .unwrap();
//!
//! // From the GPIO interrupt handler:
//! counter.on_raw_trigger(SourceId::Entry, 1_000);
//! ```

#![deny(unsafe_code)]
#![no_std]

#[macro_use]
mod fmt;

pub mod counter;

pub mod prelude {
    pub use crate::counter::prelude::*;
}
