/// Errors that can occur while setting up a counter.
///
/// Runtime degradations (debounced triggers, dropped signals, unknown tokens,
/// saturation) are reported through outcome types, not through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterError {
    /// Capacity must be at least one slot.
    ZeroCapacity,
    /// Token identity has no bytes.
    EmptyToken,
    /// Token identity exceeds the maximum identity length.
    TokenTooLong,
    /// Token identity is already registered.
    DuplicateToken,
    /// Token registry has no free slots.
    RegistryFull,
    /// Latch slot index is not backed by a registered token.
    UnknownSlot,
}

impl core::fmt::Display for CounterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CounterError::ZeroCapacity => write!(f, "capacity must be at least one slot"),
            CounterError::EmptyToken => write!(f, "token identity is empty"),
            CounterError::TokenTooLong => write!(f, "token identity exceeds maximum length"),
            CounterError::DuplicateToken => write!(f, "token identity already registered"),
            CounterError::RegistryFull => write!(f, "token registry is full"),
            CounterError::UnknownSlot => write!(f, "latch slot is not registered"),
        }
    }
}
