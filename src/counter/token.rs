use heapless::Vec;

use crate::counter::CounterError;

/// Longest identity accepted, enough for triple-size proximity UIDs.
pub const MAX_TOKEN_LEN: usize = 10;

/// Raw identity bytes as read from a token.
pub type TokenBytes = Vec<u8, MAX_TOKEN_LEN>;

/// Builds [`TokenBytes`] from a slice.
///
/// # Errors
/// * [`CounterError::EmptyToken`] - if `bytes` is empty
/// * [`CounterError::TokenTooLong`] - if `bytes` exceeds [`MAX_TOKEN_LEN`]
pub fn token_bytes(bytes: &[u8]) -> Result<TokenBytes, CounterError> {
    if bytes.is_empty() {
        return Err(CounterError::EmptyToken);
    }
    Vec::from_slice(bytes).map_err(|_| CounterError::TokenTooLong)
}

/// Fixed table of known token identities.
///
/// Each registered identity owns one latch slot, numbered in registration
/// order. Lookups compare the full byte sequence, length included.
#[derive(Debug, Clone)]
pub struct TokenRegistry<const K: usize> {
    ids: Vec<TokenBytes, K>,
}

impl<const K: usize> TokenRegistry<K> {
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Adds `identity` and returns its latch slot.
    ///
    /// # Errors
    /// * [`CounterError::EmptyToken`] / [`CounterError::TokenTooLong`] - invalid identity
    /// * [`CounterError::DuplicateToken`] - identity already registered
    /// * [`CounterError::RegistryFull`] - all `K` slots are taken
    pub fn register(&mut self, identity: &[u8]) -> Result<usize, CounterError> {
        let bytes = token_bytes(identity)?;
        if self.lookup(identity).is_some() {
            return Err(CounterError::DuplicateToken);
        }
        let slot = self.ids.len();
        self.ids
            .push(bytes)
            .map_err(|_| CounterError::RegistryFull)?;
        Ok(slot)
    }

    /// Returns the latch slot for `identity`, if registered.
    pub fn lookup(&self, identity: &[u8]) -> Option<usize> {
        self.ids.iter().position(|id| id.as_slice() == identity)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<const K: usize> Default for TokenRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Polled proximity reader.
pub trait TokenReader {
    /// Returns true if a new token entered the field.
    fn poll_for_token(&mut self) -> bool;
    /// Reads the identity of the token found by the last successful poll.
    ///
    /// Returns `None` if the read failed; the caller goes back to polling.
    fn read_identity(&mut self) -> Option<TokenBytes>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: [u8; 4] = [0x90, 0x93, 0x18, 0x43];
    const TAG: [u8; 4] = [0x43, 0x76, 0xBB, 0x04];

    #[test]
    fn slots_follow_registration_order() {
        let mut registry = TokenRegistry::<2>::new();
        assert_eq!(registry.register(&CARD), Ok(0));
        assert_eq!(registry.register(&TAG), Ok(1));

        assert_eq!(registry.lookup(&TAG), Some(1));
        assert_eq!(registry.lookup(&CARD), Some(0));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn lookup_requires_exact_bytes() {
        let mut registry = TokenRegistry::<2>::new();
        registry.register(&CARD).unwrap();

        // Prefix, extension and single-byte difference all miss
        assert_eq!(registry.lookup(&CARD[..3]), None);
        assert_eq!(registry.lookup(&[0x90, 0x93, 0x18, 0x43, 0x00]), None);
        assert_eq!(registry.lookup(&[0x90, 0x93, 0x18, 0x44]), None);
    }

    #[test]
    fn register_errors() {
        let mut registry = TokenRegistry::<1>::new();

        assert_eq!(registry.register(&[]), Err(CounterError::EmptyToken));
        assert_eq!(
            registry.register(&[0u8; MAX_TOKEN_LEN + 1]),
            Err(CounterError::TokenTooLong)
        );

        registry.register(&CARD).unwrap();
        assert_eq!(registry.register(&CARD), Err(CounterError::DuplicateToken));
        assert_eq!(registry.register(&TAG), Err(CounterError::RegistryFull));
    }

    #[test]
    fn seven_byte_identities_are_accepted() {
        let uid = [0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        let bytes = token_bytes(&uid).unwrap();
        assert_eq!(bytes.as_slice(), &uid);
    }
}
