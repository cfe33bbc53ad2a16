//! Per-direction record sequence register (RFC 5246 §6.1).
//!
//! The counter starts at zero for every epoch and is never allowed to wrap:
//! the record after `2^64 - 1` has to go out under a new epoch.
//!
//! 按方向计数的记录序列号寄存器；每个纪元从零开始，不允许回绕。

use super::CryptoError;

/// Length of the sequence number on the wire.
pub const SEQUENCE_NUMBER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    pub const ZERO: SequenceNumber = SequenceNumber(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// Big-endian encoding used in the record MAC / AEAD nonce input.
    pub fn to_be_bytes(self) -> [u8; SEQUENCE_NUMBER_LEN] {
        self.0.to_be_bytes()
    }

    /// Returns the current value and moves the register forward by one.
    ///
    /// 返回当前值并将寄存器加一。
    pub fn advance(&mut self) -> Result<u64, CryptoError> {
        let current = self.0;
        self.0 = current.checked_add(1).ok_or(CryptoError::SequenceOverflow)?;
        Ok(current)
    }

    /// Resets the register for a new epoch. Only the activation step calls this.
    pub(crate) fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_returns_the_value_in_use() {
        let mut seq = SequenceNumber::ZERO;
        assert_eq!(seq.advance().unwrap(), 0);
        assert_eq!(seq.advance().unwrap(), 1);
        assert_eq!(seq.value(), 2);
    }

    #[test]
    fn advance_never_wraps() {
        let mut seq = SequenceNumber::new(u64::MAX);
        assert_eq!(seq.advance(), Err(CryptoError::SequenceOverflow));
        assert_eq!(seq.value(), u64::MAX);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut seq = SequenceNumber::new(42);
        seq.reset();
        assert!(seq.is_zero());
        assert_eq!(seq.to_be_bytes(), [0u8; SEQUENCE_NUMBER_LEN]);
    }
}
