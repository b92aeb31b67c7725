// Licensed under the Apache-2.0 license

//! State word widths and the two-word message length counter.

use crate::error::ShaError;
use core::fmt::Debug;
use core::ops::{BitOr, Shl, Shr};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// A native state word of one algorithm family (`u32` or `u64`)
pub trait Word:
    sealed::Sealed
    + Copy
    + Default
    + Eq
    + Debug
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + BitOr<Output = Self>
{
    const BITS: u32;
    const BYTES: usize;
    const ZERO: Self;
    const ONE: Self;

    fn overflowing_add(self, rhs: Self) -> (Self, bool);

    /// Split a byte count into (low, high) counter words
    fn split_len(len: u64) -> (Self, Self);

    fn widen(self) -> u128;

    /// Write `self` big-endian into `out` (`out.len() == BYTES`)
    fn write_be(self, out: &mut [u8]);

    /// Pack state words into the 32-bit working register image
    fn store_regs(words: &[Self], regs: &mut [u32]);

    /// Unpack a 32-bit working register image into state words
    fn load_regs(regs: &[u32], words: &mut [Self]);
}

impl Word for u32 {
    const BITS: u32 = u32::BITS;
    const BYTES: usize = 4;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        u32::overflowing_add(self, rhs)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn split_len(len: u64) -> (Self, Self) {
        (len as u32, (len >> 32) as u32)
    }

    fn widen(self) -> u128 {
        u128::from(self)
    }

    fn write_be(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_be_bytes());
    }

    fn store_regs(words: &[Self], regs: &mut [u32]) {
        for (reg, word) in regs.iter_mut().zip(words) {
            *reg = *word;
        }
    }

    fn load_regs(regs: &[u32], words: &mut [Self]) {
        for (word, reg) in words.iter_mut().zip(regs) {
            *word = *reg;
        }
    }
}

impl Word for u64 {
    const BITS: u32 = u64::BITS;
    const BYTES: usize = 8;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        u64::overflowing_add(self, rhs)
    }

    fn split_len(len: u64) -> (Self, Self) {
        (len, 0)
    }

    fn widen(self) -> u128 {
        u128::from(self)
    }

    fn write_be(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_be_bytes());
    }

    #[allow(clippy::cast_possible_truncation)]
    fn store_regs(words: &[Self], regs: &mut [u32]) {
        for (pair, word) in regs.chunks_exact_mut(2).zip(words) {
            if let [high, low] = pair {
                *high = (*word >> 32) as u32;
                *low = *word as u32;
            }
        }
    }

    fn load_regs(regs: &[u32], words: &mut [Self]) {
        for (word, pair) in words.iter_mut().zip(regs.chunks_exact(2)) {
            if let [high, low] = pair {
                *word = (u64::from(*high) << 32) | u64::from(*low);
            }
        }
    }
}

/// Number of message bytes absorbed, held as two words with explicit carry
///
/// The counter refuses to grow past the point where `bytes * 8` would no
/// longer fit in the algorithm's two-word length field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LengthCounter<W: Word> {
    low: W,
    high: W,
}

impl<W: Word> Default for LengthCounter<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Word> LengthCounter<W> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            low: W::ZERO,
            high: W::ZERO,
        }
    }

    /// Add `len` bytes to the counter
    ///
    /// # Errors
    ///
    /// Returns `ShaError::InvalidArgument` if the total would exceed the
    /// maximum message length; the counter is left unchanged.
    pub fn add(&mut self, len: usize) -> Result<(), ShaError> {
        let len = u64::try_from(len).map_err(|_| ShaError::InvalidArgument)?;
        let (len_low, len_high) = W::split_len(len);

        let (low, carry) = self.low.overflowing_add(len_low);
        let (high, overflow_a) = self.high.overflowing_add(len_high);
        let (high, overflow_b) = high.overflowing_add(if carry { W::ONE } else { W::ZERO });

        // The top three bits of `high` are shifted out when converting to bits.
        if overflow_a || overflow_b || (high >> (W::BITS - 3)) != W::ZERO {
            return Err(ShaError::InvalidArgument);
        }

        self.low = low;
        self.high = high;
        Ok(())
    }

    /// Total bytes counted
    #[must_use]
    pub fn bytes(&self) -> u128 {
        (self.high.widen() << W::BITS) | self.low.widen()
    }

    /// Message length in bits as (high, low) words
    #[must_use]
    pub fn bit_length(&self) -> (W, W) {
        let high = (self.high << 3) | (self.low >> (W::BITS - 3));
        let low = self.low << 3;
        (high, low)
    }
}
