// Licensed under the Apache-2.0 license

//! Incremental hash sessions over the shared SHA engine.
//!
//! A context is caller-allocated and holds everything one hash in progress
//! needs: the two-word byte counter, the intermediate digest words, and a
//! one-block buffer for bytes that do not yet form a full block. It never
//! holds the engine between calls; every full block is handed to
//! [`ShaEngine`] which serializes it against all other sessions.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --starts--> Init --update--> Accumulating --finish--> Finished
//!                   |                                  (or Faulted on error)
//!                   +-----------------finish--------------^
//! ```
//!
//! `update` and `finish` are only valid in `Init` or `Accumulating`. After
//! `Finished` or `Faulted` a fresh `starts` is required.

use super::word::{LengthCounter, Word};
use crate::algorithm::ShaMode;
use crate::engine::{EngineBinding, ShaEngine};
use crate::error::ShaError;
use crate::hardware::ShaHardware;
use embedded_hal::delay::DelayNs;

/// Where a context is in its start / absorb / finish sequence
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    /// Never started, or scrubbed with `clear()`
    Idle,
    /// Started, no message bytes absorbed yet
    Init,
    /// At least one byte absorbed
    Accumulating,
    /// Digest emitted
    Finished,
    /// An `update` or `finish` failed part-way
    Faulted,
}

/// Hash session for one algorithm family
///
/// `W` is the family's state word, `BLOCK` its block size in bytes and
/// `WORDS` the number of intermediate state words. Use the
/// [`Sha1Context`], [`Sha256Context`] and [`Sha512Context`] aliases.
pub struct ShaContext<W: Word, const BLOCK: usize, const WORDS: usize> {
    total: LengthCounter<W>,
    state: [W; WORDS],
    buffer: heapless::Vec<u8, BLOCK>,
    mode: Option<ShaMode>,
    lifecycle: Lifecycle,
    binding: EngineBinding,
}

/// SHA-1 session
pub type Sha1Context = ShaContext<u32, 64, 5>;
/// SHA-224 / SHA-256 session
pub type Sha256Context = ShaContext<u32, 64, 8>;
/// SHA-384 / SHA-512 session
pub type Sha512Context = ShaContext<u64, 128, 8>;

impl<W: Word, const BLOCK: usize, const WORDS: usize> Default for ShaContext<W, BLOCK, WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Word, const BLOCK: usize, const WORDS: usize> ShaContext<W, BLOCK, WORDS> {
    /// A zeroed context; call a `starts` method before use
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total: LengthCounter::new(),
            state: [W::ZERO; WORDS],
            buffer: heapless::Vec::new(),
            mode: None,
            lifecycle: Lifecycle::Idle,
            binding: EngineBinding::new(),
        }
    }

    /// Whether `mode` belongs to this context's algorithm family
    #[must_use]
    pub const fn accepts(mode: ShaMode) -> bool {
        let family = mode.family();
        family.block_size() == BLOCK
            && family.state_words() == WORDS
            && family.word_size() == W::BYTES
    }

    /// Begin a new hash of `mode`, discarding any previous session
    ///
    /// # Errors
    ///
    /// - `ShaError::InvalidArgument` if `mode` is not of this context's family
    /// - `ShaError::HardwareUnavailable` if the engine has not been brought
    ///   up or does not implement `mode`
    pub fn starts_with<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        mode: ShaMode,
    ) -> Result<(), ShaError> {
        if !Self::accepts(mode) {
            return Err(ShaError::InvalidArgument);
        }
        engine.check_available(mode)?;

        self.total = LengthCounter::new();
        self.state = [W::ZERO; WORDS];
        self.buffer.clear();
        self.binding = EngineBinding::new();
        self.mode = Some(mode);
        self.lifecycle = Lifecycle::Init;
        Ok(())
    }

    /// Absorb `input` into the running hash
    ///
    /// Full blocks are processed on the engine immediately; a trailing
    /// partial block stays buffered. Empty input is a no-op.
    ///
    /// # Errors
    ///
    /// - `ShaError::InvalidState` unless the context is `Init` or `Accumulating`
    /// - `ShaError::InvalidArgument` if the message would exceed the
    ///   algorithm's maximum length
    /// - `ShaError::HardwareBusy` / `ShaError::Hardware` from the engine
    ///
    /// On error the context becomes `Faulted`.
    pub fn update<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        input: &[u8],
    ) -> Result<(), ShaError> {
        let mode = self.active_mode()?;
        if input.is_empty() {
            return Ok(());
        }
        let result = self.absorb(engine, mode, input);
        if result.is_err() {
            self.lifecycle = Lifecycle::Faulted;
        }
        result
    }

    /// Pad the message, process the final block(s) and write the digest
    ///
    /// `output` must be exactly the digest size of the selected mode.
    ///
    /// # Errors
    ///
    /// - `ShaError::InvalidState` unless the context is `Init` or `Accumulating`
    /// - `ShaError::InvalidArgument` for a wrongly sized `output` (the
    ///   context is left untouched)
    /// - `ShaError::HardwareBusy` / `ShaError::Hardware` from the engine,
    ///   after which the context is `Faulted`
    pub fn finish<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        output: &mut [u8],
    ) -> Result<(), ShaError> {
        let mode = self.active_mode()?;
        if output.len() != mode.digest_size() {
            return Err(ShaError::InvalidArgument);
        }

        if let Err(err) = self.pad_and_drain(engine, mode) {
            self.lifecycle = Lifecycle::Faulted;
            return Err(err);
        }

        for (chunk, word) in output.chunks_exact_mut(W::BYTES).zip(self.state.iter()) {
            word.write_be(chunk);
        }
        self.lifecycle = Lifecycle::Finished;
        Ok(())
    }

    /// Scrub all session data and return to `Idle`
    pub fn clear(&mut self) {
        // Stale bytes may sit beyond the current length; fill to capacity
        // so the whole backing store is overwritten.
        while self.buffer.push(0).is_ok() {}
        for byte in self.buffer.iter_mut() {
            // SAFETY: `byte` is a valid, exclusive reference into the buffer
            unsafe { core::ptr::write_volatile(byte, 0) };
        }
        self.buffer.clear();
        for word in self.state.iter_mut() {
            // SAFETY: `word` is a valid, exclusive reference into the state
            unsafe { core::ptr::write_volatile(word, W::ZERO) };
        }
        self.total = LengthCounter::new();
        self.binding = EngineBinding::new();
        self.mode = None;
        self.lifecycle = Lifecycle::Idle;
    }

    #[must_use]
    pub const fn mode(&self) -> Option<ShaMode> {
        self.mode
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Message bytes absorbed since `starts`
    #[must_use]
    pub fn total(&self) -> u128 {
        self.total.bytes()
    }

    /// Bytes waiting in the partial-block buffer
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// True until the first block of this session has been processed
    #[must_use]
    pub const fn first_block(&self) -> bool {
        self.binding.first_block()
    }

    /// Engine residency record, see [`ShaEngine::holds_live_state`]
    #[must_use]
    pub const fn binding(&self) -> &EngineBinding {
        &self.binding
    }

    fn active_mode(&self) -> Result<ShaMode, ShaError> {
        match (self.lifecycle, self.mode) {
            (Lifecycle::Init | Lifecycle::Accumulating, Some(mode)) => Ok(mode),
            _ => Err(ShaError::InvalidState),
        }
    }

    fn absorb<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        mode: ShaMode,
        input: &[u8],
    ) -> Result<(), ShaError> {
        self.total.add(input.len())?;
        self.lifecycle = Lifecycle::Accumulating;

        let mut rest = input;
        while !rest.is_empty() {
            if self.buffer.is_empty() && rest.len() >= BLOCK {
                let (block, tail) = rest.split_at(BLOCK);
                engine.feed_block(&mut self.binding, mode, &mut self.state, block)?;
                rest = tail;
                continue;
            }

            let room = BLOCK - self.buffer.len();
            let (head, tail) = rest.split_at(room.min(rest.len()));
            self.push(head)?;
            rest = tail;
            if self.buffer.is_full() {
                self.drain(engine, mode)?;
            }
        }
        Ok(())
    }

    fn pad_and_drain<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        mode: ShaMode,
    ) -> Result<(), ShaError> {
        let length_field = 2 * W::BYTES;
        let (bits_high, bits_low) = self.total.bit_length();

        self.push(&[0x80])?;
        if self.buffer.len() > BLOCK - length_field {
            self.zero_fill(BLOCK)?;
            self.drain(engine, mode)?;
        }
        self.zero_fill(BLOCK - length_field)?;

        let mut field = [0u8; 16];
        {
            let mut words = field.chunks_exact_mut(W::BYTES);
            if let (Some(high), Some(low)) = (words.next(), words.next()) {
                bits_high.write_be(high);
                bits_low.write_be(low);
            }
        }
        self.push(field.get(..length_field).ok_or(ShaError::InvalidArgument)?)?;
        self.drain(engine, mode)
    }

    fn push(&mut self, bytes: &[u8]) -> Result<(), ShaError> {
        self.buffer
            .extend_from_slice(bytes)
            .map_err(|()| ShaError::InvalidArgument)
    }

    fn zero_fill(&mut self, len: usize) -> Result<(), ShaError> {
        self.buffer
            .resize(len, 0)
            .map_err(|()| ShaError::InvalidArgument)
    }

    fn drain<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        mode: ShaMode,
    ) -> Result<(), ShaError> {
        engine.feed_block(&mut self.binding, mode, &mut self.state, &self.buffer)?;
        self.buffer.clear();
        Ok(())
    }
}

impl Sha1Context {
    /// Begin a SHA-1 hash
    ///
    /// # Errors
    ///
    /// Returns `ShaError::HardwareUnavailable` if the engine is not ready.
    pub fn starts<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
    ) -> Result<(), ShaError> {
        self.starts_with(engine, ShaMode::Sha1)
    }
}

impl Sha256Context {
    /// Begin a SHA-256 hash, or SHA-224 when `is224` is set
    ///
    /// # Errors
    ///
    /// Returns `ShaError::HardwareUnavailable` if the engine is not ready.
    pub fn starts<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        is224: bool,
    ) -> Result<(), ShaError> {
        let mode = if is224 { ShaMode::Sha224 } else { ShaMode::Sha256 };
        self.starts_with(engine, mode)
    }
}

impl Sha512Context {
    /// Begin a SHA-512 hash, or SHA-384 when `is384` is set
    ///
    /// # Errors
    ///
    /// Returns `ShaError::HardwareUnavailable` if the engine is not ready or
    /// lacks the SHA-512 family.
    pub fn starts<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        is384: bool,
    ) -> Result<(), ShaError> {
        let mode = if is384 { ShaMode::Sha384 } else { ShaMode::Sha512 };
        self.starts_with(engine, mode)
    }
}
