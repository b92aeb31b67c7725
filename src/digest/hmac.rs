// Licensed under the Apache-2.0 license

//! Keyed-hash message authentication (RFC 2104) over the hash contexts.
//!
//! Keys longer than the block size are hashed first; shorter keys are
//! zero-padded. The inner and outer hashes are ordinary sessions on the
//! shared engine, so HMAC interleaves with plain hashing like any other
//! session.

use super::context::{Lifecycle, ShaContext};
use super::word::Word;
use crate::algorithm::{ShaFamily, ShaMode};
use crate::engine::ShaEngine;
use crate::error::ShaError;
use crate::hardware::ShaHardware;
use embedded_hal::delay::DelayNs;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;
const MAX_DIGEST: usize = 64;

/// HMAC session for one algorithm family
///
/// Holds the inner hash session and the outer pad; the outer hash is run
/// by `finish`. Use the [`HmacSha1`], [`HmacSha256`] and [`HmacSha512`]
/// aliases.
pub struct HmacContext<W: Word, const BLOCK: usize, const WORDS: usize> {
    inner: ShaContext<W, BLOCK, WORDS>,
    opad: [u8; BLOCK],
}

/// HMAC-SHA-1
pub type HmacSha1 = HmacContext<u32, 64, 5>;
/// HMAC-SHA-224 / HMAC-SHA-256
pub type HmacSha256 = HmacContext<u32, 64, 8>;
/// HMAC-SHA-384 / HMAC-SHA-512
pub type HmacSha512 = HmacContext<u64, 128, 8>;

impl<W: Word, const BLOCK: usize, const WORDS: usize> Default for HmacContext<W, BLOCK, WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Word, const BLOCK: usize, const WORDS: usize> HmacContext<W, BLOCK, WORDS> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: ShaContext::new(),
            opad: [0; BLOCK],
        }
    }

    /// Key a new MAC computation with `mode`
    ///
    /// # Errors
    ///
    /// - `ShaError::InvalidArgument` if `mode` is not of this context's family
    /// - `ShaError::HardwareUnavailable` if the engine cannot run `mode`
    /// - engine errors while hashing a long key or the inner pad
    pub fn starts<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        mode: ShaMode,
        key: &[u8],
    ) -> Result<(), ShaError> {
        let mut block = [0u8; BLOCK];
        if key.len() > BLOCK {
            let digest = block
                .get_mut(..mode.digest_size())
                .ok_or(ShaError::InvalidArgument)?;
            self.inner.starts_with(engine, mode)?;
            self.inner.update(engine, key)?;
            self.inner.finish(engine, digest)?;
        } else {
            for (dst, src) in block.iter_mut().zip(key) {
                *dst = *src;
            }
        }

        for (o, k) in self.opad.iter_mut().zip(block.iter()) {
            *o = k ^ OPAD;
        }
        for k in block.iter_mut() {
            *k ^= IPAD;
        }

        let result = self
            .inner
            .starts_with(engine, mode)
            .and_then(|()| self.inner.update(engine, &block));
        scrub(&mut block);
        result
    }

    /// Absorb message bytes
    ///
    /// # Errors
    ///
    /// Same as [`ShaContext::update`].
    pub fn update<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        input: &[u8],
    ) -> Result<(), ShaError> {
        self.inner.update(engine, input)
    }

    /// Complete the MAC into `output`, which must be the digest size
    ///
    /// # Errors
    ///
    /// - `ShaError::InvalidState` unless keyed and not yet finished
    /// - `ShaError::InvalidArgument` for a wrongly sized `output`
    /// - engine errors from either hash pass
    pub fn finish<H: ShaHardware, D: DelayNs + Clone>(
        &mut self,
        engine: &ShaEngine<H, D>,
        output: &mut [u8],
    ) -> Result<(), ShaError> {
        let mode = match (self.inner.lifecycle(), self.inner.mode()) {
            (Lifecycle::Init | Lifecycle::Accumulating, Some(mode)) => mode,
            _ => return Err(ShaError::InvalidState),
        };
        if output.len() != mode.digest_size() {
            return Err(ShaError::InvalidArgument);
        }

        let mut inner_digest = [0u8; MAX_DIGEST];
        let digest = inner_digest
            .get_mut(..mode.digest_size())
            .ok_or(ShaError::InvalidArgument)?;
        let result = self
            .inner
            .finish(engine, digest)
            .and_then(|()| self.inner.starts_with(engine, mode))
            .and_then(|()| self.inner.update(engine, &self.opad))
            .and_then(|()| self.inner.update(engine, digest))
            .and_then(|()| self.inner.finish(engine, output));
        scrub(&mut inner_digest);
        scrub(&mut self.opad);
        result
    }

    #[must_use]
    pub const fn mode(&self) -> Option<ShaMode> {
        self.inner.mode()
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle()
    }

    /// Scrub key material and session state
    pub fn clear(&mut self) {
        scrub(&mut self.opad);
        self.inner.clear();
    }
}

fn scrub(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        // SAFETY: `byte` is a valid, exclusive reference
        unsafe { core::ptr::write_volatile(byte, 0) };
    }
}

fn run<W, const BLOCK: usize, const WORDS: usize, H, D>(
    engine: &ShaEngine<H, D>,
    mode: ShaMode,
    key: &[u8],
    data: &[u8],
    output: &mut [u8],
) -> Result<(), ShaError>
where
    W: Word,
    H: ShaHardware,
    D: DelayNs + Clone,
{
    let mut ctx = HmacContext::<W, BLOCK, WORDS>::new();
    let result = ctx
        .starts(engine, mode, key)
        .and_then(|()| ctx.update(engine, data))
        .and_then(|()| ctx.finish(engine, output));
    ctx.clear();
    result
}

/// Compute HMAC-`mode` of `data` under `key` into `output`
///
/// # Errors
///
/// `ShaError::InvalidArgument` if `output` is not `mode.digest_size()`
/// bytes; engine errors are passed through.
pub fn hmac<H: ShaHardware, D: DelayNs + Clone>(
    engine: &ShaEngine<H, D>,
    mode: ShaMode,
    key: &[u8],
    data: &[u8],
    output: &mut [u8],
) -> Result<(), ShaError> {
    if output.len() != mode.digest_size() {
        return Err(ShaError::InvalidArgument);
    }
    match mode.family() {
        ShaFamily::Sha1 => run::<u32, 64, 5, H, D>(engine, mode, key, data, output),
        ShaFamily::Sha256 => run::<u32, 64, 8, H, D>(engine, mode, key, data, output),
        ShaFamily::Sha512 => run::<u64, 128, 8, H, D>(engine, mode, key, data, output),
    }
}
