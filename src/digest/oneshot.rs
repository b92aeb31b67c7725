// Licensed under the Apache-2.0 license

//! Single-call digests built on the incremental contexts.

use super::context::ShaContext;
use super::word::Word;
use crate::algorithm::{ShaFamily, ShaMode};
use crate::engine::ShaEngine;
use crate::error::ShaError;
use crate::hardware::ShaHardware;
use embedded_hal::delay::DelayNs;

fn run<W, const BLOCK: usize, const WORDS: usize, H, D>(
    engine: &ShaEngine<H, D>,
    mode: ShaMode,
    data: &[u8],
    output: &mut [u8],
) -> Result<(), ShaError>
where
    W: Word,
    H: ShaHardware,
    D: DelayNs + Clone,
{
    let mut ctx = ShaContext::<W, BLOCK, WORDS>::new();
    ctx.starts_with(engine, mode)?;
    let result = ctx
        .update(engine, data)
        .and_then(|()| ctx.finish(engine, output));
    ctx.clear();
    result
}

/// Hash `data` with `mode` into `output`
///
/// # Errors
///
/// `output` must be exactly `mode.digest_size()` bytes, otherwise
/// `ShaError::InvalidArgument`. Engine errors are passed through.
pub fn digest<H: ShaHardware, D: DelayNs + Clone>(
    engine: &ShaEngine<H, D>,
    mode: ShaMode,
    data: &[u8],
    output: &mut [u8],
) -> Result<(), ShaError> {
    if output.len() != mode.digest_size() {
        return Err(ShaError::InvalidArgument);
    }
    match mode.family() {
        ShaFamily::Sha1 => run::<u32, 64, 5, H, D>(engine, mode, data, output),
        ShaFamily::Sha256 => run::<u32, 64, 8, H, D>(engine, mode, data, output),
        ShaFamily::Sha512 => run::<u64, 128, 8, H, D>(engine, mode, data, output),
    }
}

/// SHA-1 digest of `data`
///
/// # Errors
///
/// Engine errors from [`digest`].
pub fn sha1<H: ShaHardware, D: DelayNs + Clone>(
    engine: &ShaEngine<H, D>,
    data: &[u8],
) -> Result<[u8; 20], ShaError> {
    let mut out = [0u8; 20];
    digest(engine, ShaMode::Sha1, data, &mut out)?;
    Ok(out)
}

/// SHA-224 digest of `data`
pub fn sha224<H: ShaHardware, D: DelayNs + Clone>(
    engine: &ShaEngine<H, D>,
    data: &[u8],
) -> Result<[u8; 28], ShaError> {
    let mut out = [0u8; 28];
    digest(engine, ShaMode::Sha224, data, &mut out)?;
    Ok(out)
}

/// SHA-256 digest of `data`
pub fn sha256<H: ShaHardware, D: DelayNs + Clone>(
    engine: &ShaEngine<H, D>,
    data: &[u8],
) -> Result<[u8; 32], ShaError> {
    let mut out = [0u8; 32];
    digest(engine, ShaMode::Sha256, data, &mut out)?;
    Ok(out)
}

/// SHA-384 digest of `data`
pub fn sha384<H: ShaHardware, D: DelayNs + Clone>(
    engine: &ShaEngine<H, D>,
    data: &[u8],
) -> Result<[u8; 48], ShaError> {
    let mut out = [0u8; 48];
    digest(engine, ShaMode::Sha384, data, &mut out)?;
    Ok(out)
}

/// SHA-512 digest of `data`
pub fn sha512<H: ShaHardware, D: DelayNs + Clone>(
    engine: &ShaEngine<H, D>,
    data: &[u8],
) -> Result<[u8; 64], ShaError> {
    let mut out = [0u8; 64];
    digest(engine, ShaMode::Sha512, data, &mut out)?;
    Ok(out)
}
