// Licensed under the Apache-2.0 license

//! Several sessions advanced in lock-step on one engine, forcing a state
//! save/restore on nearly every block.

use super::{verdict, SelfTestError};
use crate::algorithm::ShaMode;
use crate::digest::{Sha1Context, Sha256Context, Sha512Context};
use crate::engine::ShaEngine;
use crate::hardware::ShaHardware;
use embedded_hal::delay::DelayNs;
use embedded_io::Write;
use hex_literal::hex;
use log::debug;

const MESSAGE: &[u8] = &[b'a'; 1000];
const CHUNK: usize = 37;

const SHA1_EXPECTED: [u8; 20] = hex!("291e9a6c66994949b57ba5e650361e98fc36b1ba");
const SHA224_EXPECTED: [u8; 28] = hex!("4e8f0ce90b64661a2b5e84be6d93a7d9b76871062f1814433d04a03d");
const SHA256_EXPECTED: [u8; 32] =
    hex!("41edece42d63e8d9bf515a9ba6932e1c20cbc9f5a5d134645adb5db1b9737ea3");
const SHA512_EXPECTED: [u8; 64] = hex!(
    "67ba5535a46e3f86dbfbed8cbbaf0125c76ed549ff8b0b9e03e0c88cf90fa634"
    "fa7b12b47d77b694de488ace8d9a65967dc96df599727d3292a8d9d447709c97"
);

/// Interleave SHA-1, SHA-224, SHA-256 and (when present) SHA-512 sessions
///
/// # Errors
///
/// Stops at the first driver error, digest mismatch or report write failure.
pub fn run_interleave_tests<H, D, W>(
    engine: &ShaEngine<H, D>,
    out: &mut W,
) -> Result<(), SelfTestError<W::Error>>
where
    H: ShaHardware,
    D: DelayNs + Clone,
    W: Write,
{
    writeln!(out, "\r\n=== Interleaved Session Tests ===\r")?;
    write!(out, "Testing interleaved sessions... ")?;

    let wide = engine.check_available(ShaMode::Sha512).is_ok();
    let before = engine.stats();

    let mut sha1 = Sha1Context::new();
    let mut sha224 = Sha256Context::new();
    let mut sha256 = Sha256Context::new();
    let mut sha512 = Sha512Context::new();
    sha1.starts(engine)?;
    sha224.starts(engine, true)?;
    sha256.starts(engine, false)?;
    if wide {
        sha512.starts(engine, false)?;
    }

    for chunk in MESSAGE.chunks(CHUNK) {
        sha1.update(engine, chunk)?;
        sha224.update(engine, chunk)?;
        sha256.update(engine, chunk)?;
        if wide {
            sha512.update(engine, chunk)?;
        }
    }

    let mut d1 = [0u8; 20];
    let mut d224 = [0u8; 28];
    let mut d256 = [0u8; 32];
    sha256.finish(engine, &mut d256)?;
    sha1.finish(engine, &mut d1)?;
    sha224.finish(engine, &mut d224)?;

    let restores = engine.stats().restores - before.restores;
    debug!("interleave run needed {restores} state restores");
    writeln!(out, "{restores} restores\r")?;

    write!(out, "  SHA1 result... ")?;
    verdict(out, ShaMode::Sha1, &d1, &SHA1_EXPECTED)?;
    write!(out, "  SHA224 result... ")?;
    verdict(out, ShaMode::Sha224, &d224, &SHA224_EXPECTED)?;
    write!(out, "  SHA256 result... ")?;
    verdict(out, ShaMode::Sha256, &d256, &SHA256_EXPECTED)?;

    if wide {
        let mut d512 = [0u8; 64];
        sha512.finish(engine, &mut d512)?;
        write!(out, "  SHA512 result... ")?;
        verdict(out, ShaMode::Sha512, &d512, &SHA512_EXPECTED)?;
    } else {
        writeln!(out, "  Skipping SHA512: not supported by this engine\r")?;
    }

    writeln!(out, "\r\n=== All Interleave Tests Passed ===\r")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SoftShaEngine;
    use crate::tests::functional::sink::Capture;

    #[test]
    fn interleaving_restores_state() {
        let engine = ShaEngine::new(SoftShaEngine::new());
        engine.init().unwrap();
        let mut out = Capture::default();
        run_interleave_tests(&engine, &mut out).unwrap();

        assert_eq!(out.text().matches("PASSED").count(), 4);
        assert!(engine.stats().restores > 0);
    }

    #[test]
    fn narrow_engine_still_interleaves() {
        let engine = ShaEngine::new(SoftShaEngine::esp32c3());
        engine.init().unwrap();
        let mut out = Capture::default();
        run_interleave_tests(&engine, &mut out).unwrap();

        let text = out.text();
        assert_eq!(text.matches("PASSED").count(), 3);
        assert!(text.contains("Skipping SHA512"));
    }
}
