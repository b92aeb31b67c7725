// Licensed under the Apache-2.0 license

use super::{verdict, SelfTestError};
use crate::algorithm::ShaMode;
use crate::digest::{digest, Sha256Context};
use crate::engine::ShaEngine;
use crate::error::ShaError;
use crate::hardware::ShaHardware;
use embedded_hal::delay::DelayNs;
use embedded_io::Write;
use hex_literal::hex;

const TWO_BLOCK: &[u8] = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";
const THOUSAND_A: &[u8] = &[b'a'; 1000];

struct Vector {
    mode: ShaMode,
    message: &'static [u8],
    digest: &'static [u8],
}

const VECTORS: &[Vector] = &[
    Vector {
        mode: ShaMode::Sha1,
        message: b"abc",
        digest: &hex!("a9993e364706816aba3e25717850c26c9cd0d89d"),
    },
    Vector {
        mode: ShaMode::Sha1,
        message: TWO_BLOCK,
        digest: &hex!("84983e441c3bd26ebaae4aa1f95129e5e54670f1"),
    },
    Vector {
        mode: ShaMode::Sha1,
        message: THOUSAND_A,
        digest: &hex!("291e9a6c66994949b57ba5e650361e98fc36b1ba"),
    },
    Vector {
        mode: ShaMode::Sha224,
        message: b"",
        digest: &hex!("d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f"),
    },
    Vector {
        mode: ShaMode::Sha224,
        message: b"abc",
        digest: &hex!("23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"),
    },
    Vector {
        mode: ShaMode::Sha256,
        message: b"",
        digest: &hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
    },
    Vector {
        mode: ShaMode::Sha256,
        message: TWO_BLOCK,
        digest: &hex!("248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1"),
    },
    Vector {
        mode: ShaMode::Sha256,
        message: THOUSAND_A,
        digest: &hex!("41edece42d63e8d9bf515a9ba6932e1c20cbc9f5a5d134645adb5db1b9737ea3"),
    },
    Vector {
        mode: ShaMode::Sha384,
        message: b"abc",
        digest: &hex!(
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded163"
            "1a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
        ),
    },
    Vector {
        mode: ShaMode::Sha512,
        message: b"",
        digest: &hex!(
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce"
            "47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        ),
    },
    Vector {
        mode: ShaMode::Sha512,
        message: THOUSAND_A,
        digest: &hex!(
            "67ba5535a46e3f86dbfbed8cbbaf0125c76ed549ff8b0b9e03e0c88cf90fa634"
            "fa7b12b47d77b694de488ace8d9a65967dc96df599727d3292a8d9d447709c97"
        ),
    },
];

/// Known-answer tests for every mode the engine implements
///
/// # Errors
///
/// Stops at the first driver error, digest mismatch or report write failure.
pub fn run_sha_tests<H, D, W>(engine: &ShaEngine<H, D>, out: &mut W) -> Result<(), SelfTestError<W::Error>>
where
    H: ShaHardware,
    D: DelayNs + Clone,
    W: Write,
{
    writeln!(out, "\r\n=== SHA Known-Answer Tests ===\r")?;
    if !engine.is_ready() {
        writeln!(out, "SHA engine not initialized\r")?;
        return Err(SelfTestError::Sha(ShaError::HardwareUnavailable));
    }

    for vector in VECTORS {
        test_vector(engine, out, vector)?;
    }
    test_byte_at_a_time(engine, out)?;

    writeln!(out, "\r\n=== All SHA Tests Passed ===\r")?;
    Ok(())
}

fn test_vector<H, D, W>(
    engine: &ShaEngine<H, D>,
    out: &mut W,
    vector: &Vector,
) -> Result<(), SelfTestError<W::Error>>
where
    H: ShaHardware,
    D: DelayNs + Clone,
    W: Write,
{
    let mode = vector.mode;
    if engine.check_available(mode).is_err() {
        writeln!(out, "Skipping {mode:?}: not supported by this engine\r")?;
        return Ok(());
    }
    write!(out, "Testing {mode:?} over {} bytes... ", vector.message.len())?;

    let mut buf = [0u8; 64];
    let actual = buf
        .get_mut(..mode.digest_size())
        .ok_or(SelfTestError::Sha(ShaError::InvalidArgument))?;
    digest(engine, mode, vector.message, actual)?;
    verdict(out, mode, actual, vector.digest)
}

fn test_byte_at_a_time<H, D, W>(
    engine: &ShaEngine<H, D>,
    out: &mut W,
) -> Result<(), SelfTestError<W::Error>>
where
    H: ShaHardware,
    D: DelayNs + Clone,
    W: Write,
{
    write!(out, "Testing SHA256 byte-at-a-time updates... ")?;

    let mut ctx = Sha256Context::new();
    ctx.starts(engine, false)?;
    for byte in TWO_BLOCK {
        ctx.update(engine, core::slice::from_ref(byte))?;
    }
    let mut actual = [0u8; 32];
    ctx.finish(engine, &mut actual)?;
    verdict(
        out,
        ShaMode::Sha256,
        &actual,
        &hex!("248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SoftShaEngine;
    use crate::error::HardwareError;
    use crate::tests::functional::sink::Capture;

    #[test]
    fn all_modes_pass() {
        let engine = ShaEngine::new(SoftShaEngine::new());
        engine.init().unwrap();
        let mut out = Capture::default();
        run_sha_tests(&engine, &mut out).unwrap();

        let text = out.text();
        assert_eq!(text.matches("PASSED").count(), VECTORS.len() + 1);
        assert!(!text.contains("Skipping"));
    }

    #[test]
    fn esp32c3_skips_sha512_family() {
        let engine = ShaEngine::new(SoftShaEngine::esp32c3());
        engine.init().unwrap();
        let mut out = Capture::default();
        run_sha_tests(&engine, &mut out).unwrap();

        let text = out.text();
        assert!(text.contains("Skipping Sha384"));
        assert!(text.contains("Skipping Sha512"));
        assert!(text.contains("All SHA Tests Passed"));
    }

    #[test]
    fn uninitialized_engine_reported() {
        let engine = ShaEngine::new(SoftShaEngine::new());
        let mut out = Capture::default();
        assert!(matches!(
            run_sha_tests(&engine, &mut out),
            Err(SelfTestError::Sha(ShaError::HardwareUnavailable))
        ));
    }

    #[test]
    fn hardware_fault_stops_run() {
        let engine = ShaEngine::new(SoftShaEngine::new().fail_after(3));
        engine.init().unwrap();
        let mut out = Capture::default();
        assert!(matches!(
            run_sha_tests(&engine, &mut out),
            Err(SelfTestError::Sha(ShaError::Hardware(HardwareError::Fault)))
        ));
    }
}
