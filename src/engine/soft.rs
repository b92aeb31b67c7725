// Licensed under the Apache-2.0 license

//! Software model of the SHA accelerator.
//!
//! `SoftShaEngine` behaves like the peripheral as seen through
//! [`ShaHardware`]: a text buffer, a working register file and start/continue
//! triggers, with block operations completing synchronously. It serves as the
//! backend on parts without an accelerator and as the test double for the
//! arbiter. The supported mode set is configurable so that the ESP32-C3
//! (SHA-1/224/256 only) can be modelled exactly. Block compression is done
//! by the RustCrypto `sha1` / `sha2` block functions.

use crate::algorithm::{ShaFamily, ShaMode, SHA1_IV, SHA224_IV, SHA256_IV, SHA384_IV, SHA512_IV};
use crate::digest::word::Word;
use crate::error::HardwareError;
use crate::hardware::ShaHardware;
use sha2::digest::generic_array::GenericArray;

const ALL_MODES: u8 = 0b1_1111;

#[derive(Clone, Debug)]
pub struct SoftShaEngine {
    present: bool,
    enabled: bool,
    supported: u8,
    mode: ShaMode,
    text: [u8; 128],
    regs: [u32; 16],
    operations: u32,
    fail_after: Option<u32>,
}

impl Default for SoftShaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftShaEngine {
    /// Engine implementing every mode
    #[must_use]
    pub const fn new() -> Self {
        Self {
            present: true,
            enabled: false,
            supported: ALL_MODES,
            mode: ShaMode::Sha1,
            text: [0; 128],
            regs: [0; 16],
            operations: 0,
            fail_after: None,
        }
    }

    /// Engine restricted to the modes of the ESP32-C3 accelerator
    #[must_use]
    pub const fn esp32c3() -> Self {
        Self::new().with_modes(&[ShaMode::Sha1, ShaMode::Sha224, ShaMode::Sha256])
    }

    /// Engine whose bring-up always fails, as if the peripheral were absent
    #[must_use]
    pub const fn absent() -> Self {
        let mut engine = Self::new();
        engine.present = false;
        engine
    }

    /// Restrict the engine to `modes`
    #[must_use]
    pub const fn with_modes(mut self, modes: &[ShaMode]) -> Self {
        self.supported = 0;
        let mut rest = modes;
        while let [mode, tail @ ..] = rest {
            self.supported |= 1 << (*mode).hw_code();
            rest = tail;
        }
        self
    }

    /// Fault every block operation after the first `operations` succeed
    #[must_use]
    pub const fn fail_after(mut self, operations: u32) -> Self {
        self.fail_after = Some(operations);
        self
    }

    /// Block operations completed so far
    #[must_use]
    pub const fn operations(&self) -> u32 {
        self.operations
    }

    fn begin_operation(&mut self) -> Result<(), HardwareError> {
        if !self.enabled {
            return Err(HardwareError::NotPresent);
        }
        if self.fail_after.is_some_and(|limit| self.operations >= limit) {
            return Err(HardwareError::Fault);
        }
        self.operations = self.operations.wrapping_add(1);
        Ok(())
    }

    fn load_initial_state(&mut self) {
        match self.mode {
            ShaMode::Sha1 => u32::store_regs(&SHA1_IV, &mut self.regs),
            ShaMode::Sha224 => u32::store_regs(&SHA224_IV, &mut self.regs),
            ShaMode::Sha256 => u32::store_regs(&SHA256_IV, &mut self.regs),
            ShaMode::Sha384 => u64::store_regs(&SHA384_IV, &mut self.regs),
            ShaMode::Sha512 => u64::store_regs(&SHA512_IV, &mut self.regs),
        }
    }

    fn compress(&mut self) {
        match self.mode.family() {
            ShaFamily::Sha1 => {
                let mut state = [0u32; 5];
                u32::load_regs(&self.regs, &mut state);
                if let Some(block) = self.text.first_chunk::<64>() {
                    let blocks = core::slice::from_ref(GenericArray::from_slice(block));
                    sha1::compress(&mut state, blocks);
                }
                u32::store_regs(&state, &mut self.regs);
            }
            ShaFamily::Sha256 => {
                let mut state = [0u32; 8];
                u32::load_regs(&self.regs, &mut state);
                if let Some(block) = self.text.first_chunk::<64>() {
                    let blocks = core::slice::from_ref(GenericArray::from_slice(block));
                    sha2::compress256(&mut state, blocks);
                }
                u32::store_regs(&state, &mut self.regs);
            }
            ShaFamily::Sha512 => {
                let mut state = [0u64; 8];
                u64::load_regs(&self.regs, &mut state);
                let blocks = core::slice::from_ref(GenericArray::from_slice(&self.text));
                sha2::compress512(&mut state, blocks);
                u64::store_regs(&state, &mut self.regs);
            }
        }
    }
}

impl ShaHardware for SoftShaEngine {
    fn enable(&mut self) -> Result<(), HardwareError> {
        if !self.present {
            return Err(HardwareError::NotPresent);
        }
        self.enabled = true;
        self.regs = [0; 16];
        self.text = [0; 128];
        Ok(())
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn supports(&self, mode: ShaMode) -> bool {
        self.supported & (1 << mode.hw_code()) != 0
    }

    fn set_mode(&mut self, mode: ShaMode) -> Result<(), HardwareError> {
        if !self.enabled {
            return Err(HardwareError::NotPresent);
        }
        if !self.supports(mode) {
            return Err(HardwareError::UnsupportedMode);
        }
        self.mode = mode;
        Ok(())
    }

    fn write_block(&mut self, block: &[u8]) {
        for (dst, src) in self.text.iter_mut().zip(block) {
            *dst = *src;
        }
    }

    fn write_state(&mut self, regs: &[u32]) {
        for (dst, src) in self.regs.iter_mut().zip(regs) {
            *dst = *src;
        }
    }

    fn read_state(&self, regs: &mut [u32]) {
        for (dst, src) in regs.iter_mut().zip(&self.regs) {
            *dst = *src;
        }
    }

    fn start(&mut self) -> Result<(), HardwareError> {
        self.begin_operation()?;
        self.load_initial_state();
        self.compress();
        Ok(())
    }

    fn resume(&mut self) -> Result<(), HardwareError> {
        self.begin_operation()?;
        self.compress();
        Ok(())
    }

    fn is_busy(&self) -> bool {
        false
    }
}
