// Licensed under the Apache-2.0 license

//! Primitive interface to a single SHA accelerator.
//!
//! This is the seam between the session/arbitration logic in this crate and
//! register-level peripheral code. An implementation programs one physical
//! engine: a text (message block) register file, a working register file
//! holding the intermediate hash state, and start/continue triggers.
//!
//! ## Register image
//!
//! The working registers are exchanged as 32-bit words in the order the
//! algorithm defines its state words. For the SHA-512 family each 64-bit
//! state word occupies two registers, most-significant half first, so the
//! image is 5, 8 or 16 registers long depending on the family.
//!
//! Implementations never need to be thread-safe: every call is made by
//! [`ShaEngine`](crate::engine::ShaEngine) while it holds exclusive
//! ownership of the hardware.

use crate::algorithm::ShaMode;
use crate::error::HardwareError;

/// Operations a SHA peripheral driver must provide
pub trait ShaHardware {
    /// Ungate the peripheral clock and take the engine out of reset
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::NotPresent` if the peripheral cannot be
    /// brought up.
    fn enable(&mut self) -> Result<(), HardwareError>;

    /// Put the engine back into reset and gate its clock
    fn disable(&mut self) {}

    /// Whether the accelerator implements `mode`
    fn supports(&self, mode: ShaMode) -> bool;

    /// Select the algorithm for the next block operation
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::UnsupportedMode` for modes the peripheral
    /// does not implement.
    fn set_mode(&mut self, mode: ShaMode) -> Result<(), HardwareError>;

    /// Load one message block into the text registers
    ///
    /// `block` is exactly one block of the selected mode.
    fn write_block(&mut self, block: &[u8]);

    /// Overwrite the working registers with a saved register image
    fn write_state(&mut self, regs: &[u32]);

    /// Copy the working registers out as a register image
    fn read_state(&self, regs: &mut [u32]);

    /// Process the loaded block starting from the mode's initial constants
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Fault` if the engine rejects the operation.
    fn start(&mut self) -> Result<(), HardwareError>;

    /// Process the loaded block continuing from the working registers
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Fault` if the engine rejects the operation.
    fn resume(&mut self) -> Result<(), HardwareError>;

    /// True while a block operation is still running
    fn is_busy(&self) -> bool;
}

impl<T: ShaHardware + ?Sized> ShaHardware for &mut T {
    fn enable(&mut self) -> Result<(), HardwareError> {
        (**self).enable()
    }

    fn disable(&mut self) {
        (**self).disable();
    }

    fn supports(&self, mode: ShaMode) -> bool {
        (**self).supports(mode)
    }

    fn set_mode(&mut self, mode: ShaMode) -> Result<(), HardwareError> {
        (**self).set_mode(mode)
    }

    fn write_block(&mut self, block: &[u8]) {
        (**self).write_block(block);
    }

    fn write_state(&mut self, regs: &[u32]) {
        (**self).write_state(regs);
    }

    fn read_state(&self, regs: &mut [u32]) {
        (**self).read_state(regs);
    }

    fn start(&mut self) -> Result<(), HardwareError> {
        (**self).start()
    }

    fn resume(&mut self) -> Result<(), HardwareError> {
        (**self).resume()
    }

    fn is_busy(&self) -> bool {
        (**self).is_busy()
    }
}
