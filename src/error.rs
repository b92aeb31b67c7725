// Licensed under the Apache-2.0 license

//! Error types shared by the engine arbiter and the hash contexts.

use core::fmt;

/// Fault reported by a [`ShaHardware`](crate::hardware::ShaHardware) implementation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HardwareError {
    /// Peripheral is absent, gated off, or failed to come out of reset
    NotPresent,
    /// The requested mode is not implemented by this accelerator
    UnsupportedMode,
    /// The engine signalled an error while processing a block
    Fault,
}

/// Errors returned by hash sessions and the engine arbiter
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaError {
    /// Bring-up has not been performed, failed, or the mode is not available
    HardwareUnavailable,
    /// Waiting for the engine exceeded the configured lock timeout
    HardwareBusy,
    /// Malformed size: wrong output length, oversized message or key
    InvalidArgument,
    /// Operation not permitted in the context's current lifecycle state
    InvalidState,
    /// A block operation failed on the hardware
    Hardware(HardwareError),
}

impl From<HardwareError> for ShaError {
    fn from(err: HardwareError) -> Self {
        match err {
            HardwareError::NotPresent | HardwareError::UnsupportedMode => {
                ShaError::HardwareUnavailable
            }
            HardwareError::Fault => ShaError::Hardware(err),
        }
    }
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareError::NotPresent => f.write_str("SHA peripheral not present"),
            HardwareError::UnsupportedMode => f.write_str("SHA mode not supported by peripheral"),
            HardwareError::Fault => f.write_str("SHA peripheral fault"),
        }
    }
}

impl fmt::Display for ShaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaError::HardwareUnavailable => f.write_str("SHA hardware unavailable"),
            ShaError::HardwareBusy => f.write_str("timed out waiting for SHA engine"),
            ShaError::InvalidArgument => f.write_str("invalid argument"),
            ShaError::InvalidState => f.write_str("operation not valid in current context state"),
            ShaError::Hardware(err) => write!(f, "hardware error: {err}"),
        }
    }
}

impl core::error::Error for HardwareError {}

impl core::error::Error for ShaError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ShaError::Hardware(err) => Some(err),
            _ => None,
        }
    }
}
