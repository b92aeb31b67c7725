// Licensed under the Apache-2.0 license

// Enforce Copilot coding guidelines - prevent panic-prone patterns in production code only
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), no_std)]

//! Driver for a shared SHA accelerator.
//!
//! Any number of SHA-1, SHA-224/256 and SHA-384/512 hash sessions run
//! concurrently on one physical engine. Each session's intermediate state
//! lives in its own caller-allocated context; the [`engine::ShaEngine`]
//! arbiter serializes block operations and restores state whenever the
//! engine switches between sessions.

pub mod algorithm;
pub mod digest;
pub mod engine;
pub mod error;
pub mod hardware;

pub use algorithm::{ShaFamily, ShaMode};
pub use digest::{HmacContext, Lifecycle, Sha1Context, Sha256Context, Sha512Context, ShaContext};
pub use engine::{EngineConfig, EngineConfigBuilder, ShaEngine, SoftShaEngine};
pub use error::{HardwareError, ShaError};
pub use hardware::ShaHardware;
