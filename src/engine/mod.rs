// Licensed under the Apache-2.0 license

pub mod arbiter;
pub mod config;
pub mod soft;

pub use arbiter::{EngineBinding, EngineGuard, EngineStats, NoDelay, SessionTag, ShaEngine};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use soft::SoftShaEngine;
