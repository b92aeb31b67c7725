// Licensed under the Apache-2.0 license

use fugit::MicrosDurationU32;

/// Lock-wait policy of a [`ShaEngine`](super::ShaEngine)
#[derive(Copy, Clone)]
pub struct EngineConfig {
    /// Upper bound on waiting for another session's block operation.
    /// `None` waits indefinitely.
    pub lock_timeout: Option<MicrosDurationU32>,
    /// Delay between lock attempts while a timeout is armed
    pub poll_interval: MicrosDurationU32,
}

impl EngineConfig {
    pub const DEFAULT: Self = Self {
        lock_timeout: None,
        poll_interval: MicrosDurationU32::from_ticks(10),
    };
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub struct EngineConfigBuilder {
    lock_timeout: Option<MicrosDurationU32>,
    poll_interval: MicrosDurationU32,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfigBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lock_timeout: EngineConfig::DEFAULT.lock_timeout,
            poll_interval: EngineConfig::DEFAULT.poll_interval,
        }
    }
    #[must_use]
    pub const fn lock_timeout(mut self, timeout: MicrosDurationU32) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }
    #[must_use]
    pub const fn wait_forever(mut self) -> Self {
        self.lock_timeout = None;
        self
    }
    #[must_use]
    pub const fn poll_interval(mut self, interval: MicrosDurationU32) -> Self {
        self.poll_interval = interval;
        self
    }
    #[must_use]
    pub const fn build(self) -> EngineConfig {
        EngineConfig {
            lock_timeout: self.lock_timeout,
            poll_interval: self.poll_interval,
        }
    }
}
