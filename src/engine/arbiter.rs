// Licensed under the Apache-2.0 license

//! Engine arbiter: many hash sessions, one physical SHA engine.
//!
//! ## Design
//!
//! - The hardware and the record of whose state is loaded in it live behind
//!   a single `spin::Mutex`; every block operation runs under that lock.
//! - After each block the working registers are read back into the owning
//!   context, so a session's state never exists only in hardware once the
//!   lock is released.
//! - Restoring a context's state is lazy: if the engine still holds the
//!   live state of the session feeding the next block, the restore write is
//!   skipped.
//!
//! ## Residency tags
//!
//! A session receives a [`SessionTag`] when its first block completes. Tags
//! combine a bring-up epoch (unique for the process) with a per-engine
//! sequence number, so a tag can only match the resident record of the
//! engine instance that issued it, and a re-initialized engine never trusts
//! register contents from before the re-init.

use super::config::EngineConfig;
use crate::algorithm::ShaMode;
use crate::digest::word::Word;
use crate::error::ShaError;
use crate::hardware::ShaHardware;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use embedded_hal::delay::DelayNs;
use log::{debug, trace, warn};

/// Largest working register image (SHA-512 family: 8 x 64-bit)
const MAX_STATE_REGS: usize = 16;

static NEXT_EPOCH: AtomicU32 = AtomicU32::new(1);

/// Identifies the session whose intermediate state an engine holds
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionTag {
    epoch: u32,
    seq: u64,
}

/// Engine-side bookkeeping carried inside every hash context
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineBinding {
    first_block: bool,
    tag: Option<SessionTag>,
}

impl Default for EngineBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBinding {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            first_block: true,
            tag: None,
        }
    }

    /// True until the first hardware block operation has completed
    #[must_use]
    pub const fn first_block(&self) -> bool {
        self.first_block
    }

    #[must_use]
    pub const fn tag(&self) -> Option<SessionTag> {
        self.tag
    }
}

/// Counters describing arbiter activity since construction
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Block operations completed
    pub blocks: u64,
    /// Block operations that began from the mode's initial constants
    pub fresh_starts: u64,
    /// Saved states written back into the working registers
    pub restores: u64,
}

struct EngineCore<H> {
    hw: H,
    epoch: u32,
    next_seq: u64,
    resident: Option<SessionTag>,
    stats: EngineStats,
}

impl<H: ShaHardware> EngineCore<H> {
    fn wait_idle(&self) {
        while self.hw.is_busy() {
            core::hint::spin_loop();
        }
    }

    fn issue_tag(&mut self) -> SessionTag {
        let tag = SessionTag {
            epoch: self.epoch,
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        tag
    }
}

/// Busy-wait delay used when no timer is supplied
#[derive(Clone, Copy, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        for _ in 0..ns {
            core::hint::spin_loop();
        }
    }
}

/// Arbiter owning the single physical SHA engine
///
/// Share it by reference (typically from a `static`) between every task that
/// hashes; contexts borrow it only for the duration of a call.
///
/// # Examples
///
/// ```no_run
/// use esp32c3_sha::digest::Sha256Context;
/// use esp32c3_sha::engine::{ShaEngine, SoftShaEngine};
///
/// # fn example() -> Result<(), esp32c3_sha::ShaError> {
/// let engine = ShaEngine::new(SoftShaEngine::new());
/// engine.init()?;
///
/// let mut ctx = Sha256Context::new();
/// ctx.starts(&engine, false)?;
/// ctx.update(&engine, b"abc")?;
/// let mut digest = [0u8; 32];
/// ctx.finish(&engine, &mut digest)?;
/// # Ok(())
/// # }
/// ```
pub struct ShaEngine<H, D = NoDelay> {
    inner: spin::Mutex<EngineCore<H>>,
    ready: AtomicBool,
    config: EngineConfig,
    delay: D,
}

impl<H: ShaHardware> ShaEngine<H, NoDelay> {
    /// Wrap `hw` with the default configuration (wait forever for the lock)
    pub const fn new(hw: H) -> Self {
        Self::with_config(hw, EngineConfig::DEFAULT, NoDelay)
    }
}

impl<H: ShaHardware, D: DelayNs + Clone> ShaEngine<H, D> {
    /// Wrap `hw` with an explicit lock-wait policy; `delay` paces retries
    /// while a lock timeout is armed.
    pub const fn with_config(hw: H, config: EngineConfig, delay: D) -> Self {
        Self {
            inner: spin::Mutex::new(EngineCore {
                hw,
                epoch: 0,
                next_seq: 0,
                resident: None,
                stats: EngineStats {
                    blocks: 0,
                    fresh_starts: 0,
                    restores: 0,
                },
            }),
            ready: AtomicBool::new(false),
            config,
            delay,
        }
    }

    /// Process-wide bring-up of the accelerator
    ///
    /// Must succeed before any context can be started. Calling it again
    /// re-initializes the peripheral; sessions still in progress remain
    /// valid because their state is restored on their next block.
    ///
    /// # Errors
    ///
    /// Returns `ShaError::HardwareUnavailable` if the peripheral does not
    /// come up.
    pub fn init(&self) -> Result<(), ShaError> {
        let mut core = self.inner.lock();
        core.resident = None;
        if let Err(err) = core.hw.enable() {
            self.ready.store(false, Ordering::Release);
            warn!("SHA engine bring-up failed: {err}");
            return Err(ShaError::HardwareUnavailable);
        }
        core.epoch = NEXT_EPOCH.fetch_add(1, Ordering::Relaxed);
        self.ready.store(true, Ordering::Release);
        debug!("SHA engine ready, epoch {}", core.epoch);
        Ok(())
    }

    /// Disable the accelerator; subsequent operations report
    /// `HardwareUnavailable` until [`init`](Self::init) succeeds again
    pub fn deinit(&self) {
        let mut core = self.inner.lock();
        self.ready.store(false, Ordering::Release);
        core.resident = None;
        core.hw.disable();
        debug!("SHA engine disabled");
    }

    /// True once bring-up has succeeded
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Check that sessions of `mode` can run on this engine
    ///
    /// # Errors
    ///
    /// Returns `ShaError::HardwareUnavailable` if bring-up has not happened
    /// or the peripheral does not implement `mode`.
    pub fn check_available(&self, mode: ShaMode) -> Result<(), ShaError> {
        if !self.is_ready() {
            return Err(ShaError::HardwareUnavailable);
        }
        if !self.inner.lock().hw.supports(mode) {
            debug!("SHA mode {mode:?} not supported by peripheral");
            return Err(ShaError::HardwareUnavailable);
        }
        Ok(())
    }

    /// Try to take exclusive ownership of the engine without waiting
    ///
    /// # Errors
    ///
    /// Returns `nb::Error::WouldBlock` while another session holds the engine.
    pub fn try_acquire(&self) -> nb::Result<EngineGuard<'_, H>, ShaError> {
        self.inner
            .try_lock()
            .map(|inner| EngineGuard { inner })
            .ok_or(nb::Error::WouldBlock)
    }

    /// Take exclusive ownership of the engine, waiting for any block
    /// operation in progress on behalf of another session
    ///
    /// Ownership is released when the returned guard is dropped. The lock
    /// is not re-entrant: while a guard is alive, any hashing call on the
    /// same thread (`update`, `finish`, ...) waits for it. With no lock
    /// timeout configured that wait never ends; with one it returns
    /// `ShaError::HardwareBusy`.
    ///
    /// # Errors
    ///
    /// Returns `ShaError::HardwareBusy` if a lock timeout is configured and
    /// it elapses first.
    pub fn acquire(&self) -> Result<EngineGuard<'_, H>, ShaError> {
        let Some(timeout) = self.config.lock_timeout else {
            return Ok(EngineGuard {
                inner: self.inner.lock(),
            });
        };

        let budget = timeout.to_micros();
        let step = self.config.poll_interval.to_micros().max(1);
        let mut delay = self.delay.clone();
        let mut waited: u32 = 0;
        loop {
            match self.try_acquire() {
                Ok(guard) => return Ok(guard),
                Err(nb::Error::Other(err)) => return Err(err),
                Err(nb::Error::WouldBlock) => {}
            }
            if waited >= budget {
                warn!("SHA engine lock not acquired within {budget} us");
                return Err(ShaError::HardwareBusy);
            }
            delay.delay_us(step);
            waited = waited.saturating_add(step);
        }
    }

    /// Run one block of `mode` through the engine on behalf of a session
    ///
    /// `state` holds the session's intermediate digest words and is updated
    /// in place; `binding` records whether this is the session's first block
    /// and which residency tag it owns.
    pub(crate) fn feed_block<W: Word>(
        &self,
        binding: &mut EngineBinding,
        mode: ShaMode,
        state: &mut [W],
        block: &[u8],
    ) -> Result<(), ShaError> {
        let mut guard = self.acquire()?;
        if !self.is_ready() {
            return Err(ShaError::HardwareUnavailable);
        }
        guard.feed(binding, mode, state, block)
    }

    /// Whether the engine's working registers currently hold the live
    /// state of the session described by `binding`
    pub fn holds_live_state(&self, binding: &EngineBinding) -> bool {
        binding.tag.is_some() && self.inner.lock().resident == binding.tag
    }

    /// Snapshot of block, fresh-start and restore counts
    pub fn stats(&self) -> EngineStats {
        self.inner.lock().stats
    }

    /// Tear down the arbiter and hand back the peripheral
    pub fn release(self) -> H {
        self.inner.into_inner().hw
    }
}

/// Exclusive ownership of the SHA engine; released on drop
///
/// Drop the guard before hashing through any context on the same thread,
/// see [`ShaEngine::acquire`].
pub struct EngineGuard<'a, H> {
    inner: spin::MutexGuard<'a, EngineCore<H>>,
}

impl<H: ShaHardware> EngineGuard<'_, H> {
    /// Direct access to the peripheral while the engine is held
    ///
    /// The register file is assumed clobbered afterwards, so the next block
    /// of every session restores its saved state.
    pub fn hardware_mut(&mut self) -> &mut H {
        self.inner.resident = None;
        &mut self.inner.hw
    }

    pub(crate) fn feed<W: Word>(
        &mut self,
        binding: &mut EngineBinding,
        mode: ShaMode,
        state: &mut [W],
        block: &[u8],
    ) -> Result<(), ShaError> {
        let family = mode.family();
        if block.len() != family.block_size() || state.len() != family.state_words() {
            return Err(ShaError::InvalidArgument);
        }

        let mut image = [0u32; MAX_STATE_REGS];
        let regs = image
            .get_mut(..family.register_words())
            .ok_or(ShaError::InvalidArgument)?;

        let core = &mut *self.inner;
        core.wait_idle();
        core.hw.set_mode(mode)?;

        let fresh = binding.first_block;
        if !fresh && (binding.tag.is_none() || core.resident != binding.tag) {
            trace!("restoring {mode:?} session state {:?}", binding.tag);
            W::store_regs(state, regs);
            core.hw.write_state(regs);
            core.stats.restores += 1;
        }
        // Registers are now owned by this session; any failure below leaves
        // them in an unknown state.
        core.resident = None;

        core.hw.write_block(block);
        let started = if fresh {
            core.hw.start()
        } else {
            core.hw.resume()
        };
        if let Err(err) = started {
            warn!("SHA {mode:?} block operation failed: {err}");
            return Err(err.into());
        }
        core.wait_idle();

        core.hw.read_state(regs);
        W::load_regs(regs, state);

        if fresh {
            binding.tag = Some(core.issue_tag());
            binding.first_block = false;
            core.stats.fresh_starts += 1;
        }
        core.resident = binding.tag;
        core.stats.blocks += 1;
        Ok(())
    }
}
