// src/generator.rs
//
// Snowflake generator: bit-packs (elapsed ms, datacenter, worker, sequence)
// under a single mutex-guarded (last_ms, sequence) pair per instance.

use cairn_types::Identifier;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{IdError, Result};
use crate::layout::{
    SnowflakeParts, MAX_DATACENTER_ID, MAX_SEQUENCE, MAX_TIMESTAMP, MAX_WORKER_ID, WORKER_ID_SPACE,
};

// ==== CONSTANTS ====

/// Default epoch: 2024-01-01T00:00:00Z.
pub const DEFAULT_EPOCH_MS: u64 = 1_704_067_200_000;

/// Backward clock steps up to this size are waited out instead of failing.
pub const CLOCK_REGRESSION_TOLERANCE_MS: u64 = 5;

// ==== CONFIG ====

/// Generator configuration, validated by [`IdGenerator::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Reference instant, milliseconds since the UNIX epoch.
    pub epoch_ms: u64,
    pub datacenter_id: u8,
    /// Explicit worker id; derived from the owner context when absent.
    pub worker_id: Option<u8>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            epoch_ms: DEFAULT_EPOCH_MS,
            datacenter_id: 0,
            worker_id: None,
        }
    }
}

// ==== STATE ====

#[derive(Debug, Default)]
struct SequenceState {
    last_ms: u64,
    sequence: u16,
}

/// Time-ordered identifier generator.
///
/// One instance owns one `(last_ms, sequence)` pair. Concurrent callers
/// serialize on it, so identifiers from a single instance never repeat even
/// when their derived worker ids collide.
pub struct IdGenerator<C: Clock = SystemClock> {
    config: GeneratorConfig,
    clock: C,
    state: Mutex<SequenceState>,
}

impl IdGenerator<SystemClock> {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> IdGenerator<C> {
    /// Build a generator over an explicit clock. Fails eagerly on a future
    /// epoch or out-of-range datacenter/worker ids.
    pub fn with_clock(config: GeneratorConfig, clock: C) -> Result<Self> {
        if config.datacenter_id > MAX_DATACENTER_ID {
            return Err(IdError::Configuration(format!(
                "datacenter id {} out of range 0..={}",
                config.datacenter_id, MAX_DATACENTER_ID
            )));
        }
        if let Some(worker_id) = config.worker_id {
            if worker_id > MAX_WORKER_ID {
                return Err(IdError::Configuration(format!(
                    "worker id {} out of range 0..={}",
                    worker_id, MAX_WORKER_ID
                )));
            }
        }
        let now_ms = clock.now_millis();
        if config.epoch_ms > now_ms {
            return Err(IdError::Configuration(format!(
                "epoch {} ms is in the future (clock reads {} ms)",
                config.epoch_ms, now_ms
            )));
        }

        Ok(Self {
            config,
            clock,
            state: Mutex::new(SequenceState::default()),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Issue the next identifier on behalf of `owner_context`.
    pub fn generate(&self, owner_context: &str) -> Result<Identifier> {
        let worker_id = self.worker_for(owner_context);
        let (now_ms, sequence) = self.next_slot()?;

        let elapsed_ms = now_ms
            .checked_sub(self.config.epoch_ms)
            .ok_or(IdError::ClockRegression {
                last_ms: self.config.epoch_ms,
                now_ms,
            })?;
        if elapsed_ms > MAX_TIMESTAMP {
            return Err(IdError::TimestampOverflow { elapsed_ms });
        }

        Ok(SnowflakeParts {
            timestamp_ms: elapsed_ms,
            datacenter_id: self.config.datacenter_id,
            worker_id,
            sequence,
        }
        .compose())
    }

    /// Worker id used for `owner_context`: the configured override, or the
    /// derived one.
    pub fn worker_for(&self, owner_context: &str) -> u8 {
        match self.config.worker_id {
            Some(worker_id) => worker_id,
            None => derive_worker_id(owner_context),
        }
    }

    /// Issuance instant of `id` in milliseconds since the UNIX epoch.
    pub fn issued_at_ms(&self, id: Identifier) -> u64 {
        self.config.epoch_ms + SnowflakeParts::decompose(id).timestamp_ms
    }

    /// Reserve the next (millisecond, sequence) slot.
    ///
    /// The lock covers only the read-modify-write of the state; waits for
    /// the clock happen with it released, then the state is re-read.
    fn next_slot(&self) -> Result<(u64, u16)> {
        loop {
            let target_ms = {
                let mut state = self.state.lock();
                let now_ms = self.clock.now_millis();

                if now_ms > state.last_ms {
                    state.last_ms = now_ms;
                    state.sequence = 0;
                    return Ok((now_ms, 0));
                }

                if now_ms < state.last_ms {
                    let behind = state.last_ms - now_ms;
                    if behind > CLOCK_REGRESSION_TOLERANCE_MS {
                        warn!(
                            last_ms = state.last_ms,
                            now_ms, behind, "clock regression beyond tolerance"
                        );
                        return Err(IdError::ClockRegression {
                            last_ms: state.last_ms,
                            now_ms,
                        });
                    }
                    debug!(behind, "clock stepped back within tolerance, waiting");
                    state.last_ms
                } else if state.sequence < MAX_SEQUENCE {
                    state.sequence += 1;
                    return Ok((now_ms, state.sequence));
                } else {
                    debug!(last_ms = state.last_ms, "sequence exhausted, waiting for next millisecond");
                    state.last_ms + 1
                }
            };
            self.wait_until(target_ms);
        }
    }

    fn wait_until(&self, target_ms: u64) {
        while self.clock.now_millis() < target_ms {
            std::hint::spin_loop();
        }
    }
}

/// Derive a worker id from an owner context: SHA-256, first four bytes as a
/// big-endian integer, reduced modulo the worker id space.
pub fn derive_worker_id(owner_context: &str) -> u8 {
    let digest = Sha256::digest(owner_context.as_bytes());
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let worker_id = (prefix % WORKER_ID_SPACE) as u8;
    debug!(worker_id, "derived worker id from owner context");
    worker_id
}
