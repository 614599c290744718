//! Simulated block height and time
//!
//! Produces the `Clock` values that vault and strategy calls read. Only the
//! harness moves time forward; nothing in the vault advances it.

use solana_program::clock::{Clock, UnixTimestamp};

use crate::{
    constants::{BLOCKS_PER_YEAR, DEFAULT_SLOTS_PER_EPOCH, SECS_PER_YEAR},
    math::to_u64,
};

#[derive(Debug, Clone)]
pub struct SimulatedChain {
    clock: Clock,
    slots_per_epoch: u64,
}

impl SimulatedChain {
    pub fn new(genesis_timestamp: UnixTimestamp) -> Self {
        Self::with_slots_per_epoch(genesis_timestamp, DEFAULT_SLOTS_PER_EPOCH)
    }

    pub fn with_slots_per_epoch(genesis_timestamp: UnixTimestamp, slots_per_epoch: u64) -> Self {
        let clock = Clock {
            slot: 0,
            epoch_start_timestamp: genesis_timestamp,
            epoch: 0,
            leader_schedule_epoch: 1,
            unix_timestamp: genesis_timestamp,
        };

        Self {
            clock,
            slots_per_epoch: slots_per_epoch.max(1),
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn slots_per_epoch(&self) -> u64 {
        self.slots_per_epoch
    }

    /// Advance block height, rolling the epoch over when a boundary is crossed
    pub fn mine(&mut self, blocks: u64) {
        self.clock.slot = self.clock.slot.saturating_add(blocks);

        let epoch = self.clock.slot / self.slots_per_epoch;
        if epoch != self.clock.epoch {
            self.clock.epoch = epoch;
            self.clock.leader_schedule_epoch = epoch + 1;
            self.clock.epoch_start_timestamp = self.clock.unix_timestamp;
        }
    }

    /// Advance wall-clock time without producing blocks
    pub fn sleep(&mut self, seconds: u64) {
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        self.clock.unix_timestamp = self.clock.unix_timestamp.saturating_add(seconds);
    }

    /// Mine `blocks` and advance time by the matching block cadence
    pub fn advance_blocks(&mut self, blocks: u64) {
        self.mine(blocks);
        self.sleep(Self::seconds_for_blocks(blocks));
    }

    /// Seconds elapsed over `blocks` at 6525 blocks per day, saturating
    pub fn seconds_for_blocks(blocks: u64) -> u64 {
        to_u64((blocks as u128 * SECS_PER_YEAR as u128) / BLOCKS_PER_YEAR as u128).unwrap_or(u64::MAX)
    }
}
