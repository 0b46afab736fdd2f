// ID Generator - Snowflake-like IDs with embedded shard information
// 64-bit layout: [timestamp:42][shard_id:10][sequence:12], rendered as fixed-width decimal

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const MAX_SHARDS: u16 = 1024;
const SEQUENCE_MASK: u64 = 0xFFF;
const TIMESTAMP_MASK: u64 = 0x3FF_FFFF_FFFF;

/// Allows 1024 shards and 4096 IDs per millisecond per shard.
///
/// When a millisecond's sequence is exhausted the generator borrows the next
/// millisecond instead of sleeping, so IDs stay strictly increasing.
#[derive(Debug)]
pub struct IdGenerator {
    shard_id: u16,
    // [timestamp:52][sequence:12] of the last issued id
    state: AtomicU64,
}

impl IdGenerator {
    pub fn new(shard_id: u16) -> anyhow::Result<Self> {
        anyhow::ensure!(
            shard_id < MAX_SHARDS,
            "Shard ID must be less than {}, got {}",
            MAX_SHARDS,
            shard_id
        );

        Ok(Self {
            shard_id,
            state: AtomicU64::new(0),
        })
    }

    /// Generate next unique ID with embedded shard information
    pub fn next_id(&self) -> i64 {
        loop {
            let now = current_millis();
            let last = self.state.load(Ordering::Acquire);
            let (last_ts, last_seq) = (last >> 12, last & SEQUENCE_MASK);

            let (timestamp, sequence) = if now > last_ts {
                (now, 0)
            } else if last_seq < SEQUENCE_MASK {
                (last_ts, last_seq + 1)
            } else {
                (last_ts + 1, 0)
            };

            let next = (timestamp << 12) | sequence;
            if self
                .state
                .compare_exchange(last, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                let id = ((timestamp & TIMESTAMP_MASK) << 22)
                    | ((self.shard_id as u64) << 12)
                    | sequence;
                return id as i64;
            }
        }
    }

    /// Next ID as a 19-digit string; string order matches numeric order.
    pub fn next_string_id(&self) -> String {
        format!("{:019}", self.next_id())
    }
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
