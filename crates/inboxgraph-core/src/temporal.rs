//! Sequential time buckets over message day offsets.

use tracing::{debug, info};

use crate::config::{AnalysisConfig, BUCKET_COUNT};
use crate::table::MessageTable;

/// Messages split into consecutive day-offset bands of equal width.
///
/// With the default width of 60 days the bands are `[0, 60)`, `[60, 120)`
/// and `[120, 180)`. Offsets outside every band are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeBuckets {
    buckets: [Vec<usize>; BUCKET_COUNT],
    dropped: usize,
    sound: bool,
}

impl TimeBuckets {
    /// Partitions the table's message indices by day offset.
    #[must_use]
    pub fn partition(table: &MessageTable, config: &AnalysisConfig) -> Self {
        let mut buckets: [Vec<usize>; BUCKET_COUNT] = Default::default();
        let mut dropped = 0;
        for msg in table {
            match bucket_of(msg.day_offset, config) {
                Some(bucket) => buckets[bucket].push(msg.idx),
                None => {
                    debug!(
                        "Dropping message {} with day offset {}",
                        msg.idx, msg.day_offset
                    );
                    dropped += 1;
                }
            }
        }

        let sound = is_temporally_sound(&buckets, config.min_bucket_size);
        info!(
            "Time buckets {:?}, {} dropped, temporally sound: {}",
            buckets.each_ref().map(Vec::len),
            dropped,
            sound
        );
        Self {
            buckets,
            dropped,
            sound,
        }
    }

    /// Message indices per bucket, earliest band first.
    #[must_use]
    pub const fn buckets(&self) -> &[Vec<usize>; BUCKET_COUNT] {
        &self.buckets
    }

    /// Number of messages whose offset fell outside every band.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Check if every bucket is large enough.
    #[must_use]
    pub const fn is_sound(&self) -> bool {
        self.sound
    }
}

fn bucket_of(day_offset: i64, config: &AnalysisConfig) -> Option<usize> {
    let width = config.bucket_width_days;
    if width <= 0 || !(0..config.horizon_days()).contains(&day_offset) {
        return None;
    }
    usize::try_from(day_offset / width).ok()
}

/// True iff every bucket holds more than `min_size` messages.
#[must_use]
pub fn is_temporally_sound(buckets: &[Vec<usize>], min_size: usize) -> bool {
    buckets.iter().all(|bucket| bucket.len() > min_size)
}
