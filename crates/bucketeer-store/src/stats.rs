use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Bucket-level statistics as reported by the store.
///
/// Counts cover the bucket itself and every bucket nested below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStats {
    /// Number of key/value entries (nested bucket names excluded).
    pub key_count: usize,
    /// Number of buckets, including the bucket the stats were taken from.
    pub bucket_count: usize,
    /// Levels of nesting; a bucket without children has depth 1.
    pub depth: usize,
    /// Total bytes held in keys.
    pub key_bytes: usize,
    /// Total bytes held in values.
    pub value_bytes: usize,
}

impl BucketStats {
    /// Fold the stats of a child bucket into these stats.
    ///
    /// Counters are summed; depth becomes one more than the deepest child.
    pub fn merge_child(&mut self, child: &BucketStats) {
        self.key_count += child.key_count;
        self.bucket_count += child.bucket_count;
        self.key_bytes += child.key_bytes;
        self.value_bytes += child.value_bytes;
        self.depth = self.depth.max(child.depth + 1);
    }
}

impl AddAssign for BucketStats {
    /// Sums two unrelated stats, keeping the larger depth.
    fn add_assign(&mut self, other: Self) {
        self.key_count += other.key_count;
        self.bucket_count += other.bucket_count;
        self.key_bytes += other.key_bytes;
        self.value_bytes += other.value_bytes;
        self.depth = self.depth.max(other.depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_child_deepens() {
        let mut parent = BucketStats {
            key_count: 1,
            bucket_count: 1,
            depth: 1,
            key_bytes: 3,
            value_bytes: 5,
        };
        let child = BucketStats {
            key_count: 2,
            bucket_count: 2,
            depth: 2,
            key_bytes: 4,
            value_bytes: 6,
        };
        parent.merge_child(&child);
        assert_eq!(parent.key_count, 3);
        assert_eq!(parent.bucket_count, 3);
        assert_eq!(parent.depth, 3);
        assert_eq!(parent.key_bytes, 7);
        assert_eq!(parent.value_bytes, 11);
    }

    #[test]
    fn add_assign_keeps_max_depth() {
        let mut a = BucketStats {
            depth: 4,
            key_count: 1,
            ..Default::default()
        };
        a += BucketStats {
            depth: 2,
            key_count: 2,
            ..Default::default()
        };
        assert_eq!(a.depth, 4);
        assert_eq!(a.key_count, 3);
    }

    #[test]
    fn serde_roundtrip() {
        let stats = BucketStats {
            key_count: 10,
            bucket_count: 2,
            depth: 2,
            key_bytes: 80,
            value_bytes: 120,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"key_count\":10"));
        let back: BucketStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
