//! Shard and node topology derivation
//!
//! Both topologies are derived once from the configuration and never
//! mutated afterwards. Shards partition the key space [1, total_keys] into
//! contiguous, disjoint, inclusive ranges; nodes are named sequentially per
//! cluster with an explicit shard-to-node-subset mapping.

use crate::error::{Error, Result};
use crate::transaction::Key;

/// Shard identifier, 1-based.
pub type ShardId = usize;

/// Mapping from shard id to an inclusive key range.
///
/// Ranges are contiguous and disjoint and their union is exactly
/// `[1, total_keys]`. Each shard holds `floor(total_keys / clusters)` keys
/// except the last, which absorbs the remainder.
#[derive(Debug, Clone)]
pub struct ShardMap {
    /// Inclusive (low, high) bounds, index 0 = shard 1
    ranges: Vec<(Key, Key)>,
}

impl ShardMap {
    /// Partition `[1, total_keys]` into `clusters` contiguous ranges.
    pub fn build(clusters: usize, total_keys: u64) -> Result<Self> {
        if clusters == 0 {
            return Err(Error::Config("cluster count must be >= 1".to_string()));
        }
        if total_keys < clusters as u64 {
            return Err(Error::Config(format!(
                "total key space ({total_keys}) must be >= cluster count ({clusters})"
            )));
        }

        let base = total_keys / clusters as u64;
        let mut ranges = Vec::with_capacity(clusters);
        let mut low: Key = 1;
        for shard in 1..=clusters {
            let high = if shard == clusters { total_keys } else { low + base - 1 };
            ranges.push((low, high));
            low = high + 1;
        }

        Ok(Self { ranges })
    }

    /// Number of shards.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Inclusive (low, high) bounds of a shard. Panics on shard id 0 or out
    /// of range; callers hold ids produced by this map.
    pub fn range(&self, shard: ShardId) -> (Key, Key) {
        self.ranges[shard - 1]
    }

    /// Number of keys in a shard.
    pub fn shard_size(&self, shard: ShardId) -> u64 {
        let (low, high) = self.range(shard);
        high - low + 1
    }

    /// Look up the shard owning `key`.
    ///
    /// A key outside `[1, total_keys]` indicates a topology/config mismatch
    /// and fails loudly rather than defaulting to shard 1.
    pub fn shard_of(&self, key: Key) -> Result<ShardId> {
        for (idx, (low, high)) in self.ranges.iter().enumerate() {
            if key >= *low && key <= *high {
                return Ok(idx + 1);
            }
        }
        Err(Error::Generation(format!(
            "key {key} is outside the configured key space"
        )))
    }

    /// Iterate over (shard id, inclusive range) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ShardId, (Key, Key))> + '_ {
        self.ranges.iter().enumerate().map(|(idx, range)| (idx + 1, *range))
    }
}

/// Ordered node identifier list, `n1..n{clusters * nodes_per_cluster}`.
///
/// Nodes are named sequentially per cluster; the owning subset for a shard
/// is exposed explicitly via [`NodeList::shard_nodes`] instead of being
/// implied by naming convention alone.
#[derive(Debug, Clone)]
pub struct NodeList {
    ids: Vec<String>,
    nodes_per_cluster: usize,
}

impl NodeList {
    pub fn build(clusters: usize, nodes_per_cluster: usize) -> Self {
        let ids =
            (1..=clusters * nodes_per_cluster).map(|i| format!("n{i}")).collect();
        Self { ids, nodes_per_cluster }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// All node identifiers in declaration order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The contiguous node subset owning a shard. Panics on shard id 0 or
    /// out of range; callers hold ids produced by the shard map.
    pub fn shard_nodes(&self, shard: ShardId) -> &[String] {
        let start = (shard - 1) * self.nodes_per_cluster;
        &self.ids[start..start + self.nodes_per_cluster]
    }

    /// Render the list in the harness's expected form: `[n1, n2, ...]`
    /// (comma-space separated, bracketed).
    pub fn rendered(&self) -> String {
        format!("[{}]", self.ids.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_partition() {
        let map = ShardMap::build(3, 9000).expect("valid topology");
        assert_eq!(map.len(), 3);
        assert_eq!(map.range(1), (1, 3000));
        assert_eq!(map.range(2), (3001, 6000));
        assert_eq!(map.range(3), (6001, 9000));
    }

    #[test]
    fn test_remainder_folds_into_last_shard() {
        let map = ShardMap::build(3, 10).expect("valid topology");
        assert_eq!(map.range(1), (1, 3));
        assert_eq!(map.range(2), (4, 6));
        assert_eq!(map.range(3), (7, 10));
        assert_eq!(map.shard_size(3), 4);
    }

    #[test]
    fn test_ranges_cover_key_space() {
        for (clusters, total) in [(1, 1u64), (3, 9000), (4, 10), (7, 100)] {
            let map = ShardMap::build(clusters, total).expect("valid topology");
            let mut expected_low = 1;
            for (_, (low, high)) in map.iter() {
                assert_eq!(low, expected_low);
                expected_low = high + 1;
            }
            assert_eq!(expected_low, total + 1);
        }
    }

    #[test]
    fn test_build_rejects_bad_parameters() {
        assert!(ShardMap::build(0, 100).is_err());
        assert!(ShardMap::build(5, 4).is_err());
    }

    #[test]
    fn test_lookup() {
        let map = ShardMap::build(3, 9000).expect("valid topology");
        assert_eq!(map.shard_of(1).unwrap(), 1);
        assert_eq!(map.shard_of(3000).unwrap(), 1);
        assert_eq!(map.shard_of(3001).unwrap(), 2);
        assert_eq!(map.shard_of(9000).unwrap(), 3);
    }

    #[test]
    fn test_lookup_out_of_range_fails() {
        let map = ShardMap::build(3, 9000).expect("valid topology");
        assert!(map.shard_of(0).is_err());
        assert!(map.shard_of(9001).is_err());
    }

    #[test]
    fn test_node_list_naming() {
        let nodes = NodeList::build(3, 3);
        assert_eq!(nodes.len(), 9);
        assert_eq!(nodes.ids()[0], "n1");
        assert_eq!(nodes.ids()[8], "n9");
        assert_eq!(nodes.rendered(), "[n1, n2, n3, n4, n5, n6, n7, n8, n9]");
    }

    #[test]
    fn test_shard_node_affinity() {
        let nodes = NodeList::build(3, 3);
        assert_eq!(nodes.shard_nodes(1), ["n1", "n2", "n3"]);
        assert_eq!(nodes.shard_nodes(2), ["n4", "n5", "n6"]);
        assert_eq!(nodes.shard_nodes(3), ["n7", "n8", "n9"]);
    }
}
