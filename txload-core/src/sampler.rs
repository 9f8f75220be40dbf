//! Zipfian key sampling
//!
//! Each shard gets a precomputed discrete probability table over its key
//! range: uniform at skew 0, otherwise weight(i) proportional to
//! 1/(i+1)^skew so low-offset keys within a shard become hotspots as the
//! skew grows. Draws go through a cumulative-table [`WeightedIndex`], which
//! keeps per-draw cost at O(log n) without changing the distribution.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::SmallRng;

use crate::error::{Error, Result};
use crate::topology::{ShardId, ShardMap};
use crate::transaction::Key;

/// Normalized weight table and sampling index for one shard.
#[derive(Debug, Clone)]
struct ShardTable {
    /// Low bound of the shard's key range; sampled offsets map to
    /// `low + offset`
    low: Key,
    /// Normalized probabilities, offset 0 = the shard's lowest key
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

/// Per-shard Zipfian key sampler.
///
/// Tables are precomputed once at construction and immutable afterwards.
/// Sampling is with replacement; repeated draws of the same key are
/// expected and valid.
#[derive(Debug, Clone)]
pub struct KeySampler {
    tables: Vec<ShardTable>,
}

impl KeySampler {
    /// Precompute one weight table per shard in `shards`.
    pub fn precompute(shards: &ShardMap, skew: f64) -> Result<Self> {
        if !skew.is_finite() || skew < 0.0 {
            return Err(Error::Config(format!(
                "skew must be a finite value >= 0, got {skew}"
            )));
        }

        let mut tables = Vec::with_capacity(shards.len());
        for (_, (low, high)) in shards.iter() {
            let n = (high - low + 1) as usize;
            let raw: Vec<f64> = if skew > 0.0 {
                (0..n).map(|i| 1.0 / ((i + 1) as f64).powf(skew)).collect()
            } else {
                vec![1.0; n]
            };
            let total: f64 = raw.iter().sum();
            let weights: Vec<f64> = raw.iter().map(|w| w / total).collect();
            let index = WeightedIndex::new(weights.iter().copied())
                .map_err(|e| Error::Config(format!("invalid weight table: {e}")))?;
            tables.push(ShardTable { low, weights, index });
        }

        Ok(Self { tables })
    }

    /// Draw one key from `shard`'s distribution using the caller's RNG.
    ///
    /// For a fixed seed and fixed call order the sampled sequence is stable
    /// across runs of this implementation.
    pub fn sample(&self, shard: ShardId, rng: &mut SmallRng) -> Key {
        let table = &self.tables[shard - 1];
        let offset = table.index.sample(rng) as u64;
        table.low + offset
    }

    /// Normalized probability table for a shard, offset-indexed from the
    /// shard's low key.
    pub fn weights(&self, shard: ShardId) -> &[f64] {
        &self.tables[shard - 1].weights
    }
}
