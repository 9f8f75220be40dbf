//! Transaction mix selection and batch generation
//!
//! The generator owns the shard/node topologies, the per-shard key sampler,
//! and a single RNG stream. Every probabilistic decision (category,
//! locality, shard choice, key draws, amounts) consumes that one stream in
//! call order, so a fixed seed fixes the whole batch.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use crate::sampler::KeySampler;
use crate::topology::{NodeList, ShardId, ShardMap};
use crate::transaction::{Transaction, WorkloadBatch};

/// Retry bound for the intra-shard dst != src rejection loop. With at least
/// two keys per shard the collision probability per draw is strictly below
/// one, so hitting this bound indicates a degenerate weight table.
const MAX_DST_RETRIES: usize = 1000;

/// Workload generator for one configuration.
///
/// Topologies and weight tables are derived once at construction. Repeated
/// [`generate`] calls keep consuming the same RNG stream and are therefore
/// not independently reproducible unless a fresh generator is built.
///
/// [`generate`]: WorkloadGenerator::generate
#[derive(Debug)]
pub struct WorkloadGenerator {
    config: GenerationConfig,
    shards: ShardMap,
    nodes: NodeList,
    sampler: KeySampler,
    rng: SmallRng,
}

impl WorkloadGenerator {
    /// Validate `config` and derive the immutable topology and sampler state.
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;

        let shards = ShardMap::build(config.clusters, config.total_keys)?;
        let nodes = NodeList::build(config.clusters, config.nodes_per_cluster);
        let sampler = KeySampler::precompute(&shards, config.skew)?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        Ok(Self { config, shards, nodes, sampler, rng })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn shards(&self) -> &ShardMap {
        &self.shards
    }

    pub fn nodes(&self) -> &NodeList {
        &self.nodes
    }

    /// Generate the configured number of transactions in call order.
    pub fn generate(&mut self) -> Result<WorkloadBatch> {
        self.generate_batch(self.config.count)
    }

    /// Generate `count` transactions in call order.
    pub fn generate_batch(&mut self, count: usize) -> Result<WorkloadBatch> {
        let mut transactions = Vec::with_capacity(count);
        for _ in 0..count {
            let tx = self.next_transaction()?;
            transactions.push(tx);
        }
        tracing::debug!("generated {} transactions", transactions.len());
        Ok(WorkloadBatch::new(transactions))
    }

    fn next_transaction(&mut self) -> Result<Transaction> {
        if self.rng.random::<f64>() < self.config.ro_fraction {
            self.read_only_tx()
        } else if self.rng.random::<f64>() < self.config.cross_fraction {
            self.cross_shard_tx()
        } else {
            self.intra_shard_tx()
        }
    }

    /// Uniform choice among all configured shards.
    fn pick_shard(&mut self) -> ShardId {
        self.rng.random_range(0..self.shards.len()) + 1
    }

    /// Uniform choice among all shards except `exclude`. Uniform over the
    /// count of other shards, not weighted by shard size.
    fn pick_other_shard(&mut self, exclude: ShardId) -> ShardId {
        let mut shard = self.rng.random_range(0..self.shards.len() - 1) + 1;
        if shard >= exclude {
            shard += 1;
        }
        shard
    }

    fn read_only_tx(&mut self) -> Result<Transaction> {
        let shard = self.pick_shard();
        let key = self.sampler.sample(shard, &mut self.rng);
        Ok(Transaction::ReadOnly { key })
    }

    fn intra_shard_tx(&mut self) -> Result<Transaction> {
        let shard = self.pick_shard();
        if self.shards.shard_size(shard) < 2 {
            return Err(Error::Generation(format!(
                "shard {shard} holds a single key; cannot form an intra-shard transfer"
            )));
        }

        let src = self.sampler.sample(shard, &mut self.rng);
        let mut dst = self.sampler.sample(shard, &mut self.rng);
        let mut retries = 0;
        while dst == src {
            retries += 1;
            if retries > MAX_DST_RETRIES {
                return Err(Error::Generation(format!(
                    "exhausted {MAX_DST_RETRIES} retries sampling a distinct dst in shard {shard}"
                )));
            }
            dst = self.sampler.sample(shard, &mut self.rng);
        }

        let amount = self.rng.random_range(1..=5);
        Ok(Transaction::Transfer { src, dst, amount })
    }

    fn cross_shard_tx(&mut self) -> Result<Transaction> {
        // Only reachable with cross_fraction > 0, which validation ties to
        // clusters >= 2.
        let src_shard = self.pick_shard();
        let dst_shard = self.pick_other_shard(src_shard);
        // Shards are disjoint, so no dst != src check is needed here.
        let src = self.sampler.sample(src_shard, &mut self.rng);
        let dst = self.sampler.sample(dst_shard, &mut self.rng);
        let amount = self.rng.random_range(1..=5);
        Ok(Transaction::Transfer { src, dst, amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ro: f64, cross: f64, count: usize) -> GenerationConfig {
        GenerationConfig {
            ro_fraction: ro,
            cross_fraction: cross,
            count,
            seed: Some(42),
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_batch_length_matches_count() {
        let mut generator = WorkloadGenerator::new(config(0.3, 0.4, 250)).expect("valid config");
        let batch = generator.generate().expect("generation succeeds");
        assert_eq!(batch.len(), 250);
    }

    #[test]
    fn test_transfer_invariants() {
        let mut generator = WorkloadGenerator::new(config(0.2, 0.5, 2000)).expect("valid config");
        let batch = generator.generate().expect("generation succeeds");
        for tx in batch.iter() {
            if let Transaction::Transfer { src, dst, amount } = tx {
                assert_ne!(src, dst, "transfer endpoints must differ");
                assert!((1..=5).contains(amount), "amount {} out of [1, 5]", amount);
            }
        }
    }

    #[test]
    fn test_all_keys_within_key_space() {
        let mut generator = WorkloadGenerator::new(config(0.3, 0.4, 1000)).expect("valid config");
        let batch = generator.generate().expect("generation succeeds");
        for tx in batch.iter() {
            let keys: Vec<u64> = match tx {
                Transaction::ReadOnly { key } => vec![*key],
                Transaction::Transfer { src, dst, .. } => vec![*src, *dst],
            };
            for key in keys {
                assert!((1..=9000).contains(&key), "key {} outside [1, 9000]", key);
            }
        }
    }

    #[test]
    fn test_fixed_seed_reproduces_batch() {
        let mut a = WorkloadGenerator::new(config(0.3, 0.4, 500)).expect("valid config");
        let mut b = WorkloadGenerator::new(config(0.3, 0.4, 500)).expect("valid config");
        let batch_a = a.generate().expect("generation succeeds");
        let batch_b = b.generate().expect("generation succeeds");
        assert_eq!(batch_a, batch_b);
    }

    #[test]
    fn test_repeated_calls_advance_the_stream() {
        let mut generator = WorkloadGenerator::new(config(0.5, 0.5, 100)).expect("valid config");
        let first = generator.generate().expect("generation succeeds");
        let second = generator.generate().expect("generation succeeds");
        assert_ne!(first, second);
    }

    #[test]
    fn test_single_key_shard_rejected_for_intra() {
        let config = GenerationConfig {
            ro_fraction: 0.0,
            cross_fraction: 0.0,
            clusters: 3,
            total_keys: 3,
            count: 10,
            seed: Some(1),
            ..GenerationConfig::default()
        };
        let mut generator = WorkloadGenerator::new(config).expect("valid config");
        assert!(generator.generate().is_err());
    }

    #[test]
    fn test_single_shard_cross_config_rejected_at_construction() {
        let config = GenerationConfig {
            ro_fraction: 0.0,
            cross_fraction: 1.0,
            clusters: 1,
            total_keys: 100,
            count: 10,
            seed: Some(1),
            ..GenerationConfig::default()
        };
        assert!(WorkloadGenerator::new(config).is_err());
    }
}
