//! Generation parameters and their validation
//!
//! `GenerationConfig` is the single immutable input to the workload
//! generator. It is validated once at construction; every downstream
//! component may assume its bounds hold.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Immutable workload generation parameters.
///
/// Ratios are stored as fractions in [0, 1]; the external CLI surface
/// speaks percentages and converts via [`GenerationConfig::from_percentages`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Fraction of read-only transactions in [0, 1]
    pub ro_fraction: f64,
    /// Fraction of read-write transactions that are cross-shard, in [0, 1]
    pub cross_fraction: f64,
    /// Zipfian skew exponent (0 = uniform, larger = stronger hotspots)
    pub skew: f64,
    /// Number of transactions to generate
    pub count: usize,
    /// Number of shards (clusters)
    pub clusters: usize,
    /// Nodes per cluster
    pub nodes_per_cluster: usize,
    /// Total key space, partitioned [1, total_keys] across shards
    pub total_keys: u64,
    /// Random seed for reproducibility (None = OS entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            ro_fraction: 0.0,
            cross_fraction: 0.0,
            skew: 0.0,
            count: 100,
            clusters: 3,
            nodes_per_cluster: 3,
            total_keys: 9000,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Build a config from the percentage-based external surface.
    ///
    /// `ro_percent` and `cross_percent` must be in [0, 100]; the remaining
    /// parameters are passed through and checked by [`validate`].
    ///
    /// [`validate`]: GenerationConfig::validate
    #[allow(clippy::too_many_arguments)]
    pub fn from_percentages(
        ro_percent: f64,
        cross_percent: f64,
        skew: f64,
        count: usize,
        clusters: usize,
        nodes_per_cluster: usize,
        total_keys: u64,
        seed: Option<u64>,
    ) -> Result<Self> {
        if !(0.0..=100.0).contains(&ro_percent) {
            return Err(Error::Config(format!(
                "read-only percentage must be in [0, 100], got {ro_percent}"
            )));
        }
        if !(0.0..=100.0).contains(&cross_percent) {
            return Err(Error::Config(format!(
                "cross-shard percentage must be in [0, 100], got {cross_percent}"
            )));
        }

        let config = Self {
            ro_fraction: ro_percent / 100.0,
            cross_fraction: cross_percent / 100.0,
            skew,
            count,
            clusters,
            nodes_per_cluster,
            total_keys,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter bound. Called once at generator construction.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.ro_fraction) {
            return Err(Error::Config(format!(
                "ro_fraction must be in [0, 1], got {}",
                self.ro_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.cross_fraction) {
            return Err(Error::Config(format!(
                "cross_fraction must be in [0, 1], got {}",
                self.cross_fraction
            )));
        }
        if !self.skew.is_finite() || self.skew < 0.0 {
            return Err(Error::Config(format!(
                "skew must be a finite value >= 0, got {}",
                self.skew
            )));
        }
        if self.count == 0 {
            return Err(Error::Config("transaction count must be >= 1".to_string()));
        }
        if self.clusters == 0 {
            return Err(Error::Config("cluster count must be >= 1".to_string()));
        }
        if self.nodes_per_cluster == 0 {
            return Err(Error::Config("nodes per cluster must be >= 1".to_string()));
        }
        if self.cross_fraction > 0.0 && self.clusters < 2 {
            return Err(Error::Config(format!(
                "cross-shard transactions require at least two clusters \
                 (cross_fraction = {}, clusters = 1)",
                self.cross_fraction
            )));
        }
        if self.total_keys < self.clusters as u64 {
            return Err(Error::Config(format!(
                "total key space ({}) must be >= cluster count ({})",
                self.total_keys, self.clusters
            )));
        }
        Ok(())
    }
}
