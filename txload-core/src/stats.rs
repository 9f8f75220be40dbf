//! Independent workload statistics
//!
//! Recomputes the distributional summary of a generated batch from scratch:
//! intra/cross classification comes from shard lookup on both endpoints of
//! every transfer, never from the generation-time branch taken. This makes
//! the summary double as a correctness check on the mix logic. Purely
//! observational; the batch and output file are untouched.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::topology::ShardMap;
use crate::transaction::{Transaction, WorkloadBatch};

/// Distributional summary of one workload batch.
///
/// `intra_fraction` and `cross_fraction` are relative to the read-write
/// count; all fractions are 0 when their denominator is 0.
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadStats {
    pub total: usize,
    pub readonly_count: usize,
    pub readonly_fraction: f64,
    pub readwrite_count: usize,
    pub readwrite_fraction: f64,
    pub intra_count: usize,
    pub intra_fraction: f64,
    pub cross_count: usize,
    pub cross_fraction: f64,
}

/// Summarize `batch` against `shards`.
pub fn summarize(batch: &WorkloadBatch, shards: &ShardMap) -> Result<WorkloadStats> {
    let total = batch.len();
    let mut readonly_count = 0;
    let mut intra_count = 0;
    let mut cross_count = 0;

    for tx in batch.iter() {
        match tx {
            Transaction::ReadOnly { .. } => readonly_count += 1,
            Transaction::Transfer { src, dst, .. } => {
                if shards.shard_of(*src)? == shards.shard_of(*dst)? {
                    intra_count += 1;
                } else {
                    cross_count += 1;
                }
            }
        }
    }

    let readwrite_count = total - readonly_count;
    let frac = |part: usize, whole: usize| {
        if whole == 0 {
            0.0
        } else {
            part as f64 / whole as f64
        }
    };

    Ok(WorkloadStats {
        total,
        readonly_count,
        readonly_fraction: frac(readonly_count, total),
        readwrite_count,
        readwrite_fraction: frac(readwrite_count, total),
        intra_count,
        intra_fraction: frac(intra_count, readwrite_count),
        cross_count,
        cross_fraction: frac(cross_count, readwrite_count),
    })
}

impl fmt::Display for WorkloadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Workload Statistics ===")?;
        writeln!(f, "Total transactions: {}", self.total)?;
        writeln!(
            f,
            "Read-only: {} ({:.1}%)",
            self.readonly_count,
            100.0 * self.readonly_fraction
        )?;
        writeln!(
            f,
            "Read-write: {} ({:.1}%)",
            self.readwrite_count,
            100.0 * self.readwrite_fraction
        )?;
        if self.readwrite_count > 0 {
            writeln!(
                f,
                "  Intra-shard: {} ({:.1}% of RW)",
                self.intra_count,
                100.0 * self.intra_fraction
            )?;
            writeln!(
                f,
                "  Cross-shard: {} ({:.1}% of RW)",
                self.cross_count,
                100.0 * self.cross_fraction
            )?;
        }
        Ok(())
    }
}
