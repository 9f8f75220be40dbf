//! Txload Core Library
//!
//! This crate provides the core functionality for the txload workload
//! generator: shard and node topology derivation, Zipfian key sampling,
//! probabilistic transaction-mix selection, CSV serialization in the
//! harness's expected schema, and independent workload statistics.

pub mod config;
pub mod error;
pub mod generator;
pub mod sampler;
pub mod stats;
pub mod topology;
pub mod transaction;
pub mod writer;

pub use config::GenerationConfig;
pub use error::{Error, Result};
pub use generator::WorkloadGenerator;
pub use sampler::KeySampler;
pub use stats::{summarize, WorkloadStats};
pub use topology::{NodeList, ShardId, ShardMap};
pub use transaction::{Key, Transaction, WorkloadBatch};
