//! Bloom filter: sizing, partition-aware addressing, and serialization.
pub mod config;
pub mod filter;

pub use config::{
    FilterConfig, FilterConfigBuilder, FilterConfigBuilderError,
    optimal_bit_count, optimal_hash_count,
};
pub use filter::BloomFilter;
