pub mod partitioned_cache;

pub use partitioned_cache::PartitionedCache;
