pub mod active;
pub mod entry;
pub mod lfu;
pub mod lru;
pub mod policy;
pub mod strategy;

pub use active::ActiveEvictionPolicy;
pub use entry::EvictionEntry;
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use policy::EvictionPolicy;
pub use strategy::EvictionStrategy;
