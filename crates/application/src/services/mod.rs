mod inflight_registry;

pub use inflight_registry::{InflightRegistry, Registration, Waiter};
