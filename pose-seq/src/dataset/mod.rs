//! Skeleton dataset toolkit.

mod dataset;
mod mem_cache;
mod on_demand;
mod record;
mod sampled;
mod skeleton;

pub use dataset::*;
pub use mem_cache::*;
pub use on_demand::*;
pub use record::*;
pub use sampled::*;
pub use skeleton::*;
