//! Temporal sequence sampling and loading for skeleton action recognition datasets.

mod common;
pub mod collate;
pub mod dataset;
pub mod decode;
pub mod error;
pub mod label;
pub mod loader;
pub mod sampler;

pub use collate::{collate, collate_padded, Batch};
pub use error::SeqError;
pub use label::{LabelResolver, LabelTable};
pub use loader::{BatchLoader, LoaderConfig};
pub use sampler::{FrameSampler, Mode, Regime, SamplePlan, SampledSequence};
