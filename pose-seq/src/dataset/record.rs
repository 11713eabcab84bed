use crate::common::*;

/// The record with a skeleton file path and its class, but without frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    pub path: PathBuf,
    pub label: usize,
}

/// The record with decoded frames of shape `(frames, dim)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRecord {
    pub label: usize,
    pub sequence: Array2<f32>,
}

/// The record after frame sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledItem {
    pub label: usize,
    pub sequence: Array2<f32>,
    /// The length reported to the consumer, see [SampledSequence](crate::sampler::SampledSequence).
    pub length: usize,
}
