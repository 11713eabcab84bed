//! Fixed-length frame sampling over variable-length sequences.
//!
//! In training mode every sequence is mapped to exactly `seq_len` frames. The
//! policy depends on the input length `L` compared against the target:
//!
//! - `L < target`: the frames are copied to the head of a zero-filled output.
//! - `target <= L < 2 * target`: `target` distinct frames are drawn without
//!   replacement and kept in temporal order.
//! - `L >= 2 * target`: the time axis is split into `target` contiguous buckets
//!   and one frame is drawn from each bucket.
//!
//! Validation mode passes the sequence through untouched.

use crate::{common::*, error::SeqError};

/// Whether sequences are resampled to a fixed length or kept whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Train,
    Validate,
}

/// The sampling policy chosen for a sequence length and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    Pad,
    SparseRandom,
    BucketedRandom,
}

impl Regime {
    pub fn select(len: usize, target: usize) -> Result<Self, SeqError> {
        if len == 0 {
            return Err(SeqError::EmptySequence);
        }
        if target == 0 {
            return Err(SeqError::config("seq_len must be positive"));
        }

        let regime = if len < target {
            Self::Pad
        } else if len < 2 * target {
            Self::SparseRandom
        } else {
            Self::BucketedRandom
        };
        Ok(regime)
    }
}

/// The frame selection of one sampling call, before any frame is copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplePlan {
    /// Keep all `len` frames and append `target - len` zero frames.
    Pad { len: usize, target: usize },
    /// Gather frames at these source indices, which are strictly ascending.
    Gather(Vec<usize>),
}

impl SamplePlan {
    pub fn output_len(&self) -> usize {
        match self {
            Self::Pad { target, .. } => *target,
            Self::Gather(indices) => indices.len(),
        }
    }
}

/// Decides which source frames make up a `target`-frame sample of a
/// `len`-frame sequence.
pub fn plan<R>(len: usize, target: usize, rng: &mut R) -> Result<SamplePlan, SeqError>
where
    R: Rng + ?Sized,
{
    let plan = match Regime::select(len, target)? {
        Regime::Pad => SamplePlan::Pad { len, target },
        Regime::SparseRandom => {
            let mut indices = rand::seq::index::sample(rng, len, target).into_vec();
            indices.sort_unstable();
            SamplePlan::Gather(indices)
        }
        Regime::BucketedRandom => {
            let bounds = bucket_bounds(len, target);
            let indices = bounds
                .windows(2)
                .map(|range| rng.gen_range(range[0]..range[1]))
                .collect();
            SamplePlan::Gather(indices)
        }
    };
    Ok(plan)
}

/// Returns the `target + 1` boundaries of the buckets used when `len >= 2 * target`.
///
/// Bucket `i` spans `bounds[i]..bounds[i + 1]`. Every bucket but the last
/// holds `len / target` frames; the last one absorbs the remainder.
pub fn bucket_bounds(len: usize, target: usize) -> Vec<usize> {
    debug_assert!(target > 0 && len >= target);
    let step = len / target;
    (0..target)
        .map(|index| index * step)
        .chain(iter::once(len))
        .collect()
}

/// A sampled sequence together with the length reported to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSequence {
    pub data: Array2<f32>,
    /// Equals `seq_len` in training mode, including the padded case, and the
    /// original frame count in validation mode.
    pub length: usize,
}

/// Maps frame sequences of shape `(frames, dim)` to fixed-length samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSampler {
    seq_len: usize,
}

impl FrameSampler {
    pub fn new(seq_len: usize) -> Result<Self, SeqError> {
        if seq_len == 0 {
            return Err(SeqError::config("seq_len must be positive"));
        }
        Ok(Self { seq_len })
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn sample<R>(
        &self,
        sequence: Array2<f32>,
        mode: Mode,
        rng: &mut R,
    ) -> Result<SampledSequence, SeqError>
    where
        R: Rng + ?Sized,
    {
        let len = sequence.nrows();
        if len == 0 {
            return Err(SeqError::EmptySequence);
        }

        if mode == Mode::Validate {
            return Ok(SampledSequence {
                data: sequence,
                length: len,
            });
        }

        let data = match plan(len, self.seq_len, rng)? {
            SamplePlan::Pad { len, target } => {
                let mut padded = Array2::zeros((target, sequence.ncols()));
                padded.slice_mut(s![..len, ..]).assign(&sequence);
                padded
            }
            SamplePlan::Gather(indices) => sequence.select(Axis(0), &indices),
        };

        Ok(SampledSequence {
            data,
            length: self.seq_len,
        })
    }
}

/// Samples `sequence` to `seq_len` frames, or passes it through in validation mode.
pub fn sample<R>(
    sequence: Array2<f32>,
    seq_len: usize,
    mode: Mode,
    rng: &mut R,
) -> Result<SampledSequence, SeqError>
where
    R: Rng + ?Sized,
{
    FrameSampler::new(seq_len)?.sample(sequence, mode, rng)
}
