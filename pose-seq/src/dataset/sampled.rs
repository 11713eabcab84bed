use super::*;
use crate::{
    common::*,
    label::LabelTable,
    sampler::{FrameSampler, Mode, SampledSequence},
};

/// The dataset that samples the frames of every accessed record.
///
/// Sampling happens on every call to [nth](SampledDataset::nth), so the same
/// index yields a different training sample each epoch. Callers that need a
/// stable sample must keep the returned item.
#[derive(Debug)]
pub struct SampledDataset<D>
where
    D: RandomAccessDataset,
{
    dataset: D,
    sampler: FrameSampler,
    mode: Mode,
}

impl<D> SampledDataset<D>
where
    D: RandomAccessDataset,
{
    pub fn new(dataset: D, sampler: FrameSampler, mode: Mode) -> Self {
        Self {
            dataset,
            sampler,
            mode,
        }
    }

    pub fn sampler(&self) -> FrameSampler {
        self.sampler
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn inner(&self) -> &D {
        &self.dataset
    }

    pub fn num_records(&self) -> usize {
        self.dataset.num_records()
    }

    /// Loads the nth record and samples it with `rng`.
    pub fn nth<R>(
        &self,
        index: usize,
        mut rng: R,
    ) -> Pin<Box<dyn Future<Output = Result<SampledItem>> + Send>>
    where
        R: 'static + Rng + Send,
    {
        let record = self.dataset.nth(index);
        let sampler = self.sampler;
        let mode = self.mode;

        Box::pin(async move {
            let DataRecord { label, sequence } = record.await?;
            let SampledSequence { data, length } = sampler
                .sample(sequence, mode, &mut rng)
                .with_context(|| format!("failed to sample record {}", index))?;

            Ok(SampledItem {
                label,
                sequence: data,
                length,
            })
        })
    }
}

impl<D> GenericDataset for SampledDataset<D>
where
    D: RandomAccessDataset,
{
    fn num_classes(&self) -> usize {
        self.dataset.num_classes()
    }

    fn label_table(&self) -> Option<&LabelTable> {
        self.dataset.label_table()
    }
}
