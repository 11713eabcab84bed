use super::*;
use crate::{common::*, decode::load_sequence, error::SeqError, label::LabelTable};
use derivative::Derivative;

/// The dataset that decodes every skeleton file once and keeps the frames in memory.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct MemoryCacheDataset<D>
where
    D: FileDataset,
{
    dataset: D,
    #[derivative(Debug = "ignore")]
    sequences: Vec<Arc<Array2<f32>>>,
}

impl<D> MemoryCacheDataset<D>
where
    D: FileDataset,
{
    pub async fn new(dataset: D) -> Result<Self> {
        let records = dataset.records().to_vec();
        let sequences: Vec<_> = stream::iter(records)
            .map(|record| async move {
                let sequence = tokio::task::spawn_blocking(move || load_sequence(&record.path))
                    .await??;
                Ok::<_, Error>(Arc::new(sequence))
            })
            .buffered(num_cpus::get())
            .try_collect()
            .await?;

        let num_frames: usize = sequences.iter().map(|sequence| sequence.nrows()).sum();
        info!(
            "cached {} sequences with {} frames in total",
            sequences.len(),
            num_frames
        );

        Ok(Self { dataset, sequences })
    }

    pub fn into_inner(self) -> D {
        self.dataset
    }
}

impl<D> GenericDataset for MemoryCacheDataset<D>
where
    D: FileDataset,
{
    fn num_classes(&self) -> usize {
        self.dataset.num_classes()
    }

    fn label_table(&self) -> Option<&LabelTable> {
        self.dataset.label_table()
    }
}

impl<D> RandomAccessDataset for MemoryCacheDataset<D>
where
    D: FileDataset,
{
    fn num_records(&self) -> usize {
        self.sequences.len()
    }

    /// Returns a copy of the cached frames, which the consumer may modify freely.
    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<DataRecord>> + Send>> {
        let len = self.sequences.len();
        let record: Result<_> = self
            .dataset
            .records()
            .get(index)
            .zip(self.sequences.get(index))
            .map(|(record, sequence)| DataRecord {
                label: record.label,
                sequence: (**sequence).clone(),
            })
            .ok_or_else(|| SeqError::InvalidIndex { index, len }.into());

        Box::pin(future::ready(record))
    }
}
