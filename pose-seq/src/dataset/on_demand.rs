use super::*;
use crate::{common::*, decode::load_sequence, error::SeqError, label::LabelTable};

/// The dataset that decodes skeleton files on every access.
#[derive(Debug)]
pub struct OnDemandDataset<D>
where
    D: FileDataset,
{
    dataset: D,
}

impl<D> OnDemandDataset<D>
where
    D: FileDataset,
{
    pub fn new(dataset: D) -> Self {
        Self { dataset }
    }

    pub fn into_inner(self) -> D {
        self.dataset
    }
}

impl<D> GenericDataset for OnDemandDataset<D>
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

impl<D> RandomAccessDataset for OnDemandDataset<D>
where
    D: FileDataset,
{
    fn num_records(&self) -> usize {
        self.dataset.records().len()
    }

    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<DataRecord>> + Send>> {
        let len = self.dataset.records().len();
        let record = self.dataset.records().get(index).cloned();

        Box::pin(async move {
            let record = record.ok_or(SeqError::InvalidIndex { index, len })?;
            let label = record.label;
            let sequence =
                tokio::task::spawn_blocking(move || load_sequence(&record.path)).await??;
            Ok(DataRecord { label, sequence })
        })
    }
}
