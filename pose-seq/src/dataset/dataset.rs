use super::*;
use crate::{common::*, label::LabelTable};

/// The generic dataset trait.
pub trait GenericDataset
where
    Self: Debug + Send,
{
    /// The number of classes of the dataset.
    fn num_classes(&self) -> usize;

    /// The table that assigns class ids, if the labels are token based.
    fn label_table(&self) -> Option<&LabelTable>;
}

/// The dataset with a list of skeleton file paths.
pub trait FileDataset
where
    Self: GenericDataset,
{
    /// Get the list of file records in the dataset.
    fn records(&self) -> &[Arc<FileRecord>];
}

/// The dataset that can be random accessed.
pub trait RandomAccessDataset
where
    Self: GenericDataset,
{
    /// Get number of records in the dataset.
    fn num_records(&self) -> usize;

    /// Get the nth record in the dataset.
    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<DataRecord>> + Send>>;
}

impl<D> GenericDataset for Box<D>
where
    D: ?Sized + GenericDataset,
{
    fn num_classes(&self) -> usize {
        (**self).num_classes()
    }

    fn label_table(&self) -> Option<&LabelTable> {
        (**self).label_table()
    }
}

impl<D> RandomAccessDataset for Box<D>
where
    D: ?Sized + RandomAccessDataset,
{
    fn num_records(&self) -> usize {
        (**self).num_records()
    }

    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<DataRecord>> + Send>> {
        (**self).nth(index)
    }
}
