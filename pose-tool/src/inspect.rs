use crate::{
    common::*,
    config::Config,
    data::{BoxedDataset, Splits},
};
use prettytable::{cell, row, Table};
use std::iter;

/// Sequence length statistics of a split, counted per sampling regime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthStats {
    pub num_records: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub total_len: usize,
    pub num_pad: usize,
    pub num_sparse: usize,
    pub num_bucketed: usize,
}

impl LengthStats {
    pub fn from_lengths(lengths: &[usize], seq_len: usize) -> Result<Self> {
        ensure!(!lengths.is_empty(), "no sequence lengths to summarize");

        let mut stats = Self {
            num_records: lengths.len(),
            min_len: usize::MAX,
            max_len: 0,
            total_len: 0,
            num_pad: 0,
            num_sparse: 0,
            num_bucketed: 0,
        };

        for &len in lengths {
            stats.min_len = stats.min_len.min(len);
            stats.max_len = stats.max_len.max(len);
            stats.total_len += len;

            match Regime::select(len, seq_len)? {
                Regime::Pad => stats.num_pad += 1,
                Regime::SparseRandom => stats.num_sparse += 1,
                Regime::BucketedRandom => stats.num_bucketed += 1,
            }
        }

        Ok(stats)
    }

    pub async fn collect<D>(dataset: &D, seq_len: usize, num_workers: usize) -> Result<Self>
    where
        D: RandomAccessDataset + ?Sized,
    {
        let lengths: Vec<usize> = stream::iter(0..dataset.num_records())
            .map(|index| dataset.nth(index))
            .buffered(num_workers)
            .map_ok(|record| record.sequence.nrows())
            .try_collect()
            .await?;
        Self::from_lengths(&lengths, seq_len)
    }

    pub fn mean_len(&self) -> f64 {
        self.total_len as f64 / self.num_records as f64
    }
}

/// Prints the record counts, sequence length statistics and label table of
/// the configured dataset.
pub async fn inspect(config: &Config) -> Result<()> {
    let splits = Splits::load(&config.dataset).await?;
    let seq_len = config.sampler.seq_len.get();
    let num_workers = config.loader.num_workers.get();

    let mut table = Table::new();
    table.add_row(row![
        "split", "records", "classes", "min len", "mean len", "max len", "pad", "sparse",
        "bucketed"
    ]);

    for (name, dataset) in named_splits(&splits) {
        let stats = LengthStats::collect(dataset, seq_len, num_workers)
            .await
            .with_context(|| format!("failed to read the {} split", name))?;

        table.add_row(row![
            name,
            stats.num_records,
            dataset.num_classes(),
            stats.min_len,
            format!("{:.1}", stats.mean_len()),
            stats.max_len,
            stats.num_pad,
            stats.num_sparse,
            stats.num_bucketed
        ]);
    }

    println!("sampling to {} frames per sequence", seq_len);
    table.printstd();

    if let Some(label_table) = &splits.label_table {
        let mut table = Table::new();
        table.add_row(row!["id", "label"]);
        label_table.names().enumerate().for_each(|(id, name)| {
            table.add_row(row![id, name]);
        });
        table.printstd();
    }

    Ok(())
}

fn named_splits(splits: &Splits) -> impl Iterator<Item = (&'static str, &BoxedDataset)> {
    iter::once(("train", &splits.train)).chain(splits.val.as_ref().map(|val| ("val", val)))
}
