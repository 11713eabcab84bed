//! Asynchronous batch stream over a sampled dataset.

use crate::{
    collate::{collate, collate_padded, Batch},
    common::*,
    dataset::{RandomAccessDataset, SampledDataset},
    sampler::Mode,
};

/// Batching options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// The number of items per batch.
    pub batch_size: NonZeroUsize,
    /// If set, visit records in a new random order every epoch.
    #[serde(default)]
    pub shuffle: bool,
    /// If set, drop the trailing batch when it is smaller than `batch_size`.
    #[serde(default)]
    pub drop_last: bool,
    /// The maximum number of records loaded concurrently.
    #[serde(default = "default_num_workers")]
    pub num_workers: NonZeroUsize,
    /// Seed of the epoch generators. Runs are not reproducible if unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl LoaderConfig {
    pub fn new(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
            shuffle: false,
            drop_last: false,
            num_workers: default_num_workers(),
            seed: None,
        }
    }
}

fn default_num_workers() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

/// Produces the batches of a [SampledDataset] epoch by epoch.
///
/// Each record is sampled with its own generator. The generators are seeded
/// from one epoch generator, so concurrently loaded records never share
/// random state and a fixed seed reproduces every epoch.
#[derive(Debug)]
pub struct BatchLoader<D>
where
    D: 'static + RandomAccessDataset + Sync,
{
    dataset: Arc<SampledDataset<D>>,
    config: LoaderConfig,
}

impl<D> BatchLoader<D>
where
    D: 'static + RandomAccessDataset + Sync,
{
    pub fn new(dataset: SampledDataset<D>, config: LoaderConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config,
        }
    }

    pub fn dataset(&self) -> &SampledDataset<D> {
        &self.dataset
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The number of batches per epoch.
    pub fn num_batches(&self) -> usize {
        let num_records = self.dataset.num_records();
        let batch_size = self.config.batch_size.get();

        if self.config.drop_last {
            num_records / batch_size
        } else {
            (num_records + batch_size - 1) / batch_size
        }
    }

    /// Streams the batches of the given epoch.
    pub fn epoch(&self, epoch: usize) -> BoxStream<'static, Result<Batch>> {
        let LoaderConfig {
            batch_size,
            shuffle,
            drop_last,
            num_workers,
            seed,
        } = self.config;
        let batch_size = batch_size.get();

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(epoch as u64)),
            None => StdRng::from_entropy(),
        };

        let mut indexes: Vec<_> = (0..self.dataset.num_records()).collect();
        if shuffle {
            indexes.shuffle(&mut rng);
        }
        let jobs: Vec<(usize, u64)> = indexes
            .into_iter()
            .map(|index| (index, rng.gen()))
            .collect();
        debug!("epoch {} has {} records", epoch, jobs.len());

        let dataset = self.dataset.clone();
        let mode = dataset.mode();

        stream::iter(jobs)
            .map(move |(index, item_seed)| dataset.nth(index, StdRng::seed_from_u64(item_seed)))
            .buffered(num_workers.get())
            .chunks(batch_size)
            .filter(move |results| future::ready(!drop_last || results.len() == batch_size))
            .map(move |results| -> Result<_> {
                let items: Vec<_> = results.into_iter().collect::<Result<_>>()?;
                let batch = match mode {
                    Mode::Train => collate(&items)?,
                    Mode::Validate => collate_padded(&items)?,
                };
                Ok(batch)
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::{DataRecord, GenericDataset},
        label::LabelTable,
        sampler::FrameSampler,
    };

    /// Record `i` has `i + 1` frames of dimension 2, filled with `i`.
    #[derive(Debug)]
    struct RampDataset {
        num_records: usize,
    }

    impl GenericDataset for RampDataset {
        fn num_classes(&self) -> usize {
            self.num_records
        }

        fn label_table(&self) -> Option<&LabelTable> {
            None
        }
    }

    impl RandomAccessDataset for RampDataset {
        fn num_records(&self) -> usize {
            self.num_records
        }

        fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<DataRecord>> + Send>> {
            let record = DataRecord {
                label: index,
                sequence: Array2::from_elem((index + 1, 2), index as f32),
            };
            Box::pin(future::ready(Ok::<_, Error>(record)))
        }
    }

    fn loader(mode: Mode, config: LoaderConfig) -> BatchLoader<RampDataset> {
        let dataset = SampledDataset::new(
            RampDataset { num_records: 10 },
            FrameSampler::new(4).unwrap(),
            mode,
        );
        BatchLoader::new(dataset, config)
    }

    fn config(batch_size: usize) -> LoaderConfig {
        LoaderConfig {
            seed: Some(7),
            ..LoaderConfig::new(NonZeroUsize::new(batch_size).unwrap())
        }
    }

    #[tokio::test]
    async fn training_batches_have_fixed_length() -> Result<()> {
        let loader = loader(Mode::Train, config(4));
        let batches: Vec<_> = loader.epoch(0).try_collect().await?;

        assert_eq!(loader.num_batches(), 3);
        assert_eq!(batches.len(), 3);
        assert_eq!(
            batches.iter().map(|batch| batch.len()).collect::<Vec<_>>(),
            [4, 4, 2]
        );
        batches.iter().for_each(|batch| {
            assert_eq!(batch.sequences.shape()[1..], [4, 2]);
            assert!(batch.lengths.iter().all(|&len| len == 4));
        });

        let labels: Vec<_> = batches
            .iter()
            .flat_map(|batch| batch.labels.iter().copied())
            .collect();
        assert_eq!(labels, (0..10).collect::<Vec<i64>>());
        Ok(())
    }

    #[tokio::test]
    async fn validation_batches_keep_full_length() -> Result<()> {
        let loader = loader(Mode::Validate, config(3));
        let batches: Vec<_> = loader.epoch(0).try_collect().await?;

        let first = &batches[0];
        assert_eq!(first.lengths, ndarray::arr1(&[1i64, 2, 3]));
        assert_eq!(first.sequences.dim(), (3, 3, 2));
        assert_eq!(first.sequences[[0, 1, 0]], 0.0);
        assert_eq!(first.sequences[[2, 2, 1]], 2.0);
        Ok(())
    }

    #[tokio::test]
    async fn drop_last_discards_partial_batch() -> Result<()> {
        let loader = loader(
            Mode::Train,
            LoaderConfig {
                drop_last: true,
                ..config(4)
            },
        );
        let batches: Vec<_> = loader.epoch(0).try_collect().await?;

        assert_eq!(loader.num_batches(), 2);
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|batch| batch.len() == 4));
        Ok(())
    }

    #[tokio::test]
    async fn seeded_epochs_are_reproducible() -> Result<()> {
        let config = LoaderConfig {
            shuffle: true,
            ..config(5)
        };
        let lhs = loader(Mode::Train, config.clone());
        let rhs = loader(Mode::Train, config);

        let lhs_batches: Vec<_> = lhs.epoch(3).try_collect().await?;
        let rhs_batches: Vec<_> = rhs.epoch(3).try_collect().await?;
        assert_eq!(lhs_batches, rhs_batches);

        let mut labels: Vec<_> = lhs_batches
            .iter()
            .flat_map(|batch| batch.labels.iter().copied())
            .collect();
        labels.sort_unstable();
        assert_eq!(labels, (0..10).collect::<Vec<i64>>());
        Ok(())
    }
}
