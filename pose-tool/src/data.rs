//! Construction of the dataset splits described by the configuration.

use crate::{common::*, config};

pub type BoxedDataset = Box<dyn RandomAccessDataset + Sync>;

/// The training split, the optional validation split and their shared label table.
#[derive(Debug)]
pub struct Splits {
    pub train: BoxedDataset,
    pub val: Option<BoxedDataset>,
    pub label_table: Option<LabelTable>,
}

impl Splits {
    pub async fn load(config: &config::DatasetConfig) -> Result<Self> {
        let config::DatasetConfig {
            ref kind,
            cache,
            ref label_file,
        } = *config;
        let cache = cache.unwrap_or_else(|| kind.default_cache());

        let (train_dir, val_dir, resolver) = match kind {
            config::DatasetKind::UtKinect { train_dir, val_dir } => {
                let table = match label_file {
                    Some(path) if path.is_file() => {
                        info!("continue label ids from '{}'", path.display());
                        LabelTable::open(path)?
                    }
                    _ => LabelTable::new(),
                };
                (train_dir, val_dir, LabelResolver::Token(table))
            }
            config::DatasetKind::Ntu { train_dir, val_dir } => {
                (train_dir, val_dir, LabelResolver::ActionCode)
            }
        };

        info!("loading training split from '{}'", train_dir.display());
        let train = SkeletonDataset::load(train_dir, resolver).await?;

        // the validation split continues the label ids of the training split
        let val = match val_dir {
            Some(val_dir) => {
                info!("loading validation split from '{}'", val_dir.display());
                let val = SkeletonDataset::load(val_dir, train.resolver().clone()).await?;
                Some(val)
            }
            None => None,
        };

        let label_table = val
            .as_ref()
            .unwrap_or(&train)
            .label_table()
            .cloned();

        let train = with_cache(train, cache).await?;
        let val = match val {
            Some(val) => Some(with_cache(val, cache).await?),
            None => None,
        };

        Ok(Self {
            train,
            val,
            label_table,
        })
    }

    pub fn num_classes(&self) -> usize {
        let train = self.train.num_classes();
        let val = self.val.as_ref().map(|val| val.num_classes()).unwrap_or(0);
        train.max(val)
    }
}

async fn with_cache(dataset: SkeletonDataset, cache: config::Cache) -> Result<BoxedDataset> {
    let dataset: BoxedDataset = match cache {
        config::Cache::MemoryCache => Box::new(MemoryCacheDataset::new(dataset).await?),
        config::Cache::OnDemand => Box::new(OnDemandDataset::new(dataset)),
    };
    Ok(dataset)
}

/// Builds the batch loader over a split.
pub fn batch_loader(
    dataset: BoxedDataset,
    mode: Mode,
    sampler: &config::SamplerConfig,
    loader: &LoaderConfig,
) -> Result<BatchLoader<BoxedDataset>> {
    let sampler = FrameSampler::new(sampler.seq_len.get())?;
    let dataset = SampledDataset::new(dataset, sampler, mode);
    Ok(BatchLoader::new(dataset, loader.clone()))
}
