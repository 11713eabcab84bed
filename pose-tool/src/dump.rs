//! Export of sampled batches as `.npy` files.

use crate::{common::*, config::Config, data};
use ndarray_npy::write_npy;
use pose_seq::Batch;

/// The dataset split to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Val,
}

impl Split {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Train => Mode::Train,
            Self::Val => Mode::Validate,
        }
    }
}

impl FromStr for Split {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let split = match text {
            "train" => Self::Train,
            "val" => Self::Val,
            _ => bail!("invalid split '{}', expect 'train' or 'val'", text),
        };
        Ok(split)
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Train => "train",
            Self::Val => "val",
        };
        write!(f, "{}", text)
    }
}

/// Runs the batch loader over a split and saves each batch under
/// `output_dir/<split>/epoch-NNN/`.
pub async fn dump(config: &Config, output_dir: &Path, epochs: usize, split: Split) -> Result<()> {
    let splits = data::Splits::load(&config.dataset).await?;
    let split_dir = output_dir.join(split.to_string());
    tokio::fs::create_dir_all(&split_dir).await?;

    if let Some(label_table) = &splits.label_table {
        let path = split_dir.join("labels.json");
        label_table
            .save(&path)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }

    let dataset = match split {
        Split::Train => splits.train,
        Split::Val => match splits.val {
            Some(val) => val,
            None => bail!("the dataset has no validation split"),
        },
    };
    let loader = data::batch_loader(dataset, split.mode(), &config.sampler, &config.loader)?;
    info!(
        "export {} epochs of {} batches to '{}'",
        epochs,
        loader.num_batches(),
        split_dir.display()
    );

    for epoch in 0..epochs {
        let epoch_dir = split_dir.join(format!("epoch-{:03}", epoch));
        tokio::fs::create_dir_all(&epoch_dir).await?;

        let num_batches = loader
            .epoch(epoch)
            .enumerate()
            .map(|(index, batch)| batch.map(|batch| (index, batch)))
            .and_then(|(index, batch)| {
                let prefix = epoch_dir.join(format!("batch-{:05}", index));
                async move {
                    tokio::task::spawn_blocking(move || save_batch(&prefix, &batch)).await??;
                    Ok(())
                }
            })
            .try_fold(0usize, |count, ()| future::ready(Ok(count + 1)))
            .await?;

        info!("epoch {}: saved {} batches", epoch, num_batches);
    }

    Ok(())
}

fn save_batch(prefix: &Path, batch: &Batch) -> Result<()> {
    let path_of = |suffix: &str| {
        let mut file_name = prefix.as_os_str().to_owned();
        file_name.push(format!("-{}.npy", suffix));
        PathBuf::from(file_name)
    };

    let write = |suffix: &str, result: Result<(), ndarray_npy::WriteNpyError>| {
        result.with_context(|| format!("failed to write {} of '{}'", suffix, prefix.display()))
    };

    write("labels", write_npy(path_of("labels"), &batch.labels))?;
    write("sequences", write_npy(path_of("sequences"), &batch.sequences))?;
    write("lengths", write_npy(path_of("lengths"), &batch.lengths))?;
    Ok(())
}
