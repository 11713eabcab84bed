use anyhow::{Context, Result};
use pose_tool::{config::Config, Split};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Inspect skeleton sequence datasets and export sampled batches.
enum Args {
    /// Print record counts, sequence length statistics and the label table.
    Inspect {
        #[structopt(long, default_value = "pose.json5")]
        /// configuration file
        config_file: PathBuf,
    },
    /// Run the batch loader and save every batch as .npy files.
    Dump {
        #[structopt(long, default_value = "pose.json5")]
        /// configuration file
        config_file: PathBuf,
        #[structopt(long)]
        /// output directory
        output_dir: PathBuf,
        #[structopt(long, default_value = "1")]
        /// number of epochs to export
        epochs: usize,
        #[structopt(long, default_value = "train")]
        /// dataset split, either 'train' or 'val'
        split: Split,
    },
}

#[tokio::main]
pub async fn main() -> Result<()> {
    pose_tool::logging::init();

    match Args::from_args() {
        Args::Inspect { config_file } => {
            let config = open_config(&config_file)?;
            pose_tool::inspect(&config).await?;
        }
        Args::Dump {
            config_file,
            output_dir,
            epochs,
            split,
        } => {
            let config = open_config(&config_file)?;
            pose_tool::dump(&config, &output_dir, epochs, split).await?;
        }
    }

    Ok(())
}

fn open_config(config_file: &Path) -> Result<Config> {
    Config::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))
}
