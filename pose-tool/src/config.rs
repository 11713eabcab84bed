//! Loader program configuration format.

use crate::common::*;

pub use dataset::*;

/// The main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub sampler: SamplerConfig,
    pub loader: LoaderConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

/// Frame sampling options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// The number of frames of every training sample.
    pub seq_len: NonZeroUsize,
}

mod dataset {
    use super::*;

    /// Dataset options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DatasetConfig {
        /// The dataset layout.
        pub kind: DatasetKind,
        /// Overrides the default decoding strategy of the layout.
        #[serde(default)]
        pub cache: Option<Cache>,
        /// If the file exists, class ids continue from this label table.
        #[serde(default)]
        pub label_file: Option<PathBuf>,
    }

    /// Variants of dataset layouts and options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(tag = "type")]
    pub enum DatasetKind {
        /// UTKinect-Action3D layout. Classes come from the file name prefix
        /// before the first underscore.
        UtKinect {
            train_dir: PathBuf,
            val_dir: Option<PathBuf>,
        },
        /// NTU RGB+D layout. Classes come from the action code in the file name.
        Ntu {
            train_dir: PathBuf,
            val_dir: Option<PathBuf>,
        },
    }

    impl DatasetKind {
        pub fn default_cache(&self) -> Cache {
            match self {
                Self::UtKinect { .. } => Cache::MemoryCache,
                Self::Ntu { .. } => Cache::OnDemand,
            }
        }
    }

    /// Decoding strategy of skeleton files.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Cache {
        /// Decode every file once when the dataset is loaded.
        MemoryCache,
        /// Decode the file each time a record is accessed.
        OnDemand,
    }
}
