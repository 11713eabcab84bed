//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use futures::{
    future,
    stream::{self, StreamExt as _, TryStreamExt as _},
};
pub use log::{info, warn};
pub use pose_seq::{
    dataset::{
        GenericDataset, MemoryCacheDataset, OnDemandDataset, RandomAccessDataset,
        SampledDataset, SkeletonDataset,
    },
    BatchLoader, FrameSampler, LabelResolver, LabelTable, LoaderConfig, Mode, Regime,
};
pub use serde::{Deserialize, Serialize};
pub use std::{
    env, fmt, fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};
