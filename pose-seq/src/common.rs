pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use futures::{
    future,
    future::FutureExt as _,
    stream::{self, BoxStream, Stream, StreamExt as _, TryStreamExt as _},
};
pub use indexmap::IndexSet;
pub use log::{debug, info, warn};
pub use ndarray::{s, Array1, Array2, Array3, ArrayD, ArrayView2, Axis, Ix2};
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    borrow::Borrow,
    fmt::Debug,
    fs,
    future::Future,
    io::Cursor,
    iter,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    pin::Pin,
    sync::Arc,
};
