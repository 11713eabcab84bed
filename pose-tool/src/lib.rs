//! Dataset inspection and batch export for skeleton action recognition datasets.

pub mod common;
pub mod config;
pub mod data;
pub mod dump;
pub mod inspect;
pub mod logging;

pub use dump::{dump, Split};
pub use inspect::inspect;
