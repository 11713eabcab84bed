use crate::common::*;
use log::LevelFilter;

/// Sets up the global logger. `RUST_LOG` overrides the default `info` level.
pub fn init() {
    let mut builder = pretty_env_logger::formatted_builder();
    match env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(LevelFilter::Info),
    };
    builder.init();
}
