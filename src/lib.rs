pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    etl::EtlEngine,
    pipeline::TaxPipeline,
    tax::{tax_rate, CustomTax, DEFAULT_RATE, RATE_TABLE},
};
pub use domain::ports::ScalarFunction;
pub use utils::error::{TaxError, Result};
