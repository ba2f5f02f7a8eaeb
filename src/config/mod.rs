pub mod cli;
pub mod toml_config;

pub const DEFAULT_LOCATION_COLUMN: &str = "location";
pub const DEFAULT_RATE_COLUMN: &str = "tax_rate";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_FILE: &str = "tax_output.csv";
pub const DEFAULT_DELIMITER: &str = ",";

/// Output files are always delimited text.
pub const OUTPUT_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::{TaxError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "custom-tax")]
#[command(about = "Look up tax rates by location, one value or a whole CSV column")]
pub struct CliConfig {
    /// Print the rate for a single location code
    #[arg(long)]
    pub location: Option<String>,

    /// Print the rate for an absent location
    #[arg(long)]
    pub null: bool,

    /// CSV file to add a rate column to
    #[arg(long)]
    pub input: Option<String>,

    /// TOML job file (replaces the batch flags)
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_LOCATION_COLUMN)]
    pub column: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    #[arg(long, default_value = DEFAULT_RATE_COLUMN)]
    pub rate_column: String,

    #[arg(long, default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

/// What a single invocation of the tool does.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode<'a> {
    Lookup(Option<&'a str>),
    Batch,
    Job(&'a str),
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn mode(&self) -> Result<RunMode<'_>> {
        let selected = [
            self.location.is_some(),
            self.null,
            self.input.is_some(),
            self.config.is_some(),
        ]
        .iter()
        .filter(|on| **on)
        .count();

        if selected != 1 {
            return Err(TaxError::ConfigError {
                message: "Pass exactly one of --location, --null, --input or --config".to_string(),
            });
        }

        if let Some(location) = &self.location {
            Ok(RunMode::Lookup(Some(location.as_str())))
        } else if self.null {
            Ok(RunMode::Lookup(None))
        } else if let Some(path) = &self.config {
            Ok(RunMode::Job(path.as_str()))
        } else {
            Ok(RunMode::Batch)
        }
    }

    fn validate_batch(&self) -> Result<()> {
        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_path("input", input)?;
        validation::validate_non_empty_string("column", &self.column)?;
        validation::validate_non_empty_string("rate_column", &self.rate_column)?;
        if self.column == self.rate_column {
            return Err(TaxError::InvalidConfigValueError {
                field: "rate_column".to_string(),
                value: self.rate_column.clone(),
                reason: "Must differ from the location column".to_string(),
            });
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extension("output_file", &self.output_file, &OUTPUT_EXTENSIONS)?;
        validation::validate_delimiter("delimiter", &self.delimiter)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match self.mode()? {
            RunMode::Batch => self.validate_batch(),
            RunMode::Job(path) => validation::validate_path("config", path),
            RunMode::Lookup(_) => Ok(()),
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn location_column(&self) -> &str {
        &self.column
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn rate_column(&self) -> &str {
        &self.rate_column
    }

    fn delimiter(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}
