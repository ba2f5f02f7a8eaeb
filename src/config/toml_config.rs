use crate::config::{
    DEFAULT_DELIMITER, DEFAULT_LOCATION_COLUMN, DEFAULT_OUTPUT_FILE, DEFAULT_RATE_COLUMN,
    OUTPUT_EXTENSIONS,
};
use crate::core::ConfigProvider;
use crate::utils::error::{TaxError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub location_column: Option<String>,
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub file: Option<String>,
    pub rate_column: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${INPUT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TaxError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_non_empty_string("input.location_column", self.location_column())?;
        validation::validate_delimiter(
            "input.delimiter",
            self.input.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER),
        )?;

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_file_extension("output.file", self.output_file(), &OUTPUT_EXTENSIONS)?;
        validation::validate_non_empty_string("output.rate_column", self.rate_column())?;

        if self.rate_column() == self.location_column() {
            return Err(TaxError::InvalidConfigValueError {
                field: "output.rate_column".to_string(),
                value: self.rate_column().to_string(),
                reason: "Must differ from input.location_column".to_string(),
            });
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn location_column(&self) -> &str {
        self.input
            .location_column
            .as_deref()
            .unwrap_or(DEFAULT_LOCATION_COLUMN)
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_file(&self) -> &str {
        self.output.file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn rate_column(&self) -> &str {
        self.output
            .rate_column
            .as_deref()
            .unwrap_or(DEFAULT_RATE_COLUMN)
    }

    fn delimiter(&self) -> u8 {
        self.input
            .delimiter
            .as_deref()
            .and_then(|d| d.as_bytes().first().copied())
            .unwrap_or(b',')
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_job() {
        let toml_content = r#"
[job]
name = "orders-tax"

[input]
path = "data/orders.csv"

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.job.name, "orders-tax");
        assert_eq!(config.input_path(), "data/orders.csv");
        assert_eq!(config.location_column(), "location");
        assert_eq!(config.rate_column(), "tax_rate");
        assert_eq!(config.output_file(), "tax_output.csv");
        assert_eq!(config.delimiter(), b',');
        assert!(!config.verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_job() {
        let toml_content = r#"
[job]
name = "eu-invoices"
description = "Semicolon separated invoice export"

[input]
path = "invoices.csv"
location_column = "region"
delimiter = ";"

[output]
path = "./out"
file = "invoices_taxed.tsv"
rate_column = "vat_percent"

[logging]
verbose = true
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.location_column(), "region");
        assert_eq!(config.rate_column(), "vat_percent");
        assert_eq!(config.output_file(), "invoices_taxed.tsv");
        assert_eq!(config.delimiter(), b';');
        assert!(config.verbose());
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CUSTOM_TAX_TEST_INPUT_DIR", "/srv/exports");

        let toml_content = r#"
[job]
name = "env"

[input]
path = "${CUSTOM_TAX_TEST_INPUT_DIR}/orders.csv"

[output]
path = "${CUSTOM_TAX_TEST_UNSET_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input.path, "/srv/exports/orders.csv");
        assert_eq!(config.output.path, "${CUSTOM_TAX_TEST_UNSET_DIR}");

        std::env::remove_var("CUSTOM_TAX_TEST_INPUT_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[job]
name = "bad"

[input]
path = "orders.csv"
location_column = "tax_rate"
delimiter = "::"

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[job\nname = ").unwrap_err();
        assert!(matches!(err, TaxError::TomlError(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[job]
name = "file-test"

[input]
path = "orders.csv"

[output]
path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "file-test");
    }
}
