use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("{function}() takes {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("{function}() expects a {expected} argument, got {actual}")]
    ArgumentType {
        function: String,
        expected: String,
        actual: String,
    },
}

impl TaxError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            TaxError::CsvError(_) => "The input file could not be read as CSV".to_string(),
            TaxError::IoError(e) => format!("File access failed: {}", e),
            TaxError::TomlError(_) => "The job file is not valid TOML".to_string(),
            TaxError::ConfigError { message } => message.clone(),
            TaxError::MissingConfigError { field } => format!("'{}' is required", field),
            TaxError::InvalidConfigValueError { field, reason, .. } => {
                format!("'{}' is invalid: {}", field, reason)
            }
            TaxError::ProcessingError { message } => message.clone(),
            TaxError::ArityMismatch { .. } | TaxError::ArgumentType { .. } => {
                format!("Function called incorrectly: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TaxError::CsvError(_) => "Check the delimiter and that every row has the same number of fields",
            TaxError::IoError(_) => "Check that the path exists and is readable/writable",
            TaxError::TomlError(_) => "Fix the syntax error reported above in the job file",
            TaxError::ConfigError { .. }
            | TaxError::MissingConfigError { .. }
            | TaxError::InvalidConfigValueError { .. } => "Run with --help to see the accepted options",
            TaxError::ProcessingError { .. } => "Check that --column names a column in the header row",
            TaxError::ArityMismatch { .. } | TaxError::ArgumentType { .. } => {
                "Call the function with exactly one text or NULL argument"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TaxError>;
