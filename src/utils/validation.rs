use crate::utils::error::{TaxError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TaxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TaxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TaxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_extensions.contains(&extension) => Ok(()),
        Some(extension) => Err(TaxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(TaxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

/// The csv crate only takes single-byte delimiters.
pub fn validate_delimiter(field_name: &str, delimiter: &str) -> Result<u8> {
    match delimiter.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(TaxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: delimiter.to_string(),
            reason: "Delimiter must be a single ASCII character other than a quote or newline"
                .to_string(),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| TaxError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input.path", "orders.csv").is_ok());
        assert!(validate_path("input.path", "").is_err());
        assert!(validate_path("input.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("output.file", "rates.csv", &["csv"]).is_ok());
        assert!(validate_file_extension("output.file", "rates.json", &["csv"]).is_err());
        assert!(validate_file_extension("output.file", "rates", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_delimiter() {
        assert_eq!(validate_delimiter("input.delimiter", ",").unwrap(), b',');
        assert_eq!(validate_delimiter("input.delimiter", "\t").unwrap(), b'\t');
        assert!(validate_delimiter("input.delimiter", "").is_err());
        assert!(validate_delimiter("input.delimiter", ";;").is_err());
        assert!(validate_delimiter("input.delimiter", "\"").is_err());
        assert!(validate_delimiter("input.delimiter", "§").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("orders.csv".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("input", &present).unwrap(), "orders.csv");
        assert!(matches!(
            validate_required_field("input", &missing),
            Err(TaxError::MissingConfigError { .. })
        ));
    }
}
