use crate::core::tax::DEFAULT_RATE;
use crate::core::{
    ConfigProvider, Pipeline, Record, ScalarFunction, Storage, Table, TransformResult,
};
use crate::utils::error::{TaxError, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Reads a CSV file, evaluates a scalar function over its location column
/// once per row and writes the file back with the result appended.
pub struct TaxPipeline<S: Storage, C: ConfigProvider, F: ScalarFunction> {
    storage: S,
    config: C,
    function: F,
}

impl<S: Storage, C: ConfigProvider, F: ScalarFunction> TaxPipeline<S, C, F> {
    pub fn new(storage: S, config: C, function: F) -> Self {
        Self {
            storage,
            config,
            function,
        }
    }

    fn parse_table(&self, bytes: &[u8]) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter())
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut seen = HashSet::new();
        if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(TaxError::ProcessingError {
                message: format!("Duplicate column '{}' in header row", dup),
            });
        }

        if !headers.iter().any(|h| h == self.config.location_column()) {
            return Err(TaxError::ProcessingError {
                message: format!(
                    "Location column '{}' not found; available columns: {}",
                    self.config.location_column(),
                    headers.join(", ")
                ),
            });
        }

        let mut rows = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut data = HashMap::with_capacity(headers.len());
            for (header, cell) in headers.iter().zip(row.iter()) {
                // 空欄位視為缺值
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };
                data.insert(header.clone(), value);
            }
            rows.push(Record { data });
        }

        Ok(Table { headers, rows })
    }

    fn render_csv(&self, table: &Table) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter())
            .from_writer(Vec::new());

        writer.write_record(&table.headers)?;
        for record in &table.rows {
            writer.write_record(
                table
                    .headers
                    .iter()
                    .map(|h| cell_text(record.data.get(h).unwrap_or(&Value::Null))),
            )?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| TaxError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| TaxError::ProcessingError {
            message: format!("Rendered CSV is not valid UTF-8: {}", e),
        })
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: ScalarFunction> Pipeline for TaxPipeline<S, C, F> {
    async fn extract(&self) -> Result<Table> {
        tracing::debug!("Reading input file: {}", self.config.input_path());
        let bytes = self.storage.read_file(self.config.input_path()).await?;
        tracing::debug!("Read {} bytes", bytes.len());

        self.parse_table(&bytes)
    }

    async fn transform(&self, mut table: Table) -> Result<TransformResult> {
        let location_column = self.config.location_column();
        let rate_column = self.config.rate_column();
        let default_rate = Value::from(DEFAULT_RATE);

        if table.headers.iter().any(|h| h == rate_column) {
            tracing::debug!("Column '{}' already present, overwriting", rate_column);
        } else {
            table.headers.push(rate_column.to_string());
        }

        let mut matched = 0;
        let mut defaulted = 0;

        for record in &mut table.rows {
            let location = record
                .data
                .get(location_column)
                .cloned()
                .unwrap_or(Value::Null);

            let rate = self.function.invoke(std::slice::from_ref(&location))?;
            if rate == default_rate {
                defaulted += 1;
            } else {
                matched += 1;
            }

            record.data.insert(rate_column.to_string(), rate);
        }

        let csv_output = self.render_csv(&table)?;

        Ok(TransformResult {
            processed: table.rows.len(),
            table,
            csv_output,
            matched,
            defaulted,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let relative = Path::new(self.config.output_path()).join(self.config.output_file());
        let relative = relative.to_string_lossy().to_string();

        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            result.processed,
            result.csv_output.len(),
            relative
        );
        self.storage
            .write_file(&relative, result.csv_output.as_bytes())
            .await?;

        Ok(relative)
    }
}
