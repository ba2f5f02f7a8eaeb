use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row. A missing location is stored as `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

/// Rows plus the header order they were read in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: Table,
    pub csv_output: String,
    pub processed: usize,
    pub matched: usize,
    pub defaulted: usize,
}
