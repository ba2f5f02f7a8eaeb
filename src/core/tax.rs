//! The `custom_tax` scalar function.
//!
//! Maps a location code to an integer tax-rate percentage. Matching is
//! case-insensitive; absent, empty or unknown locations get [`DEFAULT_RATE`].
//! The lookup is pure, so one [`CustomTax`] value can be shared across any
//! number of threads.

use crate::domain::ports::ScalarFunction;
use crate::utils::error::{TaxError, Result};
use serde_json::Value;

/// Location code (upper-case) to percentage.
pub const RATE_TABLE: [(&str, i32); 4] = [("USA", 10), ("EU", 5), ("CANADA", 8), ("UK", 7)];

/// Rate for anything not in [`RATE_TABLE`].
pub const DEFAULT_RATE: i32 = 0;

/// Looks up the tax rate for `location`.
///
/// ```
/// use custom_tax_udf::tax_rate;
///
/// assert_eq!(tax_rate(Some("usa")), 10);
/// assert_eq!(tax_rate(Some("Japan")), 0);
/// assert_eq!(tax_rate(None), 0);
/// ```
pub fn tax_rate(location: Option<&str>) -> i32 {
    let Some(location) = location else {
        return DEFAULT_RATE;
    };

    // 表中的 key 全為 ASCII 大寫，ASCII 折疊即可
    RATE_TABLE
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(location))
        .map(|(_, rate)| *rate)
        .unwrap_or(DEFAULT_RATE)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomTax;

impl CustomTax {
    pub const NAME: &'static str = "custom_tax";

    pub fn new() -> Self {
        Self
    }

    pub fn eval(&self, location: Option<&str>) -> i32 {
        tax_rate(location)
    }
}

impl ScalarFunction for CustomTax {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        let [arg] = args else {
            return Err(TaxError::ArityMismatch {
                function: Self::NAME.to_string(),
                expected: 1,
                actual: args.len(),
            });
        };

        let location = match arg {
            Value::Null => None,
            Value::String(s) => Some(s.as_str()),
            other => {
                return Err(TaxError::ArgumentType {
                    function: Self::NAME.to_string(),
                    expected: "string".to_string(),
                    actual: json_type_name(other).to_string(),
                })
            }
        };

        Ok(Value::from(self.eval(location)))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
