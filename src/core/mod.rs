pub mod etl;
pub mod pipeline;
pub mod tax;

pub use crate::domain::model::{Record, Table, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ScalarFunction, Storage};
pub use crate::utils::error::Result;
