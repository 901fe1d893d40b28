pub mod audit;
pub mod etl;
pub mod extract;
pub mod load;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{Dataset, Record, SchemaFamily, Value};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
