pub mod refresher;
pub mod store;

pub use crate::domain::model::{Property, QueryResponse};
pub use crate::domain::ports::{ConfigProvider, PropertySource};
pub use crate::utils::error::Result;
