pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{http::router, sanity::SanityClient};
pub use config::ServerConfig;
pub use core::{
    refresher::{RefreshOutcome, Refresher, RefresherHandle},
    store::SnapshotStore,
};
pub use domain::model::Property;
pub use utils::error::{CacheError, Result};
