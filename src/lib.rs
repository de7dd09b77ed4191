pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::api::{create_app, create_router, AppState};
pub use crate::config::Settings;
pub use crate::core::{aggregator::ModelAggregator, upstream::NhtsaClient};
pub use crate::utils::error::{ApiError, Result};
