pub mod aggregator;
pub mod upstream;

pub use crate::domain::model::{
    DiscontinuationResult, ModelSet, ProbeResult, ProbeStatus, StatisticsResult, YearlyModels,
};
pub use crate::domain::ports::{ModelSource, UpstreamConfig};
pub use crate::utils::error::Result;
