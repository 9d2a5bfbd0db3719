pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::archive::JsonlPageSink;
pub use adapters::http::{BiliListingClient, ClientOptions};
pub use adapters::storage::LocalStorage;
pub use config::RunConfig;
pub use crate::core::{
    engine::{HarvestEngine, HarvestSummary},
    harvest::{HarvestSettings, Harvester},
    pacing::{FixedPacer, NoPacer},
};
pub use utils::error::{HarvestError, Result};
