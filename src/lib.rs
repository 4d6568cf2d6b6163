pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ValuerConfig;

pub use core::{client::GeminiValuationClient, session::Session, session::SessionState};
pub use domain::model::{ArtworkData, ArtworkField, Source, ValuationResult};
pub use domain::ports::{ConfigProvider, ValuationService};
pub use utils::error::{Result, ValuationError};
