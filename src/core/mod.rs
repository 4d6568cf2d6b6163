pub mod client;
pub mod prompt;
pub mod render;
pub mod response;
pub mod session;

pub use crate::domain::model::{ArtworkData, ArtworkField, Source, ValuationResult};
pub use crate::domain::ports::{ConfigProvider, ValuationService};
pub use crate::utils::error::Result;
