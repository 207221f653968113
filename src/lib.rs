// Public library interface for plotmap-rs
// The CLI and the diagnostic tools in src/bin share these modules

pub mod config;
pub mod error;
pub mod fixtures;
pub mod layout;
pub mod numbering;
pub mod pipeline;
pub mod stats;
pub mod verify;

pub use config::PipelineConfig;
pub use error::PlotError;
pub use pipeline::{run, PlotMap};
