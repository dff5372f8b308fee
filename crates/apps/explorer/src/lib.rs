pub mod config;
pub mod report;
pub mod session;

pub use config::{ConfigError, ExplorerConfig, ViewConfig};
pub use session::{AggregationReport, DatasetPaths, Explorer, ExplorerError, Viewport};
