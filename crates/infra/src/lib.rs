//! Infrastructure layer: views, persistence, reports, configuration and the session console.

pub mod config;
pub mod console;
pub mod insights;
pub mod persistence;
pub mod projections;
pub mod reports;

pub use config::{ConfigError, ConsoleConfig};
pub use console::{Console, ConsoleError};
pub use persistence::{
    FileStore, InMemoryStore, KeyValueStore, PersistenceError, SnapshotStore, load_or_default,
};
pub use reports::{CsvReport, ReportError};
