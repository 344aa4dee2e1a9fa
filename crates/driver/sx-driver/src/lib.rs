//! Build driver
//!
//! Runs the whole pipeline for one corpus: read the module trees, resolve
//! every import, index the result, aggregate usage statistics and the
//! disambiguation report, then write the payload files the rendering layer
//! consumes. The output directory is owned exclusively for the duration of a
//! build.

pub mod build;
pub mod config;
pub mod emit;
pub mod error;
pub mod load;
pub mod lock;
pub mod report;

pub use build::{Analysis, Build};
pub use config::{CONFIG_FILE_NAME, Config, CorpusConfig, OutputConfig, StatsConfig};
pub use emit::{Payload, build_payloads, encode_value, write_payloads};
pub use error::DriverError;
pub use load::{LoadedCorpus, SkippedModule, load_corpus};
pub use lock::{LOCK_FILE_NAME, OutputLock};
pub use report::{BuildReport, ReportedDiagnostic};
