//! Redo-log domain
//!
//! This module provides:
//! - `LogFile` - Descriptor of one log segment in the catalog
//! - `LogFileSelector` - Catalog query plus reduction to the minimal
//!   per-thread set a boundary scan has to mine

mod log_file;
mod selector;

pub use log_file::LogFile;
pub use selector::LogFileSelector;
