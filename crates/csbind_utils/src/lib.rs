//! Process-level helpers shared by the csbind binaries.

pub mod logger;

pub use logger::init_logging;
