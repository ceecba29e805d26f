//! Experiment implementations.

/// Register-file experiment that echoes written values.
pub mod register_file;

pub use register_file::RegisterFile;
