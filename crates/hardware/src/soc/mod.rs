//! Controller collaborators.
//!
//! This module models everything outside the controller proper: the host
//! FIFOs, the experiment peripheral, and the builder that wires them into a
//! clocked system.

/// System builder wiring the controller to its FIFOs and experiment.
pub mod builder;

/// Experiment implementations.
pub mod devices;

/// Bounded word queues.
pub mod fifo;

/// Experiment trait definitions.
pub mod traits;

pub use builder::{System, TickReport};
pub use devices::RegisterFile;
pub use fifo::Fifo;
pub use traits::{Experiment, ExperimentPort};
