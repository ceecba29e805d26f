//! Fixed-latency experiment command controller.
//!
//! This crate models a synchronous controller bridging a host link to an
//! experiment peripheral:
//! 1. **Protocol:** Configurable command/response word layout and opcode tables.
//! 2. **Core:** A two-stage (EX, RESPOND) pipeline and the experiment clock-enable state machine.
//! 3. **SoC:** Host FIFOs and the experiment peripheral, wired into a clocked `System`.
//! 4. **Simulation:** Host command scripts, configuration, and statistics collection.

/// Shared constants and error types.
pub mod common;
/// Controller configuration (defaults, field layout, opcode tables, policies).
pub mod config;
/// Controller core (cycle control, pipeline, top-level tick).
pub mod core;
/// Word codec, opcodes, and host-side command/response types.
pub mod protocol;
/// Host scripts and the simulation run loop.
pub mod sim;
/// Collaborators (FIFOs, experiment trait and devices, system builder).
pub mod soc;
/// Controller statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// The controller; advance it with `Controller::tick`.
pub use crate::core::Controller;
/// Script runner; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Top-level system (controller, FIFOs, experiment); construct with `System::new`.
pub use crate::soc::System;
