//! Command pipeline implementation.
//!
//! This module contains the two-stage EXECUTE -> RESPOND pipeline. It includes:
//! 1. **Latches:** The EX/RES pipeline register.
//! 2. **Signals:** Single-cycle strobes and stall reasons.
//! 3. **Stages:** Command control and response composition.
//! 4. **Traits:** Common interface for pipeline latches.

/// Inter-stage pipeline latch (EX/RES).
pub mod latches;

/// Strobes generated by the EX stage.
pub mod signals;

/// Pipeline stage implementations (execute, respond).
pub mod stages;

/// Traits for pipeline latches.
pub mod traits;
