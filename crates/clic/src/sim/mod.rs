//! Top-level simulation facade.

/// The `Simulator` type: controller + CSR file + vector table + state machine.
pub mod simulator;

pub use simulator::Simulator;
