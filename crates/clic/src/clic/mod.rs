//! Peripheral side of the model: register map and controller.

/// Controller state machine: register bank, gateways, resolution, latch.
pub mod controller;

/// Register map constants and the per-line control word layout.
pub mod regs;

pub use controller::Clic;
pub use regs::{IntLine, Trigger};
