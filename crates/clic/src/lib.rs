//! RISC-V CLIC (Core-Local Interrupt Controller) model.
//!
//! This crate implements a behavioral model of a CLIC and the core-side state
//! it drives, with the following:
//! 1. **Peripheral:** Per-line `clicint` register bank, edge/level gateways,
//!    priority resolution, and the latched request handshake toward the core.
//! 2. **Core:** Machine-mode CSR file (`mintthresh`, `mintstatus`, the aliased
//!    `mcause`/`mstatus` fields) and the vectoring dispatch state machine.
//! 3. **mnxti:** The "next interrupt" fast path that tail-chains non-vectored
//!    handlers without a full trap return.
//! 4. **Simulation:** Configuration and a `Simulator` facade for driving
//!    scenarios and bounded poll windows.

/// Peripheral side: register map, control words, controller state machine.
pub mod clic;
/// Common types (interrupt requests, error taxonomy).
pub mod common;
/// Model configuration (defaults, hierarchical config structures).
pub mod config;
/// Core side: CSR file, dispatch state machine, mnxti fast path.
pub mod core;
/// Memory-mapped device trait.
pub mod device;
/// Top-level simulator facade.
pub mod sim;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Interrupt controller peripheral; register bank plus handshake latch.
pub use crate::clic::Clic;
/// Fatal dispatch and configuration errors.
pub use crate::common::DispatchError;
/// Top-level machine model; construct with `Simulator::new`.
pub use crate::sim::Simulator;
