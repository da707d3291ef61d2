//! Common types shared across the CLIC model.
//!
//! This module provides fundamental building blocks used by both the peripheral
//! side and the core side of the model. It includes:
//! 1. **Error Handling:** The dispatch error taxonomy.
//! 2. **Interrupt Requests:** The handshake payload the controller presents to the core.

/// Error types for dispatch and configuration failures.
pub mod error;

pub use error::DispatchError;

/// An interrupt request presented by the controller to the core.
///
/// This is the payload of the CLIC-to-core handshake: the winning line's ID,
/// its effective 8-bit level (after the nlbits split), and whether the line
/// requested selective hardware vectoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqRequest {
    /// Interrupt line ID.
    pub id: u32,
    /// Effective interrupt level (unused low bits read as ones).
    pub level: u8,
    /// Selective hardware vectoring: jump through the vector table directly.
    pub shv: bool,
}
