//! Core side of the model: CSR state and the dispatch state machine.

/// CSR addresses, field masks, and the machine-mode register file.
pub mod csr;

/// Vector table, dispatch state machine, and handler execution frames.
pub mod dispatch;

/// The mnxti tail-chaining fast path.
pub mod mnxti;

pub use csr::CsrFile;
pub use dispatch::{DispatchState, Dispatcher, IrqFrame, Isr, VectorTable};
