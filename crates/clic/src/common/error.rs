//! Dispatch error definitions.
//!
//! Most CLIC misbehavior is masked by hardware semantics (reserved CSR bits are
//! silently discarded, spurious interrupts fall through to a logged no-op). The
//! errors here cover the conditions that have no architectural recovery: they
//! terminate the simulation the way the corresponding hardware state would hang
//! or trap fatally.

use thiserror::Error;

/// Fatal conditions raised by the dispatch state machine or setup routines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A hardware-vectored interrupt fired but its vector table entry was never
    /// installed. Real hardware would fetch a junk address and jump into the
    /// weeds; the model surfaces it as a fatal trap instead. The request was
    /// already accepted when the fetch failed, so an edge-latched pending bit
    /// is consumed with it.
    #[error("no vector table entry installed for hardware-vectored interrupt {id}")]
    MissingVector {
        /// ID of the interrupt whose vector entry is missing.
        id: u32,
    },

    /// An interrupt ID beyond the configured number of lines was used.
    #[error("interrupt id {id} out of range: controller has {lines} lines")]
    IdOutOfRange {
        /// Out-of-range interrupt ID.
        id: u32,
        /// Number of lines the controller was configured with.
        lines: u32,
    },

    /// Configuration could not be parsed or read.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Human-readable parse or I/O failure description.
        reason: String,
    },
}
