//! The mnxti "next interrupt" fast path.
//!
//! Inside a non-vectored handler, querying mnxti pops the next eligible
//! pending interrupt without a full return-then-retrap sequence. The pop is
//! atomic: the candidate is un-pended (edge gateways) and the live trap
//! context is retargeted at it in one step.

use tracing::{debug, trace};

use crate::clic::Clic;
use crate::common::IrqRequest;
use crate::core::csr::CsrFile;

/// Attempts to claim the next tail-chainable interrupt.
///
/// Eligibility: the resolved candidate must exceed both `mintthresh` and
/// `mcause.mpil` (the level of the context the original trap interrupted),
/// and must not request hardware vectoring. An SHV candidate makes the query
/// decline so the interrupt arrives as a normal vectored trap instead.
pub fn claim_next(clic: &mut Clic, csrs: &CsrFile) -> Option<IrqRequest> {
    let floor = csrs.mintthresh().max(csrs.mpil());
    let cand = clic.resolve()?;
    if cand.level <= floor {
        trace!(id = cand.id, level = cand.level, floor, "mnxti: no candidate above floor");
        return None;
    }
    if cand.shv {
        // The fast path cannot vector; fall back to an ordinary trap.
        debug!(id = cand.id, "mnxti: declined SHV candidate");
        return None;
    }
    clic.claim(cand.id);
    debug!(id = cand.id, level = cand.level, "mnxti: claimed");
    Some(cand)
}
