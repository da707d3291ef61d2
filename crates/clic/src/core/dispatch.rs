//! Interrupt dispatch state machine.
//!
//! This module drives interrupts from the controller's handshake latch into
//! handler execution. It provides:
//! 1. **Vector table:** The ID-to-handler mapping installed at setup time.
//! 2. **State machine:** `Idle → DispatchPending → InHandler → Returning → Idle`.
//! 3. **Vectoring:** SHV interrupts jump through the vector table directly;
//!    non-SHV interrupts go through the shared trap entry, which discovers the
//!    ID from `mcause` and may tail-chain further interrupts via mnxti.
//! 4. **Nesting:** Handlers call [`IrqFrame::poll`] to open a preemption
//!    window; entry pushes the trap context, exit restores it exactly (LIFO).

use tracing::{debug, warn};

use crate::clic::Clic;
use crate::common::{DispatchError, IrqRequest};
use crate::core::csr::CsrFile;
use crate::core::mnxti;

/// An installed interrupt service routine.
///
/// Handlers receive an [`IrqFrame`] granting access to the CSR file, the
/// controller registers, and the preemption/tail-chain machinery.
pub type Isr = Box<dyn FnMut(&mut IrqFrame<'_, '_>)>;

/// Dispatch state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    /// No interrupt in flight.
    #[default]
    Idle,
    /// A request was accepted; context push and vector fetch in progress.
    DispatchPending,
    /// A handler body is executing.
    InHandler,
    /// Handler finished; context restore in progress.
    Returning,
}

/// ID-to-handler mapping, indexed by interrupt line.
///
/// Serves both dispatch paths: SHV interrupts are fetched from it directly,
/// and the shared trap entry looks up the same table after reading `mcause`.
/// Installed once during setup, before interrupts are enabled.
pub struct VectorTable {
    entries: Vec<Option<Isr>>,
}

impl VectorTable {
    /// Creates an empty table covering `lines` interrupt IDs.
    pub fn new(lines: u32) -> Self {
        let mut entries = Vec::new();
        entries.resize_with(lines as usize, || None);
        Self { entries }
    }

    /// Installs (or replaces) the handler for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::IdOutOfRange`] for IDs beyond the table.
    pub fn install(&mut self, id: u32, isr: Isr) -> Result<(), DispatchError> {
        let lines = self.entries.len() as u32;
        let slot = self
            .entries
            .get_mut(id as usize)
            .ok_or(DispatchError::IdOutOfRange { id, lines })?;
        *slot = Some(isr);
        Ok(())
    }

    /// Whether a handler is installed for `id`.
    pub fn contains(&self, id: u32) -> bool {
        matches!(self.entries.get(id as usize), Some(Some(_)))
    }

    /// Removes the handler for `id` while it runs, so the handler itself can
    /// borrow the table (e.g., to preempt into another entry).
    fn take(&mut self, id: u32) -> Option<Isr> {
        self.entries.get_mut(id as usize)?.take()
    }

    fn put_back(&mut self, id: u32, isr: Isr) {
        if let Some(slot) = self.entries.get_mut(id as usize) {
            *slot = Some(isr);
        }
    }
}

impl std::fmt::Debug for VectorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let installed: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.is_some().then_some(i))
            .collect();
        f.debug_struct("VectorTable")
            .field("lines", &self.entries.len())
            .field("installed", &installed)
            .finish()
    }
}

/// Split-borrow dispatcher over the machine's interrupt-visible state.
///
/// Owns nothing; the simulator lends it the controller, the CSR file, the
/// vector table, and the state variable for the duration of one service pass.
/// Nested preemption is recursion through this same type.
#[derive(Debug)]
pub struct Dispatcher<'m> {
    /// Interrupt controller registers and handshake latch.
    pub clic: &'m mut Clic,
    /// Core CSR file.
    pub csrs: &'m mut CsrFile,
    /// Handler mapping.
    pub vectors: &'m mut VectorTable,
    /// Observable state machine position.
    pub state: &'m mut DispatchState,
}

impl Dispatcher<'_> {
    /// Runs one service pass: evaluates the handshake latch and, if the
    /// presented request beats the effective threshold, dispatches it to
    /// completion (including any nested or tail-chained handlers).
    ///
    /// Returns `true` if an interrupt was taken.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingVector`] if an SHV interrupt fires with
    /// no vector table entry installed.
    pub fn service(&mut self) -> Result<bool, DispatchError> {
        // The latch is a peripheral wire: it forms regardless of core-side
        // masking. Only acceptance is gated on mie and the threshold.
        let Some(req) = self.clic.pending_request() else {
            return Ok(false);
        };
        if !self.csrs.mie() {
            return Ok(false);
        }
        if req.level <= self.csrs.effective_threshold() {
            return Ok(false);
        }
        self.enter(req)?;
        Ok(true)
    }

    /// Accepts `req` and runs its handler to completion.
    ///
    /// The pre-trap context is pushed onto the call stack here and restored on
    /// the way out; that pairing is the nesting invariant.
    fn enter(&mut self, req: IrqRequest) -> Result<(), DispatchError> {
        let saved = self.csrs.context();
        *self.state = DispatchState::DispatchPending;
        self.clic.accept(req);
        self.csrs.trap_enter(req.id, req.level, req.shv);
        debug!(id = req.id, level = req.level, shv = req.shv, mpil = saved.mil, "interrupt taken");

        let result = if req.shv {
            self.vectored_entry(req)
        } else {
            self.shared_entry(req);
            Ok(())
        };

        *self.state = DispatchState::Returning;
        self.csrs.trap_exit(saved);
        *self.state = DispatchState::Idle;
        debug!(id = req.id, "interrupt handler returned");
        result
    }

    /// Hardware-vectored path: fetch the handler straight from the table.
    fn vectored_entry(&mut self, req: IrqRequest) -> Result<(), DispatchError> {
        let Some(mut isr) = self.vectors.take(req.id) else {
            // minhv is still set here: the fetch never completed.
            return Err(DispatchError::MissingVector { id: req.id });
        };
        self.csrs.handler_entered();
        *self.state = DispatchState::InHandler;
        isr(&mut IrqFrame { disp: self, id: req.id });
        self.vectors.put_back(req.id, isr);
        Ok(())
    }

    /// Shared trap entry: discover the ID from `mcause`, run the hook, then
    /// tail-chain while mnxti keeps yielding non-SHV candidates.
    fn shared_entry(&mut self, first: IrqRequest) {
        let mut current = first;
        loop {
            self.csrs.handler_entered();
            *self.state = DispatchState::InHandler;
            // Re-read the cause register the way the shared entry stub would.
            let id = self.csrs.read(crate::core::csr::MCAUSE) & 0xFFF;
            debug_assert_eq!(id, current.id);
            if let Some(mut isr) = self.vectors.take(current.id) {
                isr(&mut IrqFrame { disp: self, id: current.id });
                self.vectors.put_back(current.id, isr);
            } else {
                warn!(id = current.id, "spurious interrupt: no handler hooked");
            }

            if !self.clic.mnxti_enabled() {
                return;
            }
            match mnxti::claim_next(self.clic, self.csrs) {
                Some(next) => {
                    self.csrs.retarget(next.id, next.level);
                    current = next;
                }
                None => return,
            }
        }
    }
}

/// Execution context handed to a running handler.
///
/// Wraps the dispatcher so the handler can touch CSRs and controller
/// registers, and can open a preemption window with [`IrqFrame::poll`].
#[derive(Debug)]
pub struct IrqFrame<'a, 'm> {
    disp: &'a mut Dispatcher<'m>,
    id: u32,
}

impl IrqFrame<'_, '_> {
    /// ID of the interrupt this handler was invoked for.
    pub const fn irq(&self) -> u32 {
        self.id
    }

    /// Reads a CSR from handler context.
    pub fn read_csr(&self, addr: u32) -> u32 {
        self.disp.csrs.read(addr)
    }

    /// Writes a CSR from handler context (hardware write masks apply).
    pub fn write_csr(&mut self, addr: u32, val: u32) {
        self.disp.csrs.write(addr, val);
    }

    /// Mutable access to the controller registers, for handlers that pend or
    /// reconfigure other lines.
    pub fn clic_mut(&mut self) -> &mut Clic {
        self.disp.clic
    }

    /// Opens a preemption window: any pending line whose level strictly
    /// exceeds the current one is dispatched (recursively) before this
    /// returns. Returns `true` if a nested interrupt ran.
    ///
    /// # Errors
    ///
    /// Propagates fatal dispatch conditions from the nested entry.
    pub fn poll(&mut self) -> Result<bool, DispatchError> {
        self.disp.service()
    }
}
