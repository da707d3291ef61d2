//! Control and Status Register (CSR) state for the CLIC-enabled core.
//!
//! This module implements the core-side CSR subsystem. It provides:
//! 1. **Address Definitions:** Constants for the machine-mode CSRs the model uses.
//! 2. **Field Masks:** Bit positions for `mstatus`, `mcause`, and `mintstatus`.
//! 3. **Register Storage:** The `CsrFile` struct holding architectural state.
//! 4. **Access Logic:** Read/write with hardware write-masking semantics.
//!
//! `mcause` and `mstatus` share the `mpp` and `mpie` fields: both registers are
//! composed from the same underlying state, so a write through either is
//! visible through both. Only M-mode exists on this core, so `mpp` is WARL and
//! always reads `0b11`.

use tracing::warn;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;
/// Machine trap vector base address CSR address.
pub const MTVEC: u32 = 0x305;
/// Machine trap vector table base CSR address (CLIC extension).
pub const MTVT: u32 = 0x307;
/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;
/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;
/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;
/// Machine "next interrupt" CSR address (CLIC extension; claimed through the
/// dispatcher, reads here return zero without side effects).
pub const MNXTI: u32 = 0x345;
/// Machine interrupt threshold CSR address (CLIC extension; low 8 bits writable).
pub const MINTTHRESH: u32 = 0x347;
/// Machine CLIC base address CSR (platform-specific, read-only).
pub const MCLICBASE: u32 = 0x350;
/// Machine interrupt status CSR address (CLIC extension, read-only).
pub const MINTSTATUS: u32 = 0xFB1;

/// Machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MIE: u32 = 1 << 3;
/// Previous machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MPIE: u32 = 1 << 7;
/// Previous privilege mode field offset in `mstatus`.
pub const MSTATUS_MPP_OFFSET: u32 = 11;

/// Interrupt flag bit in `mcause`.
pub const MCAUSE_INTERRUPT: u32 = 1 << 31;
/// Hardware-vectoring-in-progress flag in `mcause`.
pub const MCAUSE_MINHV: u32 = 1 << 30;
/// Previous privilege mode field offset in `mcause` (aliases `mstatus.mpp`).
pub const MCAUSE_MPP_OFFSET: u32 = 28;
/// Previous interrupt enable bit in `mcause` (aliases `mstatus.mpie`).
pub const MCAUSE_MPIE: u32 = 1 << 27;
/// Previous interrupt level field offset in `mcause`.
pub const MCAUSE_MPIL_OFFSET: u32 = 16;
/// Exception code mask in `mcause`.
pub const MCAUSE_EXCCODE_MASK: u32 = 0xFFF;

/// Active interrupt level field offset in `mintstatus`.
pub const MINTSTATUS_MIL_OFFSET: u32 = 24;

/// Only M-mode exists; `mpp` is hardwired to machine.
const MPP_MACHINE: u32 = 0b11;

/// Saved trap context, pushed on handler entry and popped on exit.
///
/// One of these lives on the (Rust) call stack per nesting level; restoring it
/// is what makes the before/after `mintstatus` comparison hold at every depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapContext {
    /// Active interrupt level (`mintstatus.mil`).
    pub mil: u8,
    /// Previous interrupt level (`mcause.mpil`).
    pub mpil: u8,
    /// Exception code (`mcause.exccode`).
    pub exccode: u16,
    /// Interrupt flag (`mcause` bit 31).
    pub interrupt: bool,
    /// Hardware vectoring in progress (`mcause.minhv`).
    pub minhv: bool,
    /// Machine interrupt enable (`mstatus.mie`).
    pub mie: bool,
    /// Previous machine interrupt enable (`mstatus.mpie` / `mcause.mpie`).
    pub mpie: bool,
}

/// Machine-mode CSR file.
#[derive(Debug)]
pub struct CsrFile {
    mie: bool,
    mpie: bool,
    minhv: bool,
    interrupt: bool,
    mil: u8,
    mpil: u8,
    exccode: u16,
    mintthresh: u8,
    mtvec: u32,
    mtvt: u32,
    mepc: u32,
    mscratch: u32,
    mclicbase: u32,
}

impl CsrFile {
    /// Creates a reset-state CSR file. `mclicbase` reports the configured
    /// controller base address; interrupts start globally enabled so that the
    /// threshold and level gating are the only mask in play.
    pub const fn new(mclicbase: u32) -> Self {
        Self {
            mie: true,
            mpie: false,
            minhv: false,
            interrupt: false,
            mil: 0,
            mpil: 0,
            exccode: 0,
            mintthresh: 0,
            mtvec: 0,
            mtvt: 0,
            mepc: 0,
            mscratch: 0,
            mclicbase,
        }
    }

    /// Reads a CSR. Unimplemented addresses read zero.
    pub fn read(&self, addr: u32) -> u32 {
        match addr {
            MSTATUS => {
                (self.mie as u32) << 3
                    | (self.mpie as u32) << 7
                    | MPP_MACHINE << MSTATUS_MPP_OFFSET
            }
            MCAUSE => {
                (self.interrupt as u32) << 31
                    | (self.minhv as u32) << 30
                    | MPP_MACHINE << MCAUSE_MPP_OFFSET
                    | (self.mpie as u32) << 27
                    | (self.mpil as u32) << MCAUSE_MPIL_OFFSET
                    | self.exccode as u32 & MCAUSE_EXCCODE_MASK
            }
            MINTSTATUS => (self.mil as u32) << MINTSTATUS_MIL_OFFSET,
            MINTTHRESH => self.mintthresh as u32,
            MNXTI => 0,
            MTVEC => self.mtvec,
            MTVT => self.mtvt,
            MEPC => self.mepc,
            MSCRATCH => self.mscratch,
            MCLICBASE => self.mclicbase,
            _ => 0,
        }
    }

    /// Writes a CSR, applying hardware write masks.
    ///
    /// Reserved and read-only bits are silently dropped: `mintthresh` keeps
    /// only its low 8 bits, `mintstatus` and `mclicbase` ignore writes
    /// entirely, and the `mpp` field is pinned to machine mode.
    pub fn write(&mut self, addr: u32, val: u32) {
        match addr {
            MSTATUS => {
                self.mie = val & MSTATUS_MIE != 0;
                self.mpie = val & MSTATUS_MPIE != 0;
            }
            MCAUSE => {
                self.interrupt = val & MCAUSE_INTERRUPT != 0;
                self.minhv = val & MCAUSE_MINHV != 0;
                self.mpie = val & MCAUSE_MPIE != 0;
                self.mpil = (val >> MCAUSE_MPIL_OFFSET) as u8;
                self.exccode = (val & MCAUSE_EXCCODE_MASK) as u16;
            }
            MINTTHRESH => self.mintthresh = val as u8,
            MINTSTATUS | MCLICBASE => {
                warn!("write to read-only CSR {addr:#x} discarded");
            }
            MTVEC => self.mtvec = val,
            MTVT => self.mtvt = val,
            MEPC => self.mepc = val,
            MSCRATCH => self.mscratch = val,
            _ => warn!("write to unimplemented CSR {addr:#x} discarded"),
        }
    }

    /// Active interrupt level (`mintstatus.mil`).
    pub const fn mil(&self) -> u8 {
        self.mil
    }

    /// Previous interrupt level (`mcause.mpil`).
    pub const fn mpil(&self) -> u8 {
        self.mpil
    }

    /// Current interrupt threshold (`mintthresh`).
    pub const fn mintthresh(&self) -> u8 {
        self.mintthresh
    }

    /// Global interrupt enable (`mstatus.mie`).
    pub const fn mie(&self) -> bool {
        self.mie
    }

    /// Effective preemption floor: a candidate must exceed both the software
    /// threshold and the active interrupt level to be taken.
    pub fn effective_threshold(&self) -> u8 {
        self.mintthresh.max(self.mil)
    }

    /// Snapshots the trap-visible context (entry pushes this, exit pops it).
    pub const fn context(&self) -> TrapContext {
        TrapContext {
            mil: self.mil,
            mpil: self.mpil,
            exccode: self.exccode,
            interrupt: self.interrupt,
            minhv: self.minhv,
            mie: self.mie,
            mpie: self.mpie,
        }
    }

    /// Installs trap-entry state for interrupt `id` at `level`.
    ///
    /// The previous level becomes `mcause.mpil`, the previous `mie` is stacked
    /// into `mpie`, interrupts are disabled for the handshake, and `minhv`
    /// marks an in-flight hardware-vectored fetch.
    pub fn trap_enter(&mut self, id: u32, level: u8, shv: bool) {
        self.mpil = self.mil;
        self.mil = level;
        self.exccode = (id & 0xFFF) as u16;
        self.interrupt = true;
        self.minhv = shv;
        self.mpie = self.mie;
        self.mie = false;
    }

    /// Marks the vectored fetch complete; the handler body observes
    /// `minhv == 0` and interrupts re-enabled for preemption by higher levels.
    pub fn handler_entered(&mut self) {
        self.minhv = false;
        self.mie = true;
    }

    /// Redirects the live trap context at a tail-chained interrupt without a
    /// full exit/re-entry (the mnxti fast path).
    pub fn retarget(&mut self, id: u32, level: u8) {
        self.exccode = (id & 0xFFF) as u16;
        self.mil = level;
    }

    /// Restores the pre-trap context exactly (the `mret` of this model).
    pub fn trap_exit(&mut self, saved: TrapContext) {
        self.mil = saved.mil;
        self.mpil = saved.mpil;
        self.exccode = saved.exccode;
        self.interrupt = saved.interrupt;
        self.minhv = saved.minhv;
        self.mie = saved.mie;
        self.mpie = saved.mpie;
    }
}
