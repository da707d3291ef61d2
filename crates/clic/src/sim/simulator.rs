//! Simulator: owns the controller, the core CSR file, and the vector table
//! side-by-side.
//!
//! Each [`Simulator::step`] performs one service pass: the controller latch is
//! evaluated and, if an eligible request is presented, the interrupt runs to
//! completion (nested and tail-chained handlers included) before the step
//! returns. Tests drive bounded poll windows with [`Simulator::run`].

use crate::clic::Clic;
use crate::common::DispatchError;
use crate::config::Config;
use crate::core::dispatch::{DispatchState, Dispatcher, Isr, VectorTable};
use crate::core::CsrFile;
use crate::device::Device;

/// Top-level machine model: CLIC + core-side interrupt state.
#[derive(Debug)]
pub struct Simulator {
    /// Interrupt controller (register bank, gateways, handshake latch).
    pub clic: Clic,
    /// Core CSR file.
    pub csrs: CsrFile,
    vectors: VectorTable,
    state: DispatchState,
    poll_window: u64,
}

impl Simulator {
    /// Builds a machine from configuration.
    pub fn new(config: &Config) -> Self {
        let clic = Clic::new(&config.clic);
        let csrs = CsrFile::new(config.clic.base_addr);
        let vectors = VectorTable::new(config.clic.lines as u32);
        Self {
            clic,
            csrs,
            vectors,
            state: DispatchState::Idle,
            poll_window: config.sim.poll_window,
        }
    }

    /// Installs a handler for interrupt `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::IdOutOfRange`] for IDs beyond the configured
    /// line count.
    pub fn install(&mut self, id: u32, isr: Isr) -> Result<(), DispatchError> {
        self.vectors.install(id, isr)
    }

    /// Whether a handler is installed for `id`.
    pub fn has_handler(&self, id: u32) -> bool {
        self.vectors.contains(id)
    }

    /// Current dispatch state machine position (always `Idle` between steps).
    pub const fn state(&self) -> DispatchState {
        self.state
    }

    /// One service pass. Returns `true` if an interrupt was taken.
    ///
    /// # Errors
    ///
    /// Propagates fatal dispatch conditions (e.g., an SHV interrupt with no
    /// vector table entry).
    pub fn step(&mut self) -> Result<bool, DispatchError> {
        Dispatcher {
            clic: &mut self.clic,
            csrs: &mut self.csrs,
            vectors: &mut self.vectors,
            state: &mut self.state,
        }
        .service()
    }

    /// Polls for up to the configured window, counting taken interrupts.
    ///
    /// # Errors
    ///
    /// Propagates the first fatal dispatch condition encountered.
    pub fn run(&mut self) -> Result<u64, DispatchError> {
        let mut taken = 0;
        for _ in 0..self.poll_window {
            if self.step()? {
                taken += 1;
            }
        }
        Ok(taken)
    }

    /// Absolute-address MMIO word write, routed to the controller if the
    /// address falls in its region. Writes elsewhere are discarded, as the
    /// bus would for an unmapped address.
    pub fn mmio_write_u32(&mut self, addr: u32, val: u32) {
        let (base, size) = self.clic.address_range();
        if addr >= base && addr - base < size {
            self.clic.write_u32(addr - base, val);
        }
    }

    /// Absolute-address MMIO word read; unmapped addresses read zero.
    pub fn mmio_read_u32(&mut self, addr: u32) -> u32 {
        let (base, size) = self.clic.address_range();
        if addr >= base && addr - base < size {
            self.clic.read_u32(addr - base)
        } else {
            0
        }
    }
}
