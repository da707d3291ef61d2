//! Core-Local Interrupt Controller (CLIC) peripheral model.
//!
//! The CLIC arbitrates per-line interrupts with 8-bit levels and presents the
//! single best candidate to the core over a latched handshake. It provides:
//! 1. **Register bank:** One `clicint` word per line plus global configuration.
//! 2. **Priority resolution:** Highest level wins; CTL priority bits and then
//!    lowest ID break ties.
//! 3. **Request latch:** Models the non-abortable ready/valid handshake toward
//!    the core: a latched request is not replaced by a later, higher-level line
//!    until it is accepted or its source goes away.
//! 4. **Gateways:** Edge lines latch pending on rising edges or software IP
//!    writes; level lines track the hardware input.

use tracing::{debug, trace, warn};

use crate::clic::regs::{self, IntLine, Trigger};
use crate::common::IrqRequest;
use crate::config::ClicConfig;
use crate::device::Device;

/// Size of the CLIC MMIO region.
const CLIC_REGION_SIZE: u32 = 0x1_0000;

/// CLIC peripheral state.
#[derive(Debug)]
pub struct Clic {
    /// Base physical address of the register bank.
    base_addr: u32,
    /// Level/priority split: how many of the 8 CTL bits encode the level.
    nlbits: u8,
    /// Runtime mnxti enable (the `mnxticonf` register).
    mnxti_enabled: bool,
    /// Whether the mnxti extension exists at all on this build.
    mnxti_supported: bool,
    /// Per-line architectural state.
    lines: Vec<IntLine>,
    /// Hardware input level per line, for edge detection and level tracking.
    inputs: Vec<bool>,
    /// Request latched toward the core, if any.
    latched: Option<IrqRequest>,
}

impl Clic {
    /// Creates a controller from configuration. All lines reset disabled,
    /// not pending, level-sensitive, CTL zero.
    pub fn new(config: &ClicConfig) -> Self {
        Self {
            base_addr: config.base_addr,
            nlbits: config.nlbits_reset.min(8),
            mnxti_enabled: false,
            mnxti_supported: config.mnxti_supported,
            lines: vec![IntLine::default(); config.lines],
            inputs: vec![false; config.lines],
            latched: None,
        }
    }

    /// Number of interrupt lines.
    pub fn lines(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Current `nlbits` value.
    pub const fn nlbits(&self) -> u8 {
        self.nlbits
    }

    /// Whether the mnxti fast path is enabled at runtime.
    pub const fn mnxti_enabled(&self) -> bool {
        self.mnxti_enabled
    }

    /// Snapshot of one line's architectural state (test and debug access).
    pub fn line(&self, id: u32) -> Option<IntLine> {
        self.lines.get(id as usize).copied()
    }

    /// Drives the hardware input signal for a line.
    ///
    /// Level-sensitive lines mirror the input into their pending bit. Edge
    /// lines latch pending on a rising edge only.
    pub fn set_line(&mut self, id: u32, asserted: bool) {
        let Some(line) = self.lines.get_mut(id as usize) else {
            warn!(id, "hardware line out of range");
            return;
        };
        let prev = self.inputs[id as usize];
        self.inputs[id as usize] = asserted;
        match line.trigger() {
            Trigger::Level => line.pending = asserted,
            Trigger::Edge => {
                if asserted && !prev {
                    line.pending = true;
                    trace!(id, "edge gateway latched pending");
                }
            }
        }
    }

    /// Pure priority resolution over `enabled && pending` lines.
    ///
    /// Returns the candidate with the numerically highest effective level;
    /// equal levels fall back to the CTL priority bits, and remaining ties go
    /// to the lowest ID. The lowest-ID rule is a documented model assumption,
    /// not a confirmed hardware contract. Threshold gating is the core's job,
    /// not the controller's.
    pub fn resolve(&self) -> Option<IrqRequest> {
        let mut best: Option<(IrqRequest, u8)> = None;
        for (id, line) in self.lines.iter().enumerate() {
            if !(line.enabled && line.pending) {
                continue;
            }
            let level = line.level(self.nlbits);
            let prio = line.priority(self.nlbits);
            let beats = match best {
                None => true,
                // Strict comparison keeps the earlier (lower) ID on full ties.
                Some((cur, cur_prio)) => (level, prio) > (cur.level, cur_prio),
            };
            if beats {
                best = Some((
                    IrqRequest {
                        id: id as u32,
                        level,
                        shv: line.shv,
                    },
                    prio,
                ));
            }
        }
        best.map(|(req, _)| req)
    }

    /// Re-evaluates the handshake latch and returns the request currently
    /// presented to the core.
    ///
    /// A latched request survives until accepted or until its line stops being
    /// pending-and-enabled; it is *not* displaced by a newly eligible
    /// higher-level line (the handshake cannot be aborted in flight). Level
    /// and SHV attributes of the latched line are refreshed from the register
    /// bank so late CTL writes are still honored.
    pub fn pending_request(&mut self) -> Option<IrqRequest> {
        if let Some(req) = self.latched {
            match self.lines.get(req.id as usize) {
                Some(line) if line.enabled && line.pending => {
                    let refreshed = IrqRequest {
                        id: req.id,
                        level: line.level(self.nlbits),
                        shv: line.shv,
                    };
                    self.latched = Some(refreshed);
                    return self.latched;
                }
                _ => {
                    debug!(id = req.id, "latched request invalidated by source");
                    self.latched = None;
                }
            }
        }
        self.latched = self.resolve();
        if let Some(req) = self.latched {
            debug!(id = req.id, level = req.level, shv = req.shv, "request latched");
        }
        self.latched
    }

    /// Completes the handshake for `req`: drops the latch and, for an
    /// edge-triggered line, clears pending atomically with the acceptance.
    /// Level-sensitive lines stay pending while their input is asserted.
    pub fn accept(&mut self, req: IrqRequest) {
        if self.latched.map(|l| l.id) == Some(req.id) {
            self.latched = None;
        }
        self.claim(req.id);
    }

    /// Clears the pending state of an edge-triggered line (acceptance or an
    /// mnxti pop). Also drops the latch if it points at this line.
    pub fn claim(&mut self, id: u32) {
        if self.latched.map(|l| l.id) == Some(id) {
            self.latched = None;
        }
        if let Some(line) = self.lines.get_mut(id as usize) {
            if line.trigger() == Trigger::Edge {
                line.pending = false;
            }
        }
    }

    fn read_word(&self, offset: u32) -> u32 {
        match offset {
            regs::CLICCFG_OFFSET => self.nlbits as u32 & regs::CLICCFG_NLBITS_MASK,
            regs::MNXTICONF_OFFSET => (self.mnxti_enabled as u32) << regs::MNXTICONF_EN_BIT,
            o if o >= regs::CLICINT_BASE => {
                let idx = ((o - regs::CLICINT_BASE) / regs::CLICINT_STRIDE) as usize;
                self.lines.get(idx).map_or(0, |line| line.to_word())
            }
            _ => 0,
        }
    }

    fn write_word(&mut self, offset: u32, val: u32) {
        match offset {
            regs::CLICCFG_OFFSET => {
                self.nlbits = ((val & regs::CLICCFG_NLBITS_MASK) as u8).min(8);
                trace!(nlbits = self.nlbits, "cliccfg written");
            }
            regs::MNXTICONF_OFFSET => {
                if self.mnxti_supported {
                    self.mnxti_enabled = val & (1 << regs::MNXTICONF_EN_BIT) != 0;
                } else {
                    warn!("mnxti extension not present; mnxticonf write ignored");
                }
            }
            o if o >= regs::CLICINT_BASE => {
                let idx = ((o - regs::CLICINT_BASE) / regs::CLICINT_STRIDE) as usize;
                let Some(line) = self.lines.get_mut(idx) else {
                    trace!(offset = o, "clicint write beyond configured lines");
                    return;
                };
                line.enabled = val & (1 << regs::CLICINT_IE_BIT) != 0;
                line.shv = val & (1 << regs::CLICINT_ATTR_SHV_BIT) != 0;
                line.trig =
                    ((val >> regs::CLICINT_ATTR_TRIG_OFFSET) & regs::CLICINT_ATTR_TRIG_MASK) as u8;
                line.ctl = ((val >> regs::CLICINT_CTL_OFFSET) & regs::CLICINT_CTL_MASK) as u8;
                let ip = val & (1 << regs::CLICINT_IP_BIT) != 0;
                match line.trigger() {
                    // Software may pend or un-pend edge lines directly.
                    Trigger::Edge => line.pending = ip,
                    Trigger::Level => {
                        // Resync with the input: a trigger rewrite must not
                        // leave a stale edge-latched pending bit behind.
                        line.pending = self.inputs[idx];
                        if ip != line.pending {
                            warn!(id = idx, "IP write ignored: level-sensitive pending tracks the input line");
                        }
                    }
                }
            }
            _ => trace!(offset, "write to unmapped CLIC offset ignored"),
        }
    }
}

impl Device for Clic {
    fn name(&self) -> &str {
        "CLIC"
    }

    fn address_range(&self) -> (u32, u32) {
        (self.base_addr, CLIC_REGION_SIZE)
    }

    fn read_u8(&mut self, offset: u32) -> u8 {
        (self.read_word(offset & !3) >> ((offset & 3) * 8)) as u8
    }

    fn read_u16(&mut self, offset: u32) -> u16 {
        // Half-word access is naturally aligned on this bus.
        debug_assert_eq!(offset & 1, 0);
        (self.read_word(offset & !3) >> ((offset & 2) * 8)) as u16
    }

    fn read_u32(&mut self, offset: u32) -> u32 {
        self.read_word(offset)
    }

    /// Sub-word stores read-modify-write the containing word, as the bus
    /// fabric presents byte enables to the register file.
    fn write_u8(&mut self, offset: u32, val: u8) {
        let aligned = offset & !3;
        let shift = (offset & 3) * 8;
        let word = (self.read_word(aligned) & !(0xFF << shift)) | ((val as u32) << shift);
        self.write_word(aligned, word);
    }

    fn write_u16(&mut self, offset: u32, val: u16) {
        // Half-word access is naturally aligned on this bus.
        debug_assert_eq!(offset & 1, 0);
        let aligned = offset & !3;
        let shift = (offset & 2) * 8;
        let word = (self.read_word(aligned) & !(0xFFFF << shift)) | ((val as u32) << shift);
        self.write_word(aligned, word);
    }

    fn write_u32(&mut self, offset: u32, val: u32) {
        self.write_word(offset, val);
    }

    /// Evaluates the latch; returns `true` while a request is presented.
    fn tick(&mut self) -> bool {
        self.pending_request().is_some()
    }
}
