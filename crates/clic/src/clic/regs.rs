//! CLIC register map and per-line control word layout.
//!
//! The controller occupies a 64 KiB region. Global configuration sits at the
//! bottom; the per-line `clicint` words start at `0x1000`, one 32-bit word per
//! interrupt line:
//!
//! | bits  | field     |                                             |
//! |-------|-----------|---------------------------------------------|
//! | 0     | IP        | pending                                     |
//! | 8     | IE        | enable                                      |
//! | 16    | ATTR.SHV  | selective hardware vectoring                |
//! | 18:17 | ATTR.TRIG | trigger: bit 17 edge, bit 18 polarity       |
//! | 31:24 | CTL       | 8-bit level + priority (split by `nlbits`)  |

/// Offset of the global configuration register (`cliccfg`).
pub const CLICCFG_OFFSET: u32 = 0x0;
/// Width of the `nlbits` field in `cliccfg` (bits 3:0).
pub const CLICCFG_NLBITS_MASK: u32 = 0xF;

/// Offset of the mnxti extension enable register (platform-specific).
pub const MNXTICONF_OFFSET: u32 = 0x8;
/// Enable bit in the mnxti configuration register.
pub const MNXTICONF_EN_BIT: u32 = 0;

/// Base offset of the per-line `clicint` register bank.
pub const CLICINT_BASE: u32 = 0x1000;
/// Stride between consecutive `clicint` words.
pub const CLICINT_STRIDE: u32 = 4;

/// Pending bit position in a `clicint` word.
pub const CLICINT_IP_BIT: u32 = 0;
/// Enable bit position in a `clicint` word.
pub const CLICINT_IE_BIT: u32 = 8;
/// Selective hardware vectoring bit position.
pub const CLICINT_ATTR_SHV_BIT: u32 = 16;
/// Trigger field position (2 bits).
pub const CLICINT_ATTR_TRIG_OFFSET: u32 = 17;
/// Trigger field mask (pre-shift).
pub const CLICINT_ATTR_TRIG_MASK: u32 = 0x3;
/// Level/priority control field position (8 bits).
pub const CLICINT_CTL_OFFSET: u32 = 24;
/// Level/priority control field mask (pre-shift).
pub const CLICINT_CTL_MASK: u32 = 0xFF;

/// Returns the device-relative offset of line `id`'s `clicint` word.
pub const fn clicint_offset(id: u32) -> u32 {
    CLICINT_BASE + id * CLICINT_STRIDE
}

/// Trigger sensitivity of an interrupt line.
///
/// Only the edge/level distinction affects dispatch semantics; the polarity
/// bit is stored and read back but the model treats all hardware lines as
/// active-high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trigger {
    /// Pending tracks the hardware line; stays pending while asserted.
    #[default]
    Level,
    /// Pending latches on a rising edge (or a software IP write) and clears
    /// atomically when the interrupt is accepted.
    Edge,
}

impl Trigger {
    /// Decodes the 2-bit `ATTR.TRIG` field (bit 0 selects edge sensitivity).
    pub const fn from_attr(raw: u32) -> Self {
        if raw & 0x1 != 0 { Self::Edge } else { Self::Level }
    }
}

/// Architectural state of one interrupt line.
///
/// Mirrors the fields of a `clicint` word plus the raw trigger bits so that
/// reads return exactly what was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntLine {
    /// Pending (IP).
    pub pending: bool,
    /// Enabled (IE).
    pub enabled: bool,
    /// Selective hardware vectoring (ATTR.SHV).
    pub shv: bool,
    /// Raw 2-bit trigger field (ATTR.TRIG).
    pub trig: u8,
    /// Raw 8-bit level/priority control value (CTL).
    pub ctl: u8,
}

impl IntLine {
    /// Trigger sensitivity decoded from the raw attribute bits.
    pub const fn trigger(&self) -> Trigger {
        Trigger::from_attr(self.trig as u32)
    }

    /// Effective 8-bit interrupt level under the given `nlbits` split.
    ///
    /// The upper `nlbits` bits of CTL encode the level; bits not covered by
    /// the split read as ones (CLIC convention), so `nlbits == 0` makes every
    /// line level `0xff`.
    pub const fn level(&self, nlbits: u8) -> u8 {
        let ones = low_ones(nlbits);
        self.ctl | ones
    }

    /// Tie-break priority under the given `nlbits` split: the CTL bits below
    /// the level field. Compared only between lines of equal level.
    pub const fn priority(&self, nlbits: u8) -> u8 {
        self.ctl & low_ones(nlbits)
    }

    /// Packs the line back into its `clicint` word encoding.
    pub const fn to_word(self) -> u32 {
        (self.pending as u32) << CLICINT_IP_BIT
            | (self.enabled as u32) << CLICINT_IE_BIT
            | (self.shv as u32) << CLICINT_ATTR_SHV_BIT
            | ((self.trig as u32) & CLICINT_ATTR_TRIG_MASK) << CLICINT_ATTR_TRIG_OFFSET
            | ((self.ctl as u32) & CLICINT_CTL_MASK) << CLICINT_CTL_OFFSET
    }
}

/// Mask of the low `8 - nlbits` bits of an 8-bit CTL value.
const fn low_ones(nlbits: u8) -> u8 {
    if nlbits >= 8 { 0 } else { 0xFF >> nlbits }
}
