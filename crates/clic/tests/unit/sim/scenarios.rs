//! End-to-end interrupt scenarios through the simulator.

use clic_core::clic::regs;
use clic_core::device::Device;
use pretty_assertions::assert_eq;

use crate::common::{LineSetup, TestContext, isr};

// ══════════════════════════════════════════════════════════
// 1. MMIO routing
// ══════════════════════════════════════════════════════════

#[test]
fn absolute_addresses_route_to_the_controller() {
    let mut ctx = TestContext::new();
    let base = 0x1A20_0000;
    let word = LineSetup::edge(0x77).word();

    ctx.sim.mmio_write_u32(base + regs::clicint_offset(6), word);
    assert_eq!(ctx.sim.mmio_read_u32(base + regs::clicint_offset(6)), word);
    assert_eq!(ctx.sim.clic.line(6).unwrap().ctl, 0x77);
}

#[test]
fn unmapped_addresses_read_zero_and_drop_writes() {
    let mut ctx = TestContext::new();
    ctx.sim.mmio_write_u32(0x0400_0000, 0xFFFF_FFFF);
    assert_eq!(ctx.sim.mmio_read_u32(0x0400_0000), 0);
    // One past the end of the 64 KiB region.
    assert_eq!(ctx.sim.mmio_read_u32(0x1A21_0000), 0);
}

#[test]
fn run_counts_taken_interrupts() {
    let mut config = clic_core::Config::default();
    config.sim.poll_window = 20;
    let mut ctx = TestContext::with_config(&config);
    ctx.set_nlbits(8);
    for id in [3, 4, 5] {
        ctx.hook(id);
        ctx.configure(id, &LineSetup::edge(0x10 + id as u8));
    }

    assert_eq!(ctx.sim.run(), Ok(3));
    assert_eq!(ctx.fired(), vec![5, 4, 3]);
}

// ══════════════════════════════════════════════════════════
// 2. Five-interrupt priority scenario
// ══════════════════════════════════════════════════════════

/// A preemption/tail-chain stress scenario under `nlbits = 4`:
///
/// | name | irq | mode | ctl  | effective level | pended by            |
/// |------|-----|------|------|-----------------|----------------------|
/// | OIC  | 27  | SHV  | 0x33 | 0x3f            | software, up front   |
/// | I    | 28  | —    | 0x55 | 0x5f            | OIC's handler        |
/// | II   | 29  | —    | 0x66 | 0x6f            | I's handler          |
/// | III  | 30  | —    | 0x44 | 0x4f            | I's handler          |
/// | IV   | 31  | SHV  | 0x66 | 0x6f            | I's handler, late    |
/// | V    | 26  | —    | 0x33 | 0x3f            | I's handler          |
///
/// Expected flow: OIC is preempted by I; II preempts I through its poll
/// window; III cannot preempt I (lower level) but tail-chains off I's shared
/// entry because it beats I's mpil (0x3f); IV preempts I as a vectored trap;
/// V ties with the interrupted OIC context at 0x3f, so it neither preempts
/// nor chains and only runs once the machine is back at level zero.
#[test]
fn five_interrupts_interleave_in_priority_order() {
    let mut ctx = TestContext::new();
    ctx.set_nlbits(4);
    ctx.enable_mnxti();

    // Everything enabled up front, pended as the scenario unfolds.
    ctx.configure(26, &LineSetup::edge(0x33).with_pend(false));
    ctx.configure(29, &LineSetup::edge(0x66).with_pend(false));
    ctx.configure(30, &LineSetup::edge(0x44).with_pend(false));
    ctx.configure(31, &LineSetup::shv(0x66).with_pend(false));

    ctx.hook(29);
    ctx.hook(30);
    ctx.hook(26);

    let fired = ctx.recorder();
    ctx.sim
        .install(
            27,
            isr(move |frame| {
                fired.borrow_mut().push(27);
                frame
                    .clic_mut()
                    .write_u32(regs::clicint_offset(28), LineSetup::edge(0x55).word());
                // I outranks OIC and preempts right here.
                assert_eq!(frame.poll(), Ok(true));
            }),
        )
        .unwrap();

    let fired = ctx.recorder();
    ctx.sim
        .install(
            28,
            isr(move |frame| {
                fired.borrow_mut().push(28);
                for (id, setup) in [
                    (29, LineSetup::edge(0x66)),
                    (30, LineSetup::edge(0x44)),
                    (26, LineSetup::edge(0x33)),
                ] {
                    frame.clic_mut().write_u32(regs::clicint_offset(id), setup.word());
                }
                // Only II outranks I; III and V wait.
                assert_eq!(frame.poll(), Ok(true));

                frame
                    .clic_mut()
                    .write_u32(regs::clicint_offset(31), LineSetup::shv(0x66).word());
                assert_eq!(frame.poll(), Ok(true));
                // Nothing left that outranks I.
                assert_eq!(frame.poll(), Ok(false));
            }),
        )
        .unwrap();

    ctx.hook(31);
    ctx.configure(27, &LineSetup::shv(0x33));

    // Step 1: OIC and everything that preempts or chains off its cascade.
    // III (0x4f) beats I's mpil (0x3f) and tail-chains after I's body; V
    // (0x3f) does not and stays pending.
    assert_eq!(ctx.sim.step(), Ok(true));
    assert_eq!(ctx.fired(), vec![27, 28, 29, 31, 30]);

    // Step 2: back at level zero, V finally runs.
    assert_eq!(ctx.sim.step(), Ok(true));
    assert_eq!(ctx.fired(), vec![27, 28, 29, 31, 30, 26]);

    assert_eq!(ctx.sim.step(), Ok(false));
    assert_eq!(ctx.mintstatus(), 0);
}
