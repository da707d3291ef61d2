//! Device trait for memory-mapped I/O.
//!
//! This module defines the `Device` trait implemented by bus-attached components.
//! It provides:
//! 1. **Identification:** `name` and `address_range` for address routing.
//! 2. **Access:** Byte, half-word, and word read/write at device-relative offsets.
//! 3. **Lifecycle:** An optional `tick` for components that evaluate state over time.
//!
//! The platform modeled here is 32-bit, so word access is the widest transfer.

/// Trait for memory-mapped I/O devices.
///
/// Devices provide a name, an address range, and read/write methods at
/// device-relative offsets. Sub-word accesses are expected to behave as
/// read-modify-write on the containing 32-bit word, matching how the bus
/// fabric presents byte enables to register files.
pub trait Device {
    /// Returns a short name for this device (e.g., `"CLIC"`).
    fn name(&self) -> &str;
    /// Returns (base_address, size_in_bytes) for this device's MMIO region.
    fn address_range(&self) -> (u32, u32);
    /// Reads one byte at the given device-relative offset.
    fn read_u8(&mut self, offset: u32) -> u8;
    /// Reads two bytes (little-endian) at the given offset.
    fn read_u16(&mut self, offset: u32) -> u16;
    /// Reads four bytes (little-endian) at the given offset.
    fn read_u32(&mut self, offset: u32) -> u32;
    /// Writes one byte at the given offset.
    fn write_u8(&mut self, offset: u32, val: u8);
    /// Writes two bytes (little-endian) at the given offset.
    fn write_u16(&mut self, offset: u32, val: u16);
    /// Writes four bytes (little-endian) at the given offset.
    fn write_u32(&mut self, offset: u32, val: u32);

    /// Advances device state; returns `true` if the device is requesting
    /// service (e.g., an interrupt candidate exists).
    fn tick(&mut self) -> bool {
        false
    }
}
