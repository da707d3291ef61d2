//! Simulator-level tests: MMIO routing and full interrupt scenarios.

pub mod scenarios;
