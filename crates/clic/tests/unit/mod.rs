//! # Unit Components
//!
//! This module is the hub for the model's unit tests, organized to mirror the
//! crate's module tree.




/// End-to-end scenarios through the `Simulator` facade.
pub mod sim;
