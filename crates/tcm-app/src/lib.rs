//! tcm-app library root.
//!
//! Re-exports the host modules so integration tests can drive the console
//! and the config layer without going through the binary.

pub mod aws;
pub mod capture;
pub mod config;
pub mod console;
