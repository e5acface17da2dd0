//! tcm-wizard
//!
//! The assessment wizard: an ordered step registry, the gate that decides
//! when generic forward navigation is allowed, the controller that owns the
//! form record and the current index, and the step logic that turns user
//! actions and model replies into typed form patches.

pub mod boundary;
pub mod controller;
pub mod error;
pub mod gate;
pub mod registry;
pub mod results;
pub mod steps;
pub mod submission;
