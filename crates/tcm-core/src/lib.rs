//! tcm-core
//!
//! Pure domain types for the assessment wizard: the typed form record and
//! its patches, the pulse catalog, doctor tiers, translations and the
//! persisted report shape. No AWS dependency; this is the shared
//! vocabulary of the TCM advisor system.

pub mod error;
pub mod i18n;
pub mod models;
pub mod s3_keys;
