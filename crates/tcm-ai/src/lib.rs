//! tcm-ai
//!
//! Completion-provider seam, Bedrock implementation, and parsing of the
//! model's free-text answers into the wizard's typed results.

pub mod analysis;
pub mod bedrock;
pub mod context;
pub mod error;
pub mod inquiry;
pub mod json;
pub mod prompts;
pub mod provider;
pub mod report;
pub mod suggestions;
