//! tcm-storage
//!
//! Where finished assessments go: the media and report store seams, the
//! session seam that says who (if anyone) is logged in, and an S3-backed
//! implementation of both stores.

pub mod error;
pub mod s3;
pub mod session;
pub mod store;
