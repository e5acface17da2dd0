//! Step logic. Each module turns user actions (and model replies) into
//! [`FormPatch`](tcm_core::models::form::FormPatch) values for the
//! controller to apply.

pub mod capture;
pub mod doctor;
pub mod inquiry;
pub mod medicines;
pub mod modality;
pub mod pulse;
pub mod report;
