pub mod diagnosis;
pub mod doctor;
pub mod form;
pub mod inquiry;
pub mod intake;
pub mod media;
pub mod modality;
pub mod profile;
pub mod pulse;
pub mod report;
