//! The medication list on `upload_medicine`.

use tcm_core::models::form::{FormData, FormPatch};
use tcm_core::models::intake::Medicine;
use tcm_core::models::media::MediaRef;
use uuid::Uuid;

pub fn add_text(form: &FormData, name: &str, content: Option<&str>) -> FormPatch {
    let content = content
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    with(form, Medicine::text(name.trim(), content))
}

/// A photographed package or prescription. Named after the file when the
/// user gives no name.
pub fn add_image(form: &FormData, media: &MediaRef, name: Option<&str>) -> FormPatch {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| media.file_name().unwrap_or("photo").to_string());
    with(
        form,
        Medicine::image(name, media.uri.clone(), media.base64.clone()),
    )
}

pub fn remove(form: &FormData, id: Uuid) -> FormPatch {
    FormPatch::Medicines(
        form.intake
            .medicines
            .iter()
            .filter(|m| m.id != id)
            .cloned()
            .collect(),
    )
}

fn with(form: &FormData, medicine: Medicine) -> FormPatch {
    let mut medicines = form.intake.medicines.clone();
    medicines.push(medicine);
    FormPatch::Medicines(medicines)
}
