//! Patient context builder.
//!
//! Assembles what the wizard has collected so far into a structured block
//! that is appended to system prompts, so the model sees the demographics,
//! complaint, uploaded documents and medication list.

use tcm_core::models::form::FormData;
use tcm_core::models::media::UploadedFile;
use tcm_core::models::profile::Gender;

/// Build the `<patient>` block. Fields not yet provided are omitted.
pub fn build_patient_context(form: &FormData) -> String {
    let mut block = String::from("<patient>\n");

    let profile = &form.profile;
    push_line(&mut block, "name", &profile.name);
    push_line(&mut block, "age", &profile.age);
    if let Some(gender) = profile.gender {
        let gender = match gender {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        };
        push_line(&mut block, "gender", gender);
    }
    if !profile.height.is_empty() {
        push_line(&mut block, "height_cm", &profile.height);
    }
    if !profile.weight.is_empty() {
        push_line(&mut block, "weight_kg", &profile.weight);
    }

    let intake = &form.intake;
    push_line(&mut block, "main_concern", &intake.main_concern);
    push_line(&mut block, "symptoms", &intake.symptoms_joined());
    if let Some(duration) = intake.symptom_duration {
        let duration = serde_json::to_value(duration)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        push_line(&mut block, "duration", &duration);
    }

    if !intake.medicines.is_empty() {
        block.push_str("<medicines>\n");
        for medicine in &intake.medicines {
            block.push_str("- ");
            block.push_str(&medicine.describe());
            block.push('\n');
        }
        block.push_str("</medicines>\n");
    }

    block.push_str(&build_files_block(&form.files));
    block.push_str("</patient>");
    block
}

/// Wrap extracted document text. Empty when nothing was uploaded.
pub fn build_files_block(files: &[UploadedFile]) -> String {
    let files: Vec<_> = files
        .iter()
        .filter(|f| !f.extracted_text.trim().is_empty())
        .collect();
    if files.is_empty() {
        return String::new();
    }

    let mut block = String::from("<reports>\n");
    for file in files {
        block.push_str(&format!("<file name=\"{}\">\n", file.name));
        block.push_str(&file.extracted_text);
        if !file.extracted_text.ends_with('\n') {
            block.push('\n');
        }
        block.push_str("</file>\n");
    }
    block.push_str("</reports>\n");
    block
}

/// Everything the final analysis needs: patient block plus the modality
/// findings and the consultation.
pub fn build_assessment_context(form: &FormData) -> String {
    let mut block = build_patient_context(form);
    block.push_str("\n<findings>\n");

    if let Some(tongue) = &form.tongue {
        push_json(&mut block, "tongue", &tongue.analysis);
    }
    if let Some(face) = &form.face {
        push_json(&mut block, "face", &face.analysis);
    }
    if let Some(voice) = &form.voice {
        push_json(&mut block, "voice", &voice.analysis);
    }
    if let Some(bpm) = form.pulse.bpm {
        push_line(&mut block, "pulse_bpm", &bpm.to_string());
    }
    if !form.pulse.qualities.is_empty() {
        let qualities = form
            .pulse
            .qualities
            .iter()
            .map(|q| format!("{} ({})", q.name_en(), q.name_zh()))
            .collect::<Vec<_>>()
            .join(", ");
        push_line(&mut block, "pulse_qualities", &qualities);
    }
    if let Some(device) = &form.smart_connect {
        push_json(&mut block, "device_data", device);
    }
    block.push_str("</findings>\n");

    let consultation = if form.inquiry.summary.trim().is_empty() {
        &form.inquiry.transcript
    } else {
        &form.inquiry.summary
    };
    if !consultation.trim().is_empty() {
        block.push_str("<consultation>\n");
        block.push_str(consultation.trim());
        block.push_str("\n</consultation>");
    }
    block
}

fn push_line(block: &mut String, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    block.push_str(label);
    block.push_str(": ");
    block.push_str(value);
    block.push('\n');
}

fn push_json<T: serde::Serialize>(block: &mut String, label: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        push_line(block, label, &json);
    }
}
