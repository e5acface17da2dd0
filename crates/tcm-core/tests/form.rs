use tcm_core::error::CoreError;
use tcm_core::models::diagnosis::DiagnosisReport;
use tcm_core::models::form::{FormData, FormPatch};
use tcm_core::models::intake::{IntakePatch, Medicine, SymptomsInput};
use tcm_core::models::profile::{Gender, ProfilePatch};
use tcm_core::models::pulse::{PulsePatch, PulseQuality};

fn profile_patch() -> FormPatch {
    FormPatch::Profile(ProfilePatch {
        name: Some("Li Wei".to_string()),
        age: Some(" 42 ".to_string()),
        gender: Some(Gender::Female),
        ..Default::default()
    })
}

#[test]
fn applying_the_same_patch_twice_equals_applying_once() {
    let mut once = FormData::default();
    once.apply(profile_patch()).unwrap();

    let mut twice = FormData::default();
    twice.apply(profile_patch()).unwrap();
    twice.apply(profile_patch()).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn patch_preserves_unrelated_keys() {
    let mut form = FormData::default();
    form.apply(FormPatch::Intake(IntakePatch {
        main_concern: Some("headache".to_string()),
        ..Default::default()
    }))
    .unwrap();
    form.apply(profile_patch()).unwrap();
    form.apply(FormPatch::Profile(ProfilePatch {
        weight: Some("61.5".to_string()),
        ..Default::default()
    }))
    .unwrap();

    assert_eq!(form.intake.main_concern, "headache");
    assert_eq!(form.profile.name, "Li Wei");
    assert_eq!(form.profile.age, "42");
    assert_eq!(form.profile.weight, "61.5");
}

#[test]
fn invalid_age_is_rejected_and_leaves_form_unchanged() {
    let mut form = FormData::default();
    form.apply(profile_patch()).unwrap();
    let before = form.clone();

    let err = form
        .apply(FormPatch::Profile(ProfilePatch {
            name: Some("Someone Else".to_string()),
            age: Some("forty".to_string()),
            ..Default::default()
        }))
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidField { field: "age", .. }));
    assert_eq!(form, before);
}

#[test]
fn empty_numeric_fields_mean_not_provided() {
    let mut form = FormData::default();
    form.apply(FormPatch::Profile(ProfilePatch {
        age: Some("   ".to_string()),
        height: Some(String::new()),
        ..Default::default()
    }))
    .unwrap();
    assert_eq!(form.profile.age, "");
    assert_eq!(form.profile.height, "");
}

#[test]
fn symptoms_accept_joined_string_and_token_list() {
    let joined = SymptomsInput::Joined("fatigue, insomnia，, fatigue ,dry mouth".to_string());
    assert_eq!(
        joined.into_tokens(),
        vec!["fatigue", "insomnia", "dry mouth"]
    );

    let tokens = SymptomsInput::Tokens(vec![" cough ".to_string(), String::new()]);
    assert_eq!(tokens.into_tokens(), vec!["cough"]);
}

#[test]
fn json_patch_with_unknown_key_is_rejected() {
    let ok = FormPatch::from_json(r#"{"group":"intake","patch":{"main_concern":"cough"}}"#);
    assert!(ok.is_ok());

    let unknown_key =
        FormPatch::from_json(r#"{"group":"intake","patch":{"mainConcern":"cough"}}"#);
    assert!(unknown_key.is_err());

    let unknown_group = FormPatch::from_json(r#"{"group":"billing","patch":{}}"#);
    assert!(unknown_group.is_err());
}

#[test]
fn json_patch_accepts_legacy_joined_symptoms() {
    let patch =
        FormPatch::from_json(r#"{"group":"intake","patch":{"symptoms":"chills, sweating"}}"#)
            .unwrap();
    let mut form = FormData::default();
    form.apply(patch).unwrap();
    assert_eq!(form.intake.symptoms, vec!["chills", "sweating"]);
}

#[test]
fn conflicting_pulse_selection_is_rejected_at_merge() {
    let mut form = FormData::default();
    let err = form
        .apply(FormPatch::Pulse(PulsePatch {
            bpm: None,
            qualities: Some(vec![PulseQuality::Xi, PulseQuality::Hong]),
        }))
        .unwrap_err();
    assert!(matches!(err, CoreError::ConflictingPulse(_, _)));
    assert!(form.pulse.qualities.is_empty());
}

#[test]
fn bpm_is_parsed_and_can_be_cleared() {
    let mut form = FormData::default();
    form.apply(FormPatch::Pulse(PulsePatch {
        bpm: Some("72".to_string()),
        qualities: None,
    }))
    .unwrap();
    assert_eq!(form.pulse.bpm, Some(72));

    form.apply(FormPatch::Pulse(PulsePatch {
        bpm: Some(String::new()),
        qualities: None,
    }))
    .unwrap();
    assert_eq!(form.pulse.bpm, None);

    assert!(
        form.apply(FormPatch::Pulse(PulsePatch {
            bpm: Some("900".to_string()),
            qualities: None,
        }))
        .is_err()
    );
}

#[test]
fn medicines_require_a_name() {
    let mut form = FormData::default();
    let err = form
        .apply(FormPatch::Medicines(vec![Medicine::text("  ", None)]))
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidField { field: "medicines", .. }));

    form.apply(FormPatch::Medicines(vec![Medicine::text(
        "Liu Wei Di Huang Wan",
        Some("8 pills twice daily".to_string()),
    )]))
    .unwrap();
    assert_eq!(form.intake.medicines.len(), 1);
}

#[test]
fn changed_answers_drop_the_stored_diagnosis() {
    let concern = |text: &str| {
        FormPatch::Intake(IntakePatch {
            main_concern: Some(text.to_string()),
            ..Default::default()
        })
    };
    let mut form = FormData::default();
    form.apply(concern("headache")).unwrap();
    form.apply(FormPatch::Diagnosis(DiagnosisReport {
        syndrome: "Liver yang rising".to_string(),
        ..Default::default()
    }))
    .unwrap();

    // Re-sending the same answer is not a change.
    form.apply(concern("headache")).unwrap();
    assert!(form.diagnosis.is_some());

    form.apply(concern("insomnia")).unwrap();
    assert!(form.diagnosis.is_none());
}
