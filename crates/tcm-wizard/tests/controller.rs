mod common;

use std::sync::atomic::Ordering;

use common::{photo, wizard};
use tcm_core::i18n::Language;
use tcm_core::models::form::FormPatch;
use tcm_core::models::intake::{IntakePatch, Medicine};
use tcm_core::models::media::UploadedFile;
use tcm_core::models::modality::{ModalityResult, TongueAnalysis};
use tcm_core::models::profile::{Gender, ProfilePatch};
use tcm_core::models::pulse::{PulsePatch, PulseQuality};
use tcm_wizard::boundary::{StepFault, guard};
use tcm_wizard::controller::{Confirmation, Confirmed, Direction, ExitTarget, StepView, Wizard};
use tcm_wizard::error::WizardError;
use tcm_wizard::registry::StepId;

fn fill_basic_info(wizard: &mut Wizard) {
    let token = wizard.step_token();
    wizard
        .apply(
            token,
            FormPatch::Profile(ProfilePatch {
                name: Some("Mei".to_string()),
                age: Some("34".to_string()),
                gender: Some(Gender::Female),
                ..Default::default()
            }),
        )
        .unwrap();
}

/// Walk forward using whatever each step needs to advance.
fn advance(wizard: &mut Wizard) {
    match wizard.current_step() {
        Some(StepId::BasicInfo) => fill_basic_info(wizard),
        Some(StepId::Symptoms) => {
            let token = wizard.step_token();
            wizard
                .apply(
                    token,
                    FormPatch::Intake(IntakePatch {
                        main_concern: Some("Insomnia".to_string()),
                        ..Default::default()
                    }),
                )
                .unwrap();
        }
        Some(StepId::Analysis) => {
            let token = wizard.step_token();
            wizard.complete_step(token).unwrap();
            return;
        }
        _ => {}
    }
    wizard.go_to_next();
}

#[test]
fn index_stays_in_bounds_under_any_navigation() {
    let (mut wizard, _) = wizard(true);
    fill_basic_info(&mut wizard);

    // Deterministic pseudo-random walk.
    let mut seed: u32 = 0x2545_f491;
    for _ in 0..2_000 {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        if seed % 3 == 0 {
            wizard.go_to_previous();
        } else {
            advance(&mut wizard);
        }
        assert!(wizard.current_index() <= wizard.len());
    }

    while !wizard.is_finished() {
        advance(&mut wizard);
    }
    assert_eq!(wizard.current_index(), wizard.len());
    assert!(wizard.go_to_next().is_none());
    assert_eq!(wizard.current_index(), wizard.len());

    while wizard.go_to_previous().is_some() {}
    assert_eq!(wizard.current_index(), 0);
    assert!(wizard.go_to_previous().is_none());
}

#[test]
fn next_is_gated_and_reports_direction() {
    let (mut wizard, _) = wizard(false);
    assert!(wizard.go_to_next().is_none());
    assert_eq!(wizard.current_index(), 0);

    fill_basic_info(&mut wizard);
    let forward = wizard.go_to_next().unwrap();
    assert_eq!((forward.from, forward.to), (0, 1));
    assert_eq!(forward.direction, Direction::Forward);
    assert_eq!(wizard.current_step(), Some(StepId::Symptoms));

    // Symptoms is gated on the main concern.
    assert!(wizard.go_to_next().is_none());

    let back = wizard.go_to_previous().unwrap();
    assert_eq!(back.direction, Direction::Backward);
    assert_eq!(back.to, 0);
}

#[test]
fn only_self_advancing_steps_get_callbacks() {
    let (mut wizard, _) = wizard(true);
    let StepView::Step { descriptor, props } = wizard.render_step() else {
        panic!("expected a step");
    };
    assert_eq!(descriptor.id, StepId::BasicInfo);
    assert!(props.on_next.is_none() && props.on_back.is_none());
    assert!(!props.can_proceed);

    fill_basic_info(&mut wizard);
    wizard.go_to_next();
    let StepView::Step { descriptor, props } = wizard.render_step() else {
        panic!("expected a step");
    };
    assert_eq!(descriptor.id, StepId::ProfileSummary);
    let on_next = props.on_next.expect("profile_summary advances itself");
    assert!(props.on_back.is_some());

    wizard.complete_step(on_next).unwrap();
    assert_eq!(wizard.current_step(), Some(StepId::Symptoms));
}

#[test]
fn generic_next_cannot_skip_the_analysis() {
    let (mut wizard, _) = wizard(false);
    while wizard.current_step() != Some(StepId::Analysis) {
        let token = wizard.step_token();
        wizard.complete_step(token).unwrap();
    }
    assert!(wizard.go_to_next().is_none());
    assert_eq!(wizard.current_step(), Some(StepId::Analysis));
    assert!(wizard.submission().is_none());
}

#[test]
fn complete_step_bypasses_the_gate() {
    let (mut wizard, _) = wizard(false);
    let token = wizard.step_token();
    let transition = wizard.complete_step(token).unwrap();
    assert_eq!(transition.to, 1);
}

#[test]
fn stale_tokens_cannot_patch_another_step() {
    let (mut wizard, _) = wizard(false);
    fill_basic_info(&mut wizard);
    let basic_info_token = wizard.step_token();
    wizard.go_to_next();

    let late = FormPatch::Profile(ProfilePatch {
        name: Some("Someone else".to_string()),
        ..Default::default()
    });
    let err = wizard.apply(basic_info_token, late).unwrap_err();
    assert!(matches!(err, WizardError::StaleToken { .. }));
    assert_eq!(wizard.form().profile.name, "Mei");

    // Coming back to the same index is a new mount: the old token stays dead.
    wizard.go_to_previous();
    assert_eq!(wizard.current_index(), basic_info_token.step);
    assert!(wizard.complete_step(basic_info_token).is_err());
}

#[test]
fn rejected_patch_leaves_form_unchanged() {
    let (mut wizard, _) = wizard(false);
    fill_basic_info(&mut wizard);
    let before = wizard.form().clone();

    let token = wizard.step_token();
    let err = wizard
        .apply(
            token,
            FormPatch::Profile(ProfilePatch {
                name: Some("Changed".to_string()),
                age: Some("abc".to_string()),
                ..Default::default()
            }),
        )
        .unwrap_err();
    assert!(matches!(err, WizardError::Rejected(_)));
    assert_eq!(wizard.form(), &before);
}

#[test]
fn same_patch_twice_equals_once() {
    let (mut wizard, _) = wizard(false);
    let patch = FormPatch::Profile(ProfilePatch {
        name: Some("Mei".to_string()),
        height: Some(" 165 ".to_string()),
        ..Default::default()
    });
    let token = wizard.step_token();
    wizard.apply(token, patch.clone()).unwrap();
    let once = wizard.form().clone();
    wizard.apply(token, patch).unwrap();
    assert_eq!(wizard.form(), &once);
}

#[test]
fn exit_requires_confirmation_and_picks_the_handler() {
    let (mut wizard, exit) = wizard(true);
    wizard.request_exit();
    assert_eq!(wizard.pending_confirmation(), Some(Confirmation::Exit));
    wizard.cancel();
    assert!(wizard.pending_confirmation().is_none());
    assert_eq!(exit.dashboard.load(Ordering::SeqCst), 0);

    wizard.request_exit();
    assert_eq!(wizard.confirm().unwrap(), Confirmed::Exited(ExitTarget::Dashboard));
    assert_eq!(exit.dashboard.load(Ordering::SeqCst), 1);
    assert!(matches!(wizard.confirm(), Err(WizardError::NoPendingConfirmation)));

    let (mut guest, exit) = common::wizard(false);
    guest.request_exit();
    assert_eq!(guest.confirm().unwrap(), Confirmed::Exited(ExitTarget::Login));
    assert_eq!(exit.login.load(Ordering::SeqCst), 1);
    assert_eq!(exit.dashboard.load(Ordering::SeqCst), 0);
}

#[test]
fn confirmation_prompts_are_localized() {
    let (title, _) = Confirmation::NewAssessment.prompt(Language::Zh);
    assert_eq!(title, "开始新的评估？");
    let (title, body) = Confirmation::Exit.prompt(Language::En);
    assert_eq!(title, "Leave assessment?");
    assert!(!body.is_empty());
}

#[test]
fn new_assessment_clears_every_modality_and_returns_to_start() {
    let (mut wizard, _) = wizard(false);
    fill_basic_info(&mut wizard);
    let token = wizard.step_token();
    let patches = vec![
        FormPatch::Tongue(Some(ModalityResult {
            media: photo("tongue.jpg"),
            analysis: TongueAnalysis {
                is_valid_image: true,
                ..Default::default()
            },
            analyzed_at: jiff::Timestamp::now(),
        })),
        FormPatch::Pulse(PulsePatch {
            bpm: Some("70".to_string()),
            qualities: Some(vec![PulseQuality::Hua]),
        }),
        FormPatch::Medicines(vec![Medicine::text("Licorice", None)]),
        FormPatch::Files(vec![UploadedFile {
            id: uuid::Uuid::new_v4(),
            uri: "file:///lab.pdf".to_string(),
            name: "lab.pdf".to_string(),
            extracted_text: "ALT 30".to_string(),
        }]),
        FormPatch::SmartConnect(Some(tcm_core::models::modality::SmartConnectData {
            service: "health".to_string(),
            device: None,
            synced_data: serde_json::json!({"steps": 8000}),
        })),
    ];
    for patch in patches {
        wizard.apply(token, patch).unwrap();
    }
    wizard.go_to_next();
    wizard.go_to_next();

    wizard.request_new_assessment();
    assert_eq!(wizard.current_index(), 1, "nothing happens before confirming");
    assert_eq!(wizard.confirm().unwrap(), Confirmed::Reset);

    let form = wizard.form();
    assert_eq!(wizard.current_index(), 0);
    assert!(form.tongue.is_none() && form.face.is_none() && form.voice.is_none());
    assert!(form.pulse.bpm.is_none());
    assert!(form.pulse.qualities.is_empty());
    assert!(form.smart_connect.is_none());
    assert!(form.intake.medicines.is_empty());
    assert!(form.files.is_empty());
    assert!(form.profile.name.is_empty());
}

#[test]
fn fault_boundary_retries_or_goes_back() {
    let (mut wizard, _) = wizard(false);
    fill_basic_info(&mut wizard);
    wizard.go_to_next();
    let before = wizard.render_step();
    let StepView::Step { props: before, .. } = before else {
        panic!("expected a step");
    };

    wizard.report_fault(StepFault {
        step: StepId::Symptoms,
        message: "boom".to_string(),
        retryable: true,
    });
    assert!(matches!(wizard.render_step(), StepView::Fault(f) if f.message == "boom"));
    assert!(wizard.apply(before.token, FormPatch::Medicines(Vec::new())).is_err());

    wizard.retry_step();
    let StepView::Step { descriptor, props } = wizard.render_step() else {
        panic!("expected the step after retry");
    };
    assert_eq!(descriptor.id, StepId::Symptoms);
    assert_ne!(props.remount_key, before.remount_key);

    wizard.report_fault(StepFault {
        step: StepId::Symptoms,
        message: "again".to_string(),
        retryable: true,
    });
    let back = wizard.fault_go_back().unwrap();
    assert_eq!(back.to, 0);
    assert!(wizard.fault().is_none());
}

#[tokio::test]
async fn panicking_step_work_becomes_a_fault() {
    let frames: Vec<u8> = Vec::new();
    let fault = guard(StepId::Tongue, Language::En, async {
        let byte = frames[3];
        assert_eq!(byte, 0);
    })
    .await
    .unwrap_err();
    assert_eq!(fault.step, StepId::Tongue);
    assert_eq!(fault.message, "Something went wrong on this step.");

    let ok = guard(StepId::Tongue, Language::En, async { 7 }).await;
    assert_eq!(ok.unwrap(), 7);
}

#[test]
fn login_change_keeps_the_current_step() {
    let (mut wizard, _) = wizard(false);
    fill_basic_info(&mut wizard);
    wizard.go_to_next();
    assert_eq!(wizard.current_step(), Some(StepId::Symptoms));

    wizard.set_logged_in(true);
    assert_eq!(wizard.len(), 14);
    assert_eq!(wizard.current_step(), Some(StepId::Symptoms));
    assert_eq!(wizard.current_index(), 2);

    // profile_summary disappears under the user's feet: clamp.
    wizard.go_to_previous();
    assert_eq!(wizard.current_step(), Some(StepId::ProfileSummary));
    wizard.set_logged_in(false);
    assert!(wizard.current_index() <= wizard.len());
    assert_eq!(wizard.current_step(), Some(StepId::Symptoms));

    wizard.set_language(Language::Zh);
    let StepView::Step { descriptor, .. } = wizard.render_step() else {
        panic!("expected a step");
    };
    assert_eq!(descriptor.label, "症状");
}

#[test]
fn finished_wizard_stays_finished_across_registry_changes() {
    let (mut wizard, _) = wizard(true);
    while !wizard.is_finished() {
        advance(&mut wizard);
    }
    wizard.set_logged_in(false);
    assert!(wizard.is_finished());
    assert_eq!(wizard.current_index(), 13);
    assert!(matches!(wizard.render_step(), StepView::Results(_)));
}
