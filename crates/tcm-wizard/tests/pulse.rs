use std::time::Duration;

use tcm_core::i18n::Language;
use tcm_core::models::form::FormData;
use tcm_core::models::pulse::PulseQuality;
use tcm_wizard::steps::pulse::{
    MEASURE_SECONDS, PulseConflict, PulseCountdown, PulseSelection, bpm_from_taps, bpm_patch,
};

#[test]
fn hong_after_xi_is_rejected_and_selection_unchanged() {
    let mut selection = PulseSelection::default();
    selection.toggle(PulseQuality::Xi).unwrap();

    let err = selection.toggle(PulseQuality::Hong).unwrap_err();
    assert_eq!(
        err,
        PulseConflict {
            selected: PulseQuality::Hong,
            existing: PulseQuality::Xi,
        }
    );
    assert_eq!(selection.selected(), &[PulseQuality::Xi]);
}

#[test]
fn hua_after_xi_is_accepted() {
    let mut selection = PulseSelection::default();
    selection.toggle(PulseQuality::Xi).unwrap();
    selection.toggle(PulseQuality::Hua).unwrap();
    assert_eq!(selection.selected(), &[PulseQuality::Xi, PulseQuality::Hua]);
}

#[test]
fn deselecting_is_unconditional() {
    let mut selection = PulseSelection::default();
    selection.toggle(PulseQuality::Fu).unwrap();
    selection.toggle(PulseQuality::Fu).unwrap();
    assert!(selection.selected().is_empty());

    // With fu gone, chen no longer conflicts.
    selection.toggle(PulseQuality::Chen).unwrap();
    assert!(selection.contains(PulseQuality::Chen));
}

#[test]
fn conflict_message_names_both_qualities() {
    let conflict = PulseConflict {
        selected: PulseQuality::Hong,
        existing: PulseQuality::Xi,
    };
    assert_eq!(
        conflict.message(Language::En),
        "Surging conflicts with Thin. Deselect Thin first."
    );
    let zh = conflict.message(Language::Zh);
    assert!(zh.contains(PulseQuality::Hong.name_zh()));
    assert!(zh.contains(PulseQuality::Xi.name_zh()));
}

#[test]
fn selection_round_trips_through_the_form() {
    let mut selection = PulseSelection::default();
    selection.toggle(PulseQuality::Xian).unwrap();
    selection.toggle(PulseQuality::Shuo).unwrap();

    let mut form = FormData::default();
    form.apply(selection.patch()).unwrap();
    form.apply(bpm_patch(" 88 ")).unwrap();
    assert_eq!(form.pulse.bpm, Some(88));
    assert_eq!(PulseSelection::from_form(&form), selection);

    form.apply(bpm_patch("")).unwrap();
    assert_eq!(form.pulse.bpm, None);
    assert_eq!(form.pulse.qualities.len(), 2);
}

#[test]
fn bpm_scales_taps_to_a_minute() {
    assert_eq!(bpm_from_taps(18, MEASURE_SECONDS), 72);
    assert_eq!(bpm_from_taps(0, MEASURE_SECONDS), 0);
    assert_eq!(bpm_from_taps(30, 30), 60);
    assert_eq!(bpm_from_taps(10, 0), 0);
}

#[tokio::test(start_paused = true)]
async fn countdown_measures_bpm() {
    let mut countdown = PulseCountdown::start(MEASURE_SECONDS);
    assert_eq!(countdown.remaining(), MEASURE_SECONDS);
    for _ in 0..18 {
        assert!(countdown.tap());
    }

    assert_eq!(countdown.finished().await, Some(72));
    assert_eq!(countdown.remaining(), 0);
    assert!(!countdown.tap(), "taps after time is up are ignored");
    assert_eq!(countdown.taps(), 18);
}

#[tokio::test(start_paused = true)]
async fn countdown_publishes_each_second() {
    let countdown = PulseCountdown::start(3);
    let mut rx = countdown.subscribe();

    let mut seen = Vec::new();
    while rx.changed().await.is_ok() {
        let left = *rx.borrow_and_update();
        seen.push(left);
        if left == 0 {
            break;
        }
    }
    assert_eq!(seen, vec![2, 1, 0]);
}

#[tokio::test(start_paused = true)]
async fn cancelled_countdown_stops_its_timer() {
    let countdown = PulseCountdown::start(MEASURE_SECONDS);
    let mut rx = countdown.subscribe();
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(*rx.borrow_and_update(), MEASURE_SECONDS - 2);

    countdown.cancel();
    // The sender goes away with the aborted task.
    assert!(rx.changed().await.is_err());
    assert_eq!(*rx.borrow(), MEASURE_SECONDS - 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_countdown_aborts_the_task() {
    let rx = {
        let countdown = PulseCountdown::start(MEASURE_SECONDS);
        countdown.subscribe()
    };
    let mut rx = rx;
    assert!(rx.changed().await.is_err());
}
