use tcm_core::i18n::{self, Language, TextKey};
use tcm_core::models::doctor::{doctor_level, doctor_levels};
use tcm_core::models::pulse::{PulseQuality, first_conflict};

#[test]
fn catalog_has_twelve_unique_ids() {
    let mut ids: Vec<_> = PulseQuality::ALL.iter().map(|q| q.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 12);
}

#[test]
fn conflict_relation_is_symmetric() {
    for a in PulseQuality::ALL {
        assert!(!a.conflicts_with(a), "{} conflicts with itself", a.id());
        for b in PulseQuality::ALL {
            assert_eq!(a.conflicts_with(b), b.conflicts_with(a));
        }
    }
    assert!(PulseQuality::Xi.conflicts_with(PulseQuality::Hong));
    assert!(!PulseQuality::Xi.conflicts_with(PulseQuality::Hua));
}

#[test]
fn first_conflict_reports_the_earliest_selected_quality() {
    let selected = [PulseQuality::Jin, PulseQuality::Fu, PulseQuality::Xi];
    assert_eq!(
        first_conflict(&selected, PulseQuality::Chen),
        Some(PulseQuality::Fu)
    );
    assert_eq!(first_conflict(&selected, PulseQuality::Hua), None);
}

#[test]
fn ids_round_trip_through_lookup() {
    for q in PulseQuality::ALL {
        assert_eq!(PulseQuality::from_id(q.id()).unwrap(), q);
    }
    assert!(PulseQuality::from_id("unknown").is_err());
}

#[test]
fn doctor_tiers_resolve_by_id() {
    assert_eq!(doctor_levels(Language::En).len(), 3);
    let chief = doctor_level("chief", Language::Zh).unwrap();
    assert_eq!(chief.name, "主任医师");
    assert!(doctor_level("intern", Language::En).is_err());
}

#[test]
fn templates_fill_placeholders() {
    let msg = i18n::format(
        Language::En,
        TextKey::PulseConflict,
        &[("selected", "Surging"), ("existing", "Thin")],
    );
    assert_eq!(msg, "Surging conflicts with Thin. Deselect Thin first.");
    assert_eq!(Language::parse("zh-CN"), Some(Language::Zh));
    assert_eq!(Language::parse("fr"), None);
}
