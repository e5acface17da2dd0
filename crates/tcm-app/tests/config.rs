use tcm_app::config::{
    AdvisorConfig, CURRENT_VERSION, CredentialSource, config_info, load_config_from,
    save_config_to,
};
use tcm_core::i18n::Language;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("config.json")).unwrap();

    assert_eq!(config.config_version, CURRENT_VERSION);
    assert_eq!(config.region, "us-east-1");
    assert_eq!(config.credentials, CredentialSource::DefaultChain);
    assert_eq!(config.language, Language::En);
    assert!(config.bucket.is_none());
    assert!(config.user_id.is_none());
}

#[test]
fn pre_versioned_config_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "region": "eu-west-1",
            "credentials": {"type": "profile", "profile_name": "clinic"},
            "model": "custom-model",
            "bucket": "reports-bucket",
            "created_at": "2025-03-01T08:00:00Z"
        }"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.config_version, CURRENT_VERSION);
    assert_eq!(config.default_model, "custom-model");
    assert_eq!(config.language, Language::En);
    assert_eq!(config.bucket.as_deref(), Some("reports-bucket"));
    assert_eq!(
        config.credentials,
        CredentialSource::Profile {
            profile_name: "clinic".to_string()
        }
    );
}

#[test]
fn v1_config_gains_language() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "config_version": 1,
            "region": "us-west-2",
            "credentials": {"type": "default_chain"},
            "default_model": "m",
            "created_at": "2025-03-01T08:00:00Z"
        }"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.default_model, "m");
    assert_eq!(config.language, Language::En);
}

#[test]
fn newer_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        format!(
            r#"{{"config_version": {}, "region": "us-east-1"}}"#,
            CURRENT_VERSION + 1
        ),
    )
    .unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = AdvisorConfig {
        config_version: 0,
        bucket: Some("tcm-reports".to_string()),
        user_id: Some("user-7".to_string()),
        language: Language::Zh,
        ..AdvisorConfig::default()
    };
    save_config_to(&path, &config).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.config_version, CURRENT_VERSION);
    assert_eq!(loaded.bucket.as_deref(), Some("tcm-reports"));
    assert_eq!(loaded.user_id.as_deref(), Some("user-7"));
    assert_eq!(loaded.language, Language::Zh);
    assert!(!path.with_extension("json.tmp").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn config_info_redacts_inline_keys() {
    let config = AdvisorConfig {
        credentials: CredentialSource::Inline {
            access_key_id: "AKIAEXAMPLE12345".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
        },
        ..AdvisorConfig::default()
    };
    let info = config_info(&config, std::path::Path::new("/tmp/config.json"));

    assert_eq!(info.credential_type, "inline");
    assert_eq!(info.access_key_hint.as_deref(), Some("AKIA...2345"));
    let printed = serde_json::to_string(&info).unwrap();
    assert!(!printed.contains("secret"));
}
