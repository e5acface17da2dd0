//! Live S3 round trip. Needs credentials and `TCM_TEST_BUCKET`; run with
//! `cargo test -p tcm-storage -- --ignored`.

use tcm_core::models::form::FormData;
use tcm_core::models::media::{MediaKind, MediaRef};
use tcm_core::models::report::{MediaPaths, ReportRecord};
use tcm_storage::s3::S3Store;
use tcm_storage::session::UserId;
use tcm_storage::store::{MediaStore, ReportStore};

#[tokio::test]
#[ignore]
async fn report_and_media_round_trip() {
    let bucket = std::env::var("TCM_TEST_BUCKET").expect("TCM_TEST_BUCKET not set");
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3Store::new(&config, bucket);
    let user = UserId::new(format!("test-{}", uuid::Uuid::new_v4())).unwrap();

    let media = MediaRef::new("capture.png", "image/png").with_base64("iVBORw0KGgo=");
    let path = store.upload(&user, MediaKind::Tongue, &media).await.unwrap();
    assert!(path.starts_with(&format!("users/{user}/media/tongue/")));
    assert!(path.ends_with(".png"));

    let paths = MediaPaths {
        tongue: Some(path),
        ..Default::default()
    };
    let record = ReportRecord::from_form(uuid::Uuid::new_v4(), user.as_str(), &FormData::default(), paths);
    store.insert(&record).await.unwrap();

    let loaded = store.load(&user, record.id).await.unwrap();
    assert_eq!(loaded.id, record.id);
    assert_eq!(store.list(&user).await.unwrap(), vec![record.id]);
}
