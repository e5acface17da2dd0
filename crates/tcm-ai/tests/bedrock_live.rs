//! Live Bedrock calls. Run with `cargo test -p tcm-ai -- --ignored` and AWS
//! credentials in the environment.

use tcm_ai::bedrock::BedrockProvider;
use tcm_ai::inquiry::InquirySession;
use tcm_core::i18n::Language;
use tcm_core::models::doctor::RESIDENT_MODEL;
use tcm_core::models::form::FormData;

#[tokio::test]
#[ignore]
async fn opening_question_from_bedrock() {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let provider = BedrockProvider::new(&config, RESIDENT_MODEL);
    let mut form = FormData::default();
    form.intake.main_concern = "Headaches in the afternoon".to_string();

    let mut session = InquirySession::new(&form, Language::En);
    let turn = session.open(&provider).await.unwrap().unwrap();
    assert!(!turn.reply.content.is_empty());
    assert!(!turn.suggestions.is_empty());
}
