mod common;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::ScriptedProvider;
use tcm_ai::analysis::{Verdict, analyze_media};
use tcm_ai::error::AiError;
use tcm_ai::report::{generate_diagnosis, summarize_inquiry};
use tcm_core::i18n::Language;
use tcm_core::models::form::FormData;
use tcm_core::models::media::{MediaKind, MediaRef};
use tcm_core::models::modality::{TongueAnalysis, VoiceAnalysis};

fn jpeg() -> MediaRef {
    MediaRef::new("file:///tmp/tongue.jpg", "image/jpeg")
        .with_base64(format!("data:image/jpeg;base64,{}", STANDARD.encode([0xff, 0xd8, 0xff])))
}

#[tokio::test]
async fn valid_tongue_photo_is_accepted() {
    let provider = ScriptedProvider::new(vec![Ok(
        "```json\n{\"is_valid_image\": true, \"confidence\": 85, \"tongue_color\": \"pale\"}\n```",
    )]);

    let verdict: Verdict<TongueAnalysis> =
        analyze_media(&provider, MediaKind::Tongue, &jpeg(), None, Language::En)
            .await
            .unwrap();
    let Verdict::Valid(analysis) = verdict else {
        panic!("expected a valid verdict");
    };
    assert_eq!(analysis.confidence, Some(85.0));
    assert_eq!(analysis.tongue_color.as_deref(), Some("pale"));

    let request = provider.last_request();
    let attachment = &request.messages[0].attachments[0];
    assert_eq!(attachment.data, vec![0xff, 0xd8, 0xff]);
    assert_eq!(attachment.name, "tongue.jpg");
}

#[tokio::test]
async fn wrong_subject_is_not_an_error() {
    let provider = ScriptedProvider::new(vec![Ok("{\"is_valid_image\": false}")]);

    let verdict: Verdict<TongueAnalysis> =
        analyze_media(&provider, MediaKind::Tongue, &jpeg(), None, Language::En)
            .await
            .unwrap();
    assert!(matches!(verdict, Verdict::InvalidSubject(_)));
}

#[tokio::test]
async fn voice_accepts_the_image_flag_alias() {
    let provider = ScriptedProvider::new(vec![Ok("{\"is_valid_image\": true, \"tone\": \"weak\"}")]);
    let media = MediaRef::new("file:///tmp/voice.m4a", "audio/mp4").with_base64("AAAA");

    let verdict: Verdict<VoiceAnalysis> =
        analyze_media(&provider, MediaKind::Voice, &media, None, Language::En)
            .await
            .unwrap();
    assert!(matches!(verdict, Verdict::Valid(v) if v.tone.as_deref() == Some("weak")));
}

#[tokio::test]
async fn unparseable_reply_is_an_error() {
    let provider = ScriptedProvider::new(vec![Ok("Sorry, I can't look at photos.")]);

    let result: Result<Verdict<TongueAnalysis>, _> =
        analyze_media(&provider, MediaKind::Tongue, &jpeg(), None, Language::En).await;
    assert!(matches!(result, Err(AiError::ResponseParse(_))));
}

#[tokio::test]
async fn missing_media_file_is_a_media_error() {
    let provider = ScriptedProvider::new(vec![]);
    let media = MediaRef::new("file:///nonexistent/tongue.jpg", "image/jpeg");

    let result: Result<Verdict<TongueAnalysis>, _> =
        analyze_media(&provider, MediaKind::Tongue, &media, None, Language::En).await;
    assert!(matches!(result, Err(AiError::Media(_))));
    assert!(provider.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn diagnosis_report_is_parsed() {
    let provider = ScriptedProvider::new(vec![Ok(
        "```json\n{\"constitution\": \"Qi deficiency\", \"syndrome\": \"Spleen qi deficiency\", \
         \"summary\": \"Fatigue with poor appetite.\", \"recommendations\": \
         [{\"category\": \"diet\", \"title\": \"Warm meals\", \"description\": \"Favor cooked food.\"}]}\n```",
    )]);
    let mut form = FormData::default();
    form.inquiry.summary = "Tired after meals.".to_string();

    let report = generate_diagnosis(&provider, &form, Language::En).await.unwrap();
    assert_eq!(report.constitution, "Qi deficiency");
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].category, "diet");

    let request = provider.last_request();
    assert!(request.messages[0].content.contains("<consultation>\nTired after meals."));
    assert!(request.system_prompt.is_some());
}

#[tokio::test]
async fn empty_diagnosis_is_a_schema_violation() {
    let provider = ScriptedProvider::new(vec![Ok("{\"recommendations\": []}")]);

    let result = generate_diagnosis(&provider, &FormData::default(), Language::En).await;
    assert!(matches!(result, Err(AiError::SchemaViolation(_))));
}

#[tokio::test]
async fn summary_skips_the_call_without_a_transcript() {
    let provider = ScriptedProvider::new(vec![]);

    let summary = summarize_inquiry(&provider, &FormData::default(), Language::En)
        .await
        .unwrap();
    assert!(summary.is_empty());
    assert!(provider.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn summary_is_trimmed() {
    let provider = ScriptedProvider::new(vec![Ok("  Poor sleep for two weeks.\n")]);
    let mut form = FormData::default();
    form.inquiry.transcript = "Patient: I can't sleep\nDoctor: Since when?".to_string();

    let summary = summarize_inquiry(&provider, &form, Language::En).await.unwrap();
    assert_eq!(summary, "Poor sleep for two weeks.");
}
