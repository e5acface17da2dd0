//! AWS wiring for the host: one `SdkConfig` shared by the Bedrock provider
//! and the S3 report store.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sts::config::Credentials;
use serde::Serialize;
use tracing::info;

use crate::config::{AdvisorConfig, CredentialSource};

#[derive(Debug, Clone, Serialize)]
pub struct CallerIdentity {
    pub account_id: String,
    pub arn: String,
    pub user_id: String,
}

pub async fn sdk_config(config: &AdvisorConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    loader = match &config.credentials {
        CredentialSource::Inline {
            access_key_id,
            secret_access_key,
            session_token,
        } => loader.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            session_token.clone(),
            None,
            "tcm-advisor-config",
        )),
        CredentialSource::Profile { profile_name } => loader.profile_name(profile_name),
        CredentialSource::DefaultChain => loader,
    };

    info!(
        region = %config.region,
        credentials = credential_kind(&config.credentials),
        "loading AWS config"
    );
    loader.load().await
}

fn credential_kind(source: &CredentialSource) -> &'static str {
    match source {
        CredentialSource::Inline { .. } => "inline",
        CredentialSource::Profile { .. } => "profile",
        CredentialSource::DefaultChain => "default_chain",
    }
}

/// STS GetCallerIdentity, to check the credentials before a session.
pub async fn caller_identity(sdk: &SdkConfig) -> eyre::Result<CallerIdentity> {
    let resp = aws_sdk_sts::Client::new(sdk)
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| eyre::eyre!("STS GetCallerIdentity failed: {}", e.into_service_error()))?;

    Ok(CallerIdentity {
        account_id: resp.account().unwrap_or_default().to_string(),
        arn: resp.arn().unwrap_or_default().to_string(),
        user_id: resp.user_id().unwrap_or_default().to_string(),
    })
}
