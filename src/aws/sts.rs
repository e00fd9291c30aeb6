use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sts::{Client as StsClient, config::Credentials as StsCredentials};
use tracing::{debug, info};

use super::{
    AssumeRoleRequest, CallerIdentity, LongTermCredentials, SessionCredentials, TrustBroker,
};
use crate::{constants::DEFAULT_AWS_REGION, error::CredsError};

/// Provider name recorded on the explicit credentials object
const CREDENTIALS_PROVIDER_NAME: &str = "awscreds";

/// STS client authenticated with an explicit long-term key pair
#[derive(Debug, Clone)]
pub struct StsBroker {
    client: StsClient,
}

impl StsBroker {
    pub async fn new(profile: &str, credentials: &LongTermCredentials) -> Self {
        let config = load_sdk_config(profile, credentials).await;
        Self {
            client: StsClient::new(&config),
        }
    }
}

/// SDK configuration for `profile`, authenticated with the given key pair.
///
/// The key pair is handed to the SDK as a static provider with no session
/// token, so ambient `AWS_*` variables and stale temporary sessions never
/// take part in the calls. Region still follows the profile's configuration.
pub async fn load_sdk_config(profile: &str, credentials: &LongTermCredentials) -> SdkConfig {
    let provider = StsCredentials::new(
        &credentials.access_key_id,
        &credentials.secret_access_key,
        None,
        None,
        CREDENTIALS_PROVIDER_NAME,
    );

    // Priority: ENV vars -> Config file -> DEFAULT_AWS_REGION
    let loaded = aws_config::defaults(BehaviorVersion::latest())
        .profile_name(profile)
        .credentials_provider(provider.clone())
        .load()
        .await;

    match loaded.region() {
        Some(region) => {
            info!("Using region: {}", region);
            loaded
        }
        None => {
            info!(
                "No region configured, using default {} for STS",
                DEFAULT_AWS_REGION
            );
            aws_config::defaults(BehaviorVersion::latest())
                .profile_name(profile)
                .credentials_provider(provider)
                .region(Region::new(DEFAULT_AWS_REGION))
                .load()
                .await
        }
    }
}

impl TrustBroker for StsBroker {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        info!("Calling AWS STS GetCallerIdentity");

        let response = self
            .client
            .get_caller_identity()
            .send()
            .await
            .context("Failed to get caller identity")?;

        let arn = response.arn().ok_or(CredsError::MissingIdentityField("ARN"))?;
        let account = response
            .account()
            .ok_or(CredsError::MissingIdentityField("account"))?;
        debug!("Caller ARN: {}", arn);

        CallerIdentity::from_arn(arn, account)
    }

    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<SessionCredentials> {
        info!("Calling AWS STS AssumeRole");
        debug!("Role ARN: {}", request.role_arn);
        debug!("MFA serial: {}", request.mfa_serial);
        debug!("Duration: {} seconds", request.duration_seconds);

        let response = self
            .client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name)
            .duration_seconds(request.duration_seconds)
            .serial_number(&request.mfa_serial)
            .token_code(&request.mfa_code)
            .send()
            .await
            .with_context(|| format!("Failed to assume role {}", request.role_arn))?;

        let sts_creds = response.credentials().ok_or(CredsError::NoCredentials)?;

        let credentials = SessionCredentials {
            access_key_id: sts_creds.access_key_id().to_string(),
            secret_access_key: sts_creds.secret_access_key().to_string(),
            session_token: sts_creds.session_token().to_string(),
            expiration: *sts_creds.expiration(),
        };

        info!("Successfully obtained AWS credentials");
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::provider::ProvideCredentials;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    /// Variables the SDK's default chains read, saved and restored around a test
    const AMBIENT_VARS: &[&str] = &[
        "AWS_ACCESS_KEY_ID",
        "AWS_SECRET_ACCESS_KEY",
        "AWS_SESSION_TOKEN",
        "AWS_REGION",
        "AWS_DEFAULT_REGION",
        "AWS_PROFILE",
        "AWS_CONFIG_FILE",
        "AWS_SHARED_CREDENTIALS_FILE",
        "AWS_EC2_METADATA_DISABLED",
    ];

    fn long_term() -> LongTermCredentials {
        LongTermCredentials {
            access_key_id: "AKIAEXPLICIT".to_string(),
            secret_access_key: "explicitsecret".to_string(),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_sdk_config_ignores_ambient_credentials_and_falls_back_to_default_region() {
        let original: Vec<_> = AMBIENT_VARS
            .iter()
            .map(|name| (*name, env::var(name).ok()))
            .collect();
        let dir = TempDir::new().unwrap();

        unsafe {
            env::set_var("AWS_ACCESS_KEY_ID", "AKIAAMBIENT");
            env::set_var("AWS_SECRET_ACCESS_KEY", "ambientsecret");
            env::set_var("AWS_SESSION_TOKEN", "stale-session-token");
            env::remove_var("AWS_REGION");
            env::remove_var("AWS_DEFAULT_REGION");
            env::remove_var("AWS_PROFILE");
            env::set_var("AWS_CONFIG_FILE", dir.path().join("config"));
            env::set_var("AWS_SHARED_CREDENTIALS_FILE", dir.path().join("credentials"));
            env::set_var("AWS_EC2_METADATA_DISABLED", "true");
        }

        let config = load_sdk_config("default", &long_term()).await;
        let resolved = config
            .credentials_provider()
            .expect("credentials provider configured")
            .provide_credentials()
            .await;

        unsafe {
            for (name, value) in original {
                match value {
                    Some(val) => env::set_var(name, val),
                    None => env::remove_var(name),
                }
            }
        }

        let resolved = resolved.unwrap();
        assert_eq!(resolved.access_key_id(), "AKIAEXPLICIT");
        assert_eq!(resolved.secret_access_key(), "explicitsecret");
        assert_eq!(resolved.session_token(), None);
        assert_eq!(
            config.region().map(|region| region.as_ref()),
            Some(DEFAULT_AWS_REGION)
        );
    }
}
