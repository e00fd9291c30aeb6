use anyhow::{Context, Result};
use aws_smithy_types::date_time::Format;
use clap::Args;
use std::io;
use tracing::info;

use crate::{
    aws::{
        credentials::{CredentialSource, TerminalPrompt},
        sts::StsBroker,
    },
    constants::{
        self, DEFAULT_PROFILE, DEFAULT_ROLE_NAME, DEFAULT_SESSION_DURATION_SECONDS,
        MAX_SESSION_DURATION_SECONDS, MIN_SESSION_DURATION_SECONDS,
    },
    error::CredsError,
    issuer::{self, IssueOptions},
    output::ShellFormat,
};

#[derive(Debug, Clone, Args)]
pub struct IssueCommand {
    #[arg(help = "One-time code from the MFA device", required = true)]
    pub mfa: Option<String>,

    #[arg(
        short = 'a',
        long,
        help = "AWS account to assume the role in (defaults to the caller's account)"
    )]
    pub account: Option<String>,

    #[arg(
        short = 'd',
        long,
        default_value_t = DEFAULT_SESSION_DURATION_SECONDS,
        value_parser = clap::value_parser!(i32)
            .range(i64::from(MIN_SESSION_DURATION_SECONDS)..=i64::from(MAX_SESSION_DURATION_SECONDS)),
        help = "Duration in seconds for the AWS session"
    )]
    pub duration: i32,

    #[arg(
        short = 'p',
        long,
        default_value = DEFAULT_PROFILE,
        help = "AWS profile to read long-term credentials from"
    )]
    pub profile: String,

    #[arg(
        short = 'r',
        long,
        default_value = DEFAULT_ROLE_NAME,
        help = "AWS IAM role name to assume"
    )]
    pub role: String,

    #[arg(
        short = 's',
        long,
        value_enum,
        default_value_t = ShellFormat::Fish,
        help = "Shell syntax for the exported variables"
    )]
    pub shell: ShellFormat,
}

impl IssueCommand {
    pub async fn execute(self) -> Result<()> {
        let options = self.into_options()?;
        info!("Issuing session for profile: {}", options.profile);

        let credentials_path =
            constants::get_aws_credentials_path().ok_or(CredsError::HomeDirUnavailable)?;
        let credentials = CredentialSource::select(&credentials_path, &options.profile)
            .resolve(&TerminalPrompt)
            .context("Failed to resolve long-term AWS credentials")?;

        let broker = StsBroker::new(&options.profile, &credentials).await;
        let session = issuer::assume(&broker, &options).await?;

        let home = dirs::home_dir().ok_or(CredsError::HomeDirUnavailable)?;
        let path = issuer::publish(&session, &options, &home, &mut io::stdout().lock())
            .await
            .context("Failed to save session credentials")?;

        eprintln!("Session credentials saved to {}", path.display());
        let expires_at = session
            .credentials
            .expiration
            .fmt(Format::DateTime)
            .unwrap_or_else(|_| "unknown".to_string());
        info!("Credentials expire at: {}", expires_at);
        eprintln!("Credentials will expire at: {expires_at}");

        Ok(())
    }

    fn into_options(self) -> Result<IssueOptions> {
        Ok(IssueOptions {
            mfa_code: self.mfa.context("MFA code is required")?,
            profile: self.profile,
            role: self.role,
            account: self.account,
            duration_seconds: self.duration,
            shell: self.shell,
        })
    }
}
