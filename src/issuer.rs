//! Session issuing: identity lookup, role assumption and publishing the
//! resulting credentials as shell assignments.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    aws::{AssumeRoleRequest, SessionCredentials, TrustBroker},
    constants,
    output::{self, ShellFormat},
};

/// Everything a run needs besides the long-term credentials
#[derive(Debug, Clone)]
pub struct IssueOptions {
    pub profile: String,
    pub role: String,
    /// Target account; the caller's own account when `None`
    pub account: Option<String>,
    pub duration_seconds: i32,
    pub mfa_code: String,
    pub shell: ShellFormat,
}

/// Credentials for `role` in `account`
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub account: String,
    pub credentials: SessionCredentials,
}

/// Resolve the caller, then assume the target role with the caller's MFA device.
pub async fn assume<B: TrustBroker>(broker: &B, options: &IssueOptions) -> Result<IssuedSession> {
    let caller = broker.caller_identity().await?;
    info!("Authenticated as: {}", caller.arn);

    let account = match &options.account {
        Some(account) => account.clone(),
        None => {
            debug!("No account given, using caller account {}", caller.account_id);
            caller.account_id.clone()
        }
    };

    let request = AssumeRoleRequest::new(
        &caller,
        &account,
        &options.role,
        options.duration_seconds,
        &options.mfa_code,
    );
    info!("Requesting AWS credentials for role: {}", request.role_arn);

    let credentials = broker.assume_role(&request).await?;

    Ok(IssuedSession {
        account,
        credentials,
    })
}

/// Write the session file under `home` and echo the same lines to `out`.
/// Returns the session file path.
pub async fn publish(
    session: &IssuedSession,
    options: &IssueOptions,
    home: &Path,
    out: &mut impl Write,
) -> Result<PathBuf> {
    let path = constants::session_file_path(home, &options.profile, &options.role, &session.account);
    let lines = options.shell.render(&session.credentials);

    output::write_session_file(&path, &lines).await?;

    for line in &lines {
        writeln!(out, "{line}").context("Failed to write to stdout")?;
    }
    out.flush().context("Failed to write to stdout")?;

    Ok(path)
}
