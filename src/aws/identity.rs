use anyhow::Result;

use crate::error::CredsError;

/// Separator between the ARN prefix and the IAM user name
const USER_SEGMENT: &str = "user/";

/// Identity of the long-term credentials, as reported by GetCallerIdentity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub arn: String,
    pub account_id: String,
    pub username: String,
    /// Everything before `user/`, e.g. `arn:aws:iam::111122223333:`
    arn_prefix: String,
}

impl CallerIdentity {
    /// Split an IAM user ARN on its first `user/` segment.
    ///
    /// Assumed-role, federated and root principals have no such segment and
    /// are rejected rather than given a guessed MFA serial.
    pub fn from_arn(arn: &str, account_id: &str) -> Result<Self> {
        let (prefix, username) = arn
            .split_once(USER_SEGMENT)
            .filter(|(_, user)| !user.is_empty())
            .ok_or_else(|| CredsError::NotAnIamUser {
                arn: arn.to_string(),
            })?;

        Ok(Self {
            arn: arn.to_string(),
            account_id: account_id.to_string(),
            username: username.to_string(),
            arn_prefix: prefix.to_string(),
        })
    }

    /// Name of the user without its IAM path; RoleSessionName rejects `/`
    pub fn session_name(&self) -> &str {
        self.username
            .rsplit('/')
            .next()
            .unwrap_or(&self.username)
    }

    /// Serial of the user's virtual MFA device: `{prefix}mfa/{username}`
    pub fn mfa_serial(&self) -> String {
        format!("{}mfa/{}", self.arn_prefix, self.username)
    }
}

/// ARN of `role` in `account`
pub fn role_arn(account: &str, role: &str) -> String {
    format!("arn:aws:iam::{account}:role/{role}")
}

/// Parameters of a single STS AssumeRole call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub session_name: String,
    pub duration_seconds: i32,
    pub mfa_serial: String,
    pub mfa_code: String,
}

impl AssumeRoleRequest {
    /// The session is named after the calling user (IAM path dropped) and
    /// authenticated with the user's own virtual MFA device.
    pub fn new(
        caller: &CallerIdentity,
        account: &str,
        role: &str,
        duration_seconds: i32,
        mfa_code: &str,
    ) -> Self {
        Self {
            role_arn: role_arn(account, role),
            session_name: caller.session_name().to_string(),
            duration_seconds,
            mfa_serial: caller.mfa_serial(),
            mfa_code: mfa_code.to_string(),
        }
    }
}
