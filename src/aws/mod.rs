use anyhow::Result;
use aws_smithy_types::DateTime;

pub mod credentials;
pub mod identity;
pub mod sts;

pub use identity::{AssumeRoleRequest, CallerIdentity};

/// Long-term IAM user key pair, read once per run and never written back
#[derive(Clone, PartialEq, Eq)]
pub struct LongTermCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for LongTermCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LongTermCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// AWS temporary credentials returned by AssumeRole
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime,
}

/// The two STS operations the issuer depends on.
///
/// Implementations carry their own credentials; nothing is read from or
/// written to the process environment.
#[allow(async_fn_in_trait)]
pub trait TrustBroker {
    /// Who am I: resolves the ARN and account of the configured credentials
    async fn caller_identity(&self) -> Result<CallerIdentity>;

    /// Exchange the configured credentials plus an MFA code for a session
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<SessionCredentials>;
}
