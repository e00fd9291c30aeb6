//! Domain errors raised while issuing a session.

use std::path::PathBuf;

use thiserror::Error;

/// Failures the issuer can name precisely. Everything else (SDK, IO) travels
/// as an `anyhow` context chain.
#[derive(Error, Debug)]
pub enum CredsError {
    /// Requested profile section is absent from an existing credential store
    #[error("profile '{profile}' not found in {}", path.display())]
    ProfileNotFound { profile: String, path: PathBuf },

    /// Profile section exists but lacks a required key
    #[error("profile '{profile}' is missing '{key}'")]
    MissingKey { profile: String, key: &'static str },

    /// Caller ARN has no `user/` segment, so no MFA serial can be derived
    #[error("caller '{arn}' is not an IAM user; cannot derive an MFA device serial")]
    NotAnIamUser { arn: String },

    /// GetCallerIdentity response lacked a field
    #[error("caller identity response has no {0}")]
    MissingIdentityField(&'static str),

    /// AssumeRole succeeded without returning credentials
    #[error("AWS STS returned no credentials")]
    NoCredentials,

    /// Home directory could not be determined
    #[error("could not determine home directory")]
    HomeDirUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_not_found_display() {
        let err = CredsError::ProfileNotFound {
            profile: "prod".to_string(),
            path: PathBuf::from("/home/alice/.aws/credentials"),
        };
        assert_eq!(
            err.to_string(),
            "profile 'prod' not found in /home/alice/.aws/credentials"
        );
    }

    #[test]
    fn test_missing_key_display() {
        let err = CredsError::MissingKey {
            profile: "default".to_string(),
            key: "aws_secret_access_key",
        };
        assert_eq!(
            err.to_string(),
            "profile 'default' is missing 'aws_secret_access_key'"
        );
    }

    #[test]
    fn test_not_an_iam_user_display() {
        let err = CredsError::NotAnIamUser {
            arn: "arn:aws:sts::111122223333:assumed-role/Admin/alice".to_string(),
        };
        assert!(err.to_string().contains("assumed-role/Admin/alice"));
        assert!(err.to_string().contains("not an IAM user"));
    }
}
