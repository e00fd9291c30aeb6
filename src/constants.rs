use std::{
    env,
    path::{Path, PathBuf},
};

use dirs;

/// Profile used when `--profile` is not given
pub const DEFAULT_PROFILE: &str = "default";

/// Role assumed when `--role` is not given
pub const DEFAULT_ROLE_NAME: &str = "OrganizationAccountAccessRole";

/// Default session duration in seconds
pub const DEFAULT_SESSION_DURATION_SECONDS: i32 = 3600;

/// Minimum session duration accepted by STS AssumeRole
pub const MIN_SESSION_DURATION_SECONDS: i32 = 900;

/// Maximum session duration accepted by STS AssumeRole
pub const MAX_SESSION_DURATION_SECONDS: i32 = 43200;

/// Default AWS region for STS operations when no region is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// AWS configuration directory name
pub const AWS_CONFIG_DIR_NAME: &str = ".aws";

/// AWS shared credentials file name
pub const AWS_CREDENTIALS_FILE_NAME: &str = "credentials";

/// Environment variable overriding the shared credentials file location
pub const AWS_SHARED_CREDENTIALS_FILE_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";

/// Credential store key holding the access key id
pub const ACCESS_KEY_ID_KEY: &str = "aws_access_key_id";

/// Credential store key holding the secret access key
pub const SECRET_ACCESS_KEY_KEY: &str = "aws_secret_access_key";

/// Variable names written to the output artifact, in output order
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

/// Get the AWS credentials file path
/// Respects AWS_SHARED_CREDENTIALS_FILE environment variable if set
pub fn get_aws_credentials_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(AWS_SHARED_CREDENTIALS_FILE_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| {
        home.join(AWS_CONFIG_DIR_NAME)
            .join(AWS_CREDENTIALS_FILE_NAME)
    })
}

/// Path of the session file for a (profile, role, account) triple:
/// `<home>/.<profile>-<role>-<account>`
pub fn session_file_path(home: &Path, profile: &str, role: &str, account: &str) -> PathBuf {
    home.join(format!(".{profile}-{role}-{account}"))
}
