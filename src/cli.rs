use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{CompletionsCommand, IssueCommand};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "awscreds",
    version,
    about = "Exchange AWS keys and an MFA code for role session credentials",
    long_about = None,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct Cli {
    #[command(flatten)]
    pub issue: IssueCommand,

    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Generate shell completion scripts for awscreds")]
    Completions(CompletionsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Some(Commands::Completions(cmd)) => {
                cmd.execute();
                Ok(())
            }
            None => self.issue.execute().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ShellFormat;
    use clap::{CommandFactory, error::ErrorKind};

    #[test]
    fn test_command_structure_validation() {
        let cmd = Cli::command();
        cmd.debug_assert();
    }

    #[test]
    fn test_mfa_only_uses_defaults() {
        let cli = Cli::try_parse_from(["awscreds", "123456"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.issue.mfa.as_deref(), Some("123456"));
        assert_eq!(cli.issue.account, None);
        assert_eq!(cli.issue.duration, 3600);
        assert_eq!(cli.issue.profile, "default");
        assert_eq!(cli.issue.role, "OrganizationAccountAccessRole");
        assert_eq!(cli.issue.shell, ShellFormat::Fish);
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "awscreds",
            "--account",
            "444455556666",
            "--duration",
            "7200",
            "--profile",
            "work",
            "--role",
            "ReadOnly",
            "654321",
        ])
        .unwrap();
        assert_eq!(cli.issue.mfa.as_deref(), Some("654321"));
        assert_eq!(cli.issue.account.as_deref(), Some("444455556666"));
        assert_eq!(cli.issue.duration, 7200);
        assert_eq!(cli.issue.profile, "work");
        assert_eq!(cli.issue.role, "ReadOnly");
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "awscreds", "-a", "444455556666", "-d", "900", "-p", "dev", "-r", "Admin", "-s",
            "posix", "111111",
        ])
        .unwrap();
        assert_eq!(cli.issue.account.as_deref(), Some("444455556666"));
        assert_eq!(cli.issue.duration, 900);
        assert_eq!(cli.issue.profile, "dev");
        assert_eq!(cli.issue.role, "Admin");
        assert_eq!(cli.issue.shell, ShellFormat::Posix);
    }

    #[test]
    fn test_missing_mfa_fails() {
        let result = Cli::try_parse_from(["awscreds", "--profile", "dev"]);
        assert_eq!(
            result.unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_duration_must_be_integer() {
        let result = Cli::try_parse_from(["awscreds", "-d", "an-hour", "123456"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_duration_out_of_range() {
        let result = Cli::try_parse_from(["awscreds", "-d", "60", "123456"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_completions_command_parsing() {
        let cli = Cli::try_parse_from(["awscreds", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Completions(_))));
    }

    #[test]
    fn test_help_flag_works() {
        let result = Cli::try_parse_from(["awscreds", "--help"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag_works() {
        let result = Cli::try_parse_from(["awscreds", "--version"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_verbose_flag_multiple() {
        let cli = Cli::try_parse_from(["awscreds", "-vvv", "123456"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_verbose_default_zero() {
        let cli = Cli::try_parse_from(["awscreds", "123456"]).unwrap();
        assert_eq!(cli.verbose, 0);
    }
}
