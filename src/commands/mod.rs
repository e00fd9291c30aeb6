pub mod completions;
pub mod issue;

pub use completions::CompletionsCommand;
pub use issue::IssueCommand;
