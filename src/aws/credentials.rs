use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use dialoguer::{Input, theme::ColorfulTheme};
use ini::Ini;
use tracing::{debug, info, warn};

use super::LongTermCredentials;
use crate::{
    constants::{ACCESS_KEY_ID_KEY, SECRET_ACCESS_KEY_KEY},
    error::CredsError,
};

/// Sections of a shared credentials file, in file order
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    sections: Vec<(String, HashMap<String, String>)>,
}

impl ProfileStore {
    pub fn load(path: &Path) -> Result<Self> {
        let ini = Ini::load_from_file(path)
            .with_context(|| format!("Failed to read AWS credentials file: {}", path.display()))?;
        Ok(Self::from_ini(path, &ini))
    }

    /// Flatten every named section into an option -> value map.
    /// Option names are case-insensitive and stored lowercased.
    fn from_ini(path: &Path, ini: &Ini) -> Self {
        let sections = ini
            .iter()
            .filter_map(|(name, props)| {
                let values = props
                    .iter()
                    .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                    .collect();
                name.map(|name| (name.to_string(), values))
            })
            .collect();

        Self {
            path: path.to_path_buf(),
            sections,
        }
    }

    #[cfg(test)]
    fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn profile(&self, profile: &str) -> Result<&HashMap<String, String>> {
        self.sections
            .iter()
            .find(|(name, _)| name == profile)
            .map(|(_, values)| values)
            .ok_or_else(|| {
                CredsError::ProfileNotFound {
                    profile: profile.to_string(),
                    path: self.path.clone(),
                }
                .into()
            })
    }

    pub fn credentials(&self, profile: &str) -> Result<LongTermCredentials> {
        let section = self.profile(profile)?;
        let value = |key: &'static str| {
            section
                .get(key)
                .cloned()
                .ok_or_else(|| CredsError::MissingKey {
                    profile: profile.to_string(),
                    key,
                })
        };

        Ok(LongTermCredentials {
            access_key_id: value(ACCESS_KEY_ID_KEY)?,
            secret_access_key: value(SECRET_ACCESS_KEY_KEY)?,
        })
    }
}

/// Line-oriented user input
pub trait Prompt {
    fn ask(&self, label: &str) -> Result<String>;
}

/// Terminal prompts on stderr, leaving stdout for the export lines
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&self, label: &str) -> Result<String> {
        let theme = ColorfulTheme::default();
        Input::<String>::with_theme(&theme)
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {label}"))
    }
}

/// Where the long-term key pair comes from, chosen once per run
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// A named section of an existing shared credentials file
    Profile { path: PathBuf, profile: String },
    /// No credentials file: ask the user
    Interactive { missing: PathBuf },
}

impl CredentialSource {
    /// Pick the profile store when the file exists, interactive input otherwise
    pub fn select(path: &Path, profile: &str) -> Self {
        if path.exists() {
            debug!("Using credentials file: {}", path.display());
            Self::Profile {
                path: path.to_path_buf(),
                profile: profile.to_string(),
            }
        } else {
            Self::Interactive {
                missing: path.to_path_buf(),
            }
        }
    }

    pub fn resolve(&self, prompt: &impl Prompt) -> Result<LongTermCredentials> {
        match self {
            Self::Profile { path, profile } => {
                let store = ProfileStore::load(path)?;
                let credentials = store.credentials(profile)?;
                info!("Loaded credentials for profile: {}", profile);
                Ok(credentials)
            }
            Self::Interactive { missing } => {
                warn!("Credential file not found: {}", missing.display());
                eprintln!("Credential file not found: {}", missing.display());

                Ok(LongTermCredentials {
                    access_key_id: prompt.ask("Enter AWS Access Key")?,
                    secret_access_key: prompt.ask("Enter AWS Secret Key")?,
                })
            }
        }
    }
}
