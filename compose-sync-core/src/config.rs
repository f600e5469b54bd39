//! Runtime configuration.
//!
//! Settings come from environment variables, optionally layered over a YAML
//! file. Environment values win; empty values count as absent. Everything is
//! validated up front so the reconciliation pass never starts half-configured.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_ENV_ID: &str = "0";
pub const DEFAULT_LOG_FILE: &str = "/var/log/compose-sync.log";
pub const DEFAULT_CLEAN_EXCLUDES: [&str; 3] = [".env.global", "*.env.local", ".env"];
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// The git remote the checkout is reconciled against.
pub const GIT_REMOTE: &str = "origin";

const REPO_PATH: &str = "COMPOSE_REPO_PATH";
const BASE_URL: &str = "ARCANE_BASE_URL";
const API_KEY: &str = "ARCANE_API_KEY";
const ENV_ID: &str = "ARCANE_ENV_ID";
const LOG_FILE: &str = "LOG_FILE";
const AUTH_METHOD: &str = "GIT_AUTH_METHOD";
const SSH_KEY_PATH: &str = "GIT_SSH_KEY_PATH";
const HTTPS_TOKEN: &str = "GIT_HTTPS_TOKEN";
const CLEAN_EXCLUDES: &str = "GIT_CLEAN_EXCLUDES";
const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT_SECS";

/// How git authenticates against the remote.
#[derive(Clone, PartialEq, Eq)]
pub enum GitAuth {
    Ssh { key_path: Option<PathBuf> },
    Https { token: Option<String> },
}

impl GitAuth {
    pub fn method(&self) -> &'static str {
        match self {
            GitAuth::Ssh { .. } => "ssh",
            GitAuth::Https { .. } => "https",
        }
    }
}

impl fmt::Debug for GitAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitAuth::Ssh { key_path } => f.debug_struct("Ssh").field("key_path", key_path).finish(),
            GitAuth::Https { token } => f
                .debug_struct("Https")
                .field("token", &token.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// Fully validated configuration.
#[derive(Clone)]
pub struct Config {
    pub repo_path: PathBuf,
    /// Remote API base URL without a trailing `/`.
    pub base_url: String,
    pub api_key: String,
    pub env_id: String,
    pub log_file: PathBuf,
    pub git_auth: GitAuth,
    /// Patterns preserved by `git clean`.
    pub clean_excludes: Vec<String>,
    pub request_timeout: Duration,
    /// Problems that were tolerated while loading, for the caller to log
    /// once logging is up.
    pub warnings: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("repo_path", &self.repo_path)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("env_id", &self.env_id)
            .field("log_file", &self.log_file)
            .field("git_auth", &self.git_auth)
            .field("clean_excludes", &self.clean_excludes)
            .field("request_timeout", &self.request_timeout)
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Optional YAML config file. Same settings as the environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub repo_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub env_id: Option<String>,
    pub log_file: Option<PathBuf>,
    pub git_auth_method: Option<String>,
    pub git_ssh_key_path: Option<PathBuf>,
    pub git_https_token: Option<String>,
    pub git_clean_excludes: Option<Vec<String>>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Config {
    /// Build from the process environment layered over `file`.
    pub fn from_env(file: ConfigFile) -> Result<Self, ConfigError> {
        Self::from_lookup(file, |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup layered over `file`.
    pub fn from_lookup<F>(file: ConfigFile, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let repo_path = var(REPO_PATH)
            .map(PathBuf::from)
            .or(file.repo_path.filter(|p| !p.as_os_str().is_empty()))
            .ok_or(ConfigError::Missing { key: REPO_PATH })?;
        let base_url = var(BASE_URL)
            .or(non_empty(file.base_url))
            .ok_or(ConfigError::Missing { key: BASE_URL })?
            .trim_end_matches('/')
            .to_string();
        let api_key = var(API_KEY)
            .or(non_empty(file.api_key))
            .ok_or(ConfigError::Missing { key: API_KEY })?;
        let env_id = var(ENV_ID)
            .or(non_empty(file.env_id))
            .unwrap_or_else(|| DEFAULT_ENV_ID.to_string());
        let log_file = var(LOG_FILE)
            .map(PathBuf::from)
            .or(file.log_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        let mut warnings = Vec::new();
        let method = var(AUTH_METHOD)
            .or(non_empty(file.git_auth_method))
            .unwrap_or_else(|| "ssh".to_string())
            .to_ascii_lowercase();
        let git_auth = match method.as_str() {
            "https" => GitAuth::Https {
                token: var(HTTPS_TOKEN).or(non_empty(file.git_https_token)),
            },
            other => {
                if other != "ssh" {
                    warnings.push(format!("unknown git auth method '{other}', defaulting to ssh"));
                }
                GitAuth::Ssh {
                    key_path: var(SSH_KEY_PATH).map(PathBuf::from).or(file.git_ssh_key_path),
                }
            }
        };

        let clean_excludes = match var(CLEAN_EXCLUDES) {
            Some(list) => split_list(&list),
            None => file.git_clean_excludes.unwrap_or_else(|| {
                DEFAULT_CLEAN_EXCLUDES.iter().map(|s| s.to_string()).collect()
            }),
        };

        let timeout_secs = match var(REQUEST_TIMEOUT) {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: REQUEST_TIMEOUT,
                message: format!("'{raw}': {e}"),
            })?,
            None => file
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: REQUEST_TIMEOUT,
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            repo_path,
            base_url,
            api_key,
            env_id,
            log_file,
            git_auth,
            clean_excludes,
            request_timeout: Duration::from_secs(timeout_secs),
            warnings,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            (REPO_PATH, "/srv/compose"),
            (BASE_URL, "http://localhost:3552/"),
            (API_KEY, "secret-key"),
        ]
    }

    #[test]
    fn defaults_apply_when_only_required_vars_set() {
        let config =
            Config::from_lookup(ConfigFile::default(), lookup(&required())).expect("config");
        assert_eq!(config.repo_path, PathBuf::from("/srv/compose"));
        assert_eq!(config.base_url, "http://localhost:3552");
        assert_eq!(config.env_id, "0");
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(config.git_auth, GitAuth::Ssh { key_path: None });
        assert_eq!(config.clean_excludes, vec![".env.global", "*.env.local", ".env"]);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn empty_required_var_counts_as_missing() {
        let mut vars = required();
        vars[2] = (API_KEY, "  ");
        let err = Config::from_lookup(ConfigFile::default(), lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { key: API_KEY }), "got: {err}");
    }

    #[test]
    fn unknown_auth_method_falls_back_to_ssh() {
        let mut vars = required();
        vars.push((AUTH_METHOD, "kerberos"));
        vars.push((SSH_KEY_PATH, "/root/.ssh/id_ed25519"));
        let config = Config::from_lookup(ConfigFile::default(), lookup(&vars)).expect("config");
        assert_eq!(
            config.git_auth,
            GitAuth::Ssh {
                key_path: Some(PathBuf::from("/root/.ssh/id_ed25519"))
            }
        );
        assert_eq!(
            config.warnings,
            vec!["unknown git auth method 'kerberos', defaulting to ssh"]
        );
    }

    #[test]
    fn https_auth_reads_token() {
        let mut vars = required();
        vars.push((AUTH_METHOD, "HTTPS"));
        vars.push((HTTPS_TOKEN, "ghp_token"));
        let config = Config::from_lookup(ConfigFile::default(), lookup(&vars)).expect("config");
        assert_eq!(
            config.git_auth,
            GitAuth::Https {
                token: Some("ghp_token".to_string())
            }
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut vars = required();
        vars.push((AUTH_METHOD, "https"));
        vars.push((HTTPS_TOKEN, "ghp_token"));
        let config = Config::from_lookup(ConfigFile::default(), lookup(&vars)).expect("config");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(!debug.contains("ghp_token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn clean_excludes_split_on_commas() {
        let mut vars = required();
        vars.push((CLEAN_EXCLUDES, ".env, secrets/ ,,"));
        let config = Config::from_lookup(ConfigFile::default(), lookup(&vars)).expect("config");
        assert_eq!(config.clean_excludes, vec![".env", "secrets/"]);
    }

    #[rstest]
    #[case::not_a_number("soon")]
    #[case::negative("-5")]
    #[case::zero("0")]
    fn bad_timeout_is_invalid(#[case] raw: &str) {
        let mut vars = required();
        vars.push((REQUEST_TIMEOUT, raw));
        let err = Config::from_lookup(ConfigFile::default(), lookup(&vars)).unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { key: REQUEST_TIMEOUT, .. }),
            "got: {err}"
        );
    }

    #[rstest]
    #[case("ssh", false)]
    #[case("SSH", false)]
    #[case("https", false)]
    #[case("kerberos", true)]
    fn only_unrecognised_auth_methods_warn(#[case] method: &str, #[case] warns: bool) {
        let mut vars = required();
        vars.push((AUTH_METHOD, method));
        let config = Config::from_lookup(ConfigFile::default(), lookup(&vars)).expect("config");
        assert_eq!(!config.warnings.is_empty(), warns);
    }
}
