//! Git credential injection.
//!
//! Credentials are turned into a [`GitInvocation`] once, at construction, and
//! applied to each spawned git process. The tool's own environment is never
//! modified.

use std::fmt;

use compose_sync_core::GitAuth;

/// Environment variable the inline credential helper reads the token from.
pub const TOKEN_ENV: &str = "COMPOSE_SYNC_GIT_TOKEN";

const HTTPS_HELPER: &str =
    "!f() { echo username=x-access-token; echo \"password=${COMPOSE_SYNC_GIT_TOKEN}\"; }; f";

/// Extra arguments and environment applied to every git subprocess.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct GitInvocation {
    /// `-c key=value` pairs placed before the git subcommand.
    pub config_args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl GitInvocation {
    /// Build the invocation for `auth`. Missing credentials only warn.
    pub fn for_auth(auth: &GitAuth) -> Self {
        let mut invocation = Self::default();
        invocation.push_env("GIT_TERMINAL_PROMPT", "0");

        match auth {
            GitAuth::Ssh { key_path } => match key_path {
                Some(path) if path.exists() => {
                    invocation.push_env(
                        "GIT_SSH_COMMAND",
                        &format!(
                            "ssh -i {} -o StrictHostKeyChecking=accept-new \
                             -o UserKnownHostsFile=/dev/null",
                            path.display()
                        ),
                    );
                    tracing::info!(key = %path.display(), "configured git to use SSH key");
                }
                Some(path) => {
                    tracing::warn!(
                        key = %path.display(),
                        "SSH key not found, git operations may fail"
                    );
                }
                None => {
                    tracing::warn!("no SSH key configured, relying on the default ssh setup");
                }
            },
            GitAuth::Https { token } => match token {
                Some(token) => {
                    // The empty helper clears any helpers inherited from git config.
                    invocation.push_config("credential.helper=");
                    invocation.push_config(&format!("credential.helper={HTTPS_HELPER}"));
                    invocation.push_env(TOKEN_ENV, token);
                    tracing::info!("configured git to use HTTPS with an access token");
                }
                None => {
                    tracing::warn!("HTTPS access token not provided, git operations may fail");
                }
            },
        }

        invocation
    }

    fn push_config(&mut self, setting: &str) {
        self.config_args.push("-c".to_string());
        self.config_args.push(setting.to_string());
    }

    fn push_env(&mut self, key: &str, value: &str) {
        self.env.push((key.to_string(), value.to_string()));
    }
}

impl fmt::Debug for GitInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env: Vec<(&str, &str)> = self
            .env
            .iter()
            .map(|(k, v)| {
                let shown = if k == TOKEN_ENV { "<redacted>" } else { v.as_str() };
                (k.as_str(), shown)
            })
            .collect();
        f.debug_struct("GitInvocation")
            .field("config_args", &self.config_args)
            .field("env", &env)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn env_value<'a>(invocation: &'a GitInvocation, key: &str) -> Option<&'a str> {
        invocation
            .env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn ssh_key_that_exists_sets_ssh_command() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let key = dir.path().join("id_ed25519");
        std::fs::write(&key, "key").expect("write key");

        let invocation = GitInvocation::for_auth(&GitAuth::Ssh {
            key_path: Some(key.clone()),
        });
        let command = env_value(&invocation, "GIT_SSH_COMMAND").expect("ssh command");
        assert!(command.starts_with(&format!("ssh -i {}", key.display())));
        assert!(command.contains("StrictHostKeyChecking=accept-new"));
        assert!(invocation.config_args.is_empty());
    }

    #[test]
    fn missing_ssh_key_sets_nothing_but_prompt_guard() {
        let invocation = GitInvocation::for_auth(&GitAuth::Ssh {
            key_path: Some(PathBuf::from("/definitely/not/here")),
        });
        assert_eq!(env_value(&invocation, "GIT_SSH_COMMAND"), None);
        assert_eq!(env_value(&invocation, "GIT_TERMINAL_PROMPT"), Some("0"));
    }

    #[test]
    fn https_token_goes_to_env_not_argv() {
        let invocation = GitInvocation::for_auth(&GitAuth::Https {
            token: Some("ghp_secret".to_string()),
        });
        assert_eq!(env_value(&invocation, TOKEN_ENV), Some("ghp_secret"));
        assert!(invocation.config_args.iter().all(|a| !a.contains("ghp_secret")));
        assert_eq!(invocation.config_args[0], "-c");
        assert_eq!(invocation.config_args[1], "credential.helper=");
        assert!(!format!("{invocation:?}").contains("ghp_secret"));
    }

    #[test]
    fn https_without_token_adds_no_helper() {
        let invocation = GitInvocation::for_auth(&GitAuth::Https { token: None });
        assert!(invocation.config_args.is_empty());
        assert_eq!(env_value(&invocation, TOKEN_ENV), None);
    }
}
