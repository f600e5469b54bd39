pub mod run;
pub mod status;

use compose_sync_core::Config;
use compose_sync_git::{CommandGit, GitInvocation};
use compose_sync_remote::ArcaneClient;

/// Git backend for the configured checkout, with credentials applied.
pub(crate) fn git_backend(config: &Config) -> CommandGit {
    CommandGit::new(&config.repo_path, GitInvocation::for_auth(&config.git_auth))
}

pub(crate) fn remote_client(config: &Config) -> ArcaneClient {
    ArcaneClient::new(
        &config.base_url,
        &config.api_key,
        &config.env_id,
        config.request_timeout,
    )
}
