//! The remote inventory capability and its request payloads.

use compose_sync_core::{ProjectName, RemoteProject, RemoteProjectId};
use serde::Serialize;

use crate::error::RemoteError;

/// Listing, creating, updating, starting and redeploying remote projects.
pub trait RemoteInventory {
    /// Every project in the environment, in listing order.
    fn list_projects(&self) -> Result<Vec<RemoteProject>, RemoteError>;

    /// Server-side search narrowed to exact name matches.
    fn find_projects_by_name(&self, name: &ProjectName) -> Result<Vec<RemoteProject>, RemoteError>;

    /// Create a project and return its id.
    fn create_project(&self, project: &NewProject) -> Result<RemoteProjectId, RemoteError>;

    fn update_project(&self, id: &RemoteProjectId, update: &ProjectUpdate)
        -> Result<(), RemoteError>;

    fn start_project(&self, id: &RemoteProjectId) -> Result<(), RemoteError>;

    fn redeploy_project(&self, id: &RemoteProjectId) -> Result<(), RemoteError>;
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: ProjectName,
    pub compose_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_content: Option<String>,
}

impl NewProject {
    /// An empty env file is sent as no env content at all.
    pub fn new(name: ProjectName, compose_content: String, env_content: Option<String>) -> Self {
        Self {
            name,
            compose_content,
            env_content: env_content.filter(|s| !s.is_empty()),
        }
    }
}

/// Body of an update request. Absent fields leave the remote value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_content: Option<String>,
}

impl ProjectUpdate {
    /// Empty strings are omitted rather than clearing remote fields.
    pub fn new(compose_content: Option<String>, env_content: Option<String>) -> Self {
        Self {
            compose_content: compose_content.filter(|s| !s.is_empty()),
            env_content: env_content.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.compose_content.is_none() && self.env_content.is_none()
    }
}
