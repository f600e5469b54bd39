//! Blocking HTTP client for the orchestration API.

use std::time::Duration;

use compose_sync_core::{ProjectName, RemoteProject, RemoteProjectId};
use serde::Deserialize;
use serde_json::Value;

use crate::error::RemoteError;
use crate::inventory::{NewProject, ProjectUpdate, RemoteInventory};
use crate::pagination::{collect_pages, ProjectPage, PAGE_SIZE};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreateResponse {
    data: CreatedProject,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreatedProject {
    id: String,
}

/// [`RemoteInventory`] over the orchestration API's REST endpoints.
///
/// The API key is sent both as `X-Api-Key` and as a bearer token; servers
/// differ in which one they read.
#[derive(Clone)]
pub struct ArcaneClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
    env_id: String,
}

impl ArcaneClient {
    pub fn new(base_url: &str, api_key: &str, env_id: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            env_id: env_id.to_string(),
        }
    }

    fn projects_url(&self) -> String {
        format!("{}/api/environments/{}/projects", self.base_url, self.env_id)
    }

    fn project_url(&self, id: &RemoteProjectId, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}/{}/{}", self.projects_url(), id, action),
            None => format!("{}/{}", self.projects_url(), id),
        }
    }

    /// Issue a request and return the raw response body.
    fn send(
        &self,
        method: &str,
        url: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<String, RemoteError> {
        tracing::debug!(%method, %url, "remote request");

        let mut request = self
            .agent
            .request(method, url)
            .set("X-Api-Key", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => response.into_string().map_err(|e| RemoteError::Transport {
                url: url.to_string(),
                message: format!("failed to read response: {e}"),
            }),
            Err(ureq::Error::Status(code, response)) => Err(RemoteError::Status {
                code,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(RemoteError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            }),
        }
    }

    fn list_all(&self, search: Option<&str>) -> Result<Vec<RemoteProject>, RemoteError> {
        let url = self.projects_url();
        collect_pages(|start| {
            let mut query = vec![("start", start.to_string()), ("limit", PAGE_SIZE.to_string())];
            if let Some(search) = search {
                query.push(("search", search.to_string()));
            }
            let body = self.send("GET", &url, &query, None)?;
            serde_json::from_str::<ProjectPage>(&body).map_err(|source| RemoteError::Decode {
                what: "projects",
                body,
                source,
            })
        })
    }
}

impl RemoteInventory for ArcaneClient {
    fn list_projects(&self) -> Result<Vec<RemoteProject>, RemoteError> {
        self.list_all(None)
    }

    fn find_projects_by_name(&self, name: &ProjectName) -> Result<Vec<RemoteProject>, RemoteError> {
        let mut found = self.list_all(Some(name.as_str()))?;
        found.retain(|p| &p.name == name);
        Ok(found)
    }

    fn create_project(&self, project: &NewProject) -> Result<RemoteProjectId, RemoteError> {
        let payload = serde_json::to_value(project)
            .map_err(|source| RemoteError::Encode { what: "create", source })?;
        let body = self.send("POST", &self.projects_url(), &[], Some(payload))?;
        let created: CreateResponse =
            serde_json::from_str(&body).map_err(|source| RemoteError::Decode {
                what: "create",
                body,
                source,
            })?;

        if created.data.id.is_empty() {
            return Ok(RemoteProjectId::from(project.name.as_str()));
        }
        Ok(RemoteProjectId(created.data.id))
    }

    fn update_project(
        &self,
        id: &RemoteProjectId,
        update: &ProjectUpdate,
    ) -> Result<(), RemoteError> {
        let payload = serde_json::to_value(update)
            .map_err(|source| RemoteError::Encode { what: "update", source })?;
        self.send("PUT", &self.project_url(id, None), &[], Some(payload))
            .map(|_| ())
    }

    fn start_project(&self, id: &RemoteProjectId) -> Result<(), RemoteError> {
        self.send("POST", &self.project_url(id, Some("up")), &[], None)
            .map(|_| ())
    }

    fn redeploy_project(&self, id: &RemoteProjectId) -> Result<(), RemoteError> {
        self.send("POST", &self.project_url(id, Some("redeploy")), &[], None)
            .map(|_| ())
    }
}
