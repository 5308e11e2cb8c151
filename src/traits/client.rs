use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::credentials::Credentials;
use crate::resolver::EnvironmentKey;

/// A fully resolved deploy step: everything the server needs to run one
/// deployment job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployRequest {
    pub project: String,
    pub environment: String,
    pub package_name: String,
    /// Stream the job output back instead of returning immediately
    pub poll_output: bool,
    /// Submit the job and return; results are checked on the job feed
    pub asynchronous: bool,
}

/// Remote operations exposed by the deployment server, behind a trait so
/// resolution logic can be tested without a server
pub trait DeployClient: Send + Sync {
    /// List the deployable projects visible to these credentials
    fn list_projects(&self, credentials: &Credentials) -> Result<Vec<String>>;

    /// List the environments configured for a project
    fn list_environments(&self, credentials: &Credentials, project: &str) -> Result<Vec<String>>;

    /// List the packages published for a project environment
    fn list_packages(
        &self,
        credentials: &Credentials,
        project: &str,
        key: &EnvironmentKey,
    ) -> Result<Vec<String>>;

    /// Run a deployment job and return the server's output text
    fn deploy(&self, credentials: &Credentials, request: &DeployRequest) -> Result<String>;
}

/// Real client speaking the server's `/ws` REST interface over blocking HTTP
pub struct HttpDeployClient {
    http: reqwest::blocking::Client,
}

impl HttpDeployClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
        }
    }

    fn endpoint(&self, credentials: &Credentials, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", credentials.server_url.trim_end_matches('/'), path);
        Url::parse(&raw).with_context(|| format!("Invalid request URL: {}", raw))
    }

    /// GET an endpoint that answers with a JSON array of names
    fn get_names(&self, credentials: &Credentials, path: &str) -> Result<Vec<String>> {
        let url = self.endpoint(credentials, path)?;

        let response = self
            .http
            .get(url.clone())
            .header("Authorization", credentials.token.as_str())
            .send()
            .with_context(|| format!("Failed to reach deployment server: {}", url))?;

        if !response.status().is_success() {
            bail!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            );
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response body from: {}", url))?;

        serde_json::from_str(&body).with_context(|| format!("Failed to parse name list from: {}", url))
    }
}

impl Default for HttpDeployClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DeployClient for HttpDeployClient {
    fn list_projects(&self, credentials: &Credentials) -> Result<Vec<String>> {
        self.get_names(credentials, "ws/project/list")
    }

    fn list_environments(&self, credentials: &Credentials, project: &str) -> Result<Vec<String>> {
        self.get_names(credentials, &format!("ws/project/{}/environment/list", project))
    }

    fn list_packages(
        &self,
        credentials: &Credentials,
        project: &str,
        key: &EnvironmentKey,
    ) -> Result<Vec<String>> {
        // Older servers address an environment down to the instance; newer
        // ones stop at the domain
        let path = match &key.instance {
            Some(instance) => format!(
                "ws/project/{}/environment/{}/{}/{}/{}/package/list",
                project, key.server, key.cluster, key.domain, instance
            ),
            None => format!(
                "ws/project/{}/environment/{}/{}/{}/package/list",
                project, key.server, key.cluster, key.domain
            ),
        };

        self.get_names(credentials, &path)
    }

    fn deploy(&self, credentials: &Credentials, request: &DeployRequest) -> Result<String> {
        let url = self.endpoint(credentials, &format!("ws/project/{}/deploy", request.project))?;

        let body = serde_json::to_string(request).context("Failed to encode deploy request")?;

        let response = self
            .http
            .post(url.clone())
            .header("Authorization", credentials.token.as_str())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .with_context(|| format!("Failed to reach deployment server: {}", url))?;

        if !response.status().is_success() {
            bail!(
                "Deployment request failed with status {}: {}",
                response.status(),
                url
            );
        }

        response
            .text()
            .with_context(|| format!("Failed to read deployment output from: {}", url))
    }
}

/// Mock client for testing: canned results per operation, with call
/// counters so cache tests can assert how often the server was hit
#[cfg(test)]
pub struct MockDeployClient {
    projects: Option<Vec<String>>,
    environments: Option<Vec<String>>,
    packages: Option<Vec<String>>,
    deploy_output: Option<String>,
    calls: std::sync::Mutex<CallCounts>,
    last_project_credentials: std::sync::Mutex<Option<Credentials>>,
    last_package_key: std::sync::Mutex<Option<EnvironmentKey>>,
}

#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallCounts {
    pub projects: usize,
    pub environments: usize,
    pub packages: usize,
    pub deploys: usize,
}

#[cfg(test)]
impl MockDeployClient {
    /// Create a mock where every operation fails (no responses configured)
    pub fn new() -> Self {
        Self {
            projects: None,
            environments: None,
            packages: None,
            deploy_output: None,
            calls: std::sync::Mutex::new(CallCounts::default()),
            last_project_credentials: std::sync::Mutex::new(None),
            last_package_key: std::sync::Mutex::new(None),
        }
    }

    pub fn with_projects(mut self, projects: &[&str]) -> Self {
        self.projects = Some(projects.iter().map(|p| (*p).to_string()).collect());
        self
    }

    pub fn with_environments(mut self, environments: &[&str]) -> Self {
        self.environments = Some(environments.iter().map(|e| (*e).to_string()).collect());
        self
    }

    pub fn with_packages(mut self, packages: &[&str]) -> Self {
        self.packages = Some(packages.iter().map(|p| (*p).to_string()).collect());
        self
    }

    pub fn with_deploy_output(mut self, output: &str) -> Self {
        self.deploy_output = Some(output.to_string());
        self
    }

    pub fn calls(&self) -> CallCounts {
        self.calls.lock().unwrap().clone()
    }

    /// Credentials passed to the most recent list_projects call
    pub fn last_project_credentials(&self) -> Option<Credentials> {
        self.last_project_credentials.lock().unwrap().clone()
    }

    /// Environment key passed to the most recent list_packages call
    pub fn last_package_key(&self) -> Option<EnvironmentKey> {
        self.last_package_key.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Default for MockDeployClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl DeployClient for MockDeployClient {
    fn list_projects(&self, credentials: &Credentials) -> Result<Vec<String>> {
        self.calls.lock().unwrap().projects += 1;
        *self.last_project_credentials.lock().unwrap() = Some(credentials.clone());

        match &self.projects {
            Some(projects) => Ok(projects.clone()),
            None => bail!("mock: project listing not configured"),
        }
    }

    fn list_environments(&self, _credentials: &Credentials, _project: &str) -> Result<Vec<String>> {
        self.calls.lock().unwrap().environments += 1;

        match &self.environments {
            Some(environments) => Ok(environments.clone()),
            None => bail!("mock: environment listing not configured"),
        }
    }

    fn list_packages(
        &self,
        _credentials: &Credentials,
        _project: &str,
        key: &EnvironmentKey,
    ) -> Result<Vec<String>> {
        self.calls.lock().unwrap().packages += 1;
        *self.last_package_key.lock().unwrap() = Some(key.clone());

        match &self.packages {
            Some(packages) => Ok(packages.clone()),
            None => bail!("mock: package listing not configured"),
        }
    }

    fn deploy(&self, _credentials: &Credentials, _request: &DeployRequest) -> Result<String> {
        self.calls.lock().unwrap().deploys += 1;

        match &self.deploy_output {
            Some(output) => Ok(output.clone()),
            None => bail!("mock: deployment not configured"),
        }
    }
}
