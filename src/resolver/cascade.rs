use crate::credentials::Credentials;
use crate::resolver::environment_key::EnvironmentKey;
use crate::resolver::project_cache::ProjectCache;
use crate::traits::{DeployClient, Output};

/// Synthetic package choice always offered ahead of the server's packages
pub const LATEST_PACKAGE: &str = "LATEST";

// Server-side banner rows that leak into environment listings
const ENVIRONMENT_EXCLUSIONS: [&str; 2] = ["Project [", "domainxml"];

/// Derives the valid choices for each selector level from the levels above
/// it: project from credentials, environment from project, package from
/// environment.
///
/// No operation returns an error. A broken URL or token shows the pipeline
/// author empty dropdowns; the detail goes to the operator channel.
pub struct CascadeResolver<'a> {
    client: &'a dyn DeployClient,
    cache: &'a ProjectCache,
    output: &'a dyn Output,
}

impl<'a> CascadeResolver<'a> {
    pub fn new(
        client: &'a dyn DeployClient,
        cache: &'a ProjectCache,
        output: &'a dyn Output,
    ) -> Self {
        Self {
            client,
            cache,
            output,
        }
    }

    /// Project choices for the given credentials, served from the cache.
    pub fn project_choices(&self, credentials: &Credentials) -> Vec<String> {
        self.cache.projects(self.client, self.output, credentials)
    }

    /// Environment choices within a project, in server order.
    pub fn environment_choices(&self, credentials: &Credentials, project: &str) -> Vec<String> {
        if self.project_choices(credentials).is_empty() {
            // Unusable credentials; don't spend a remote call
            return Vec::new();
        }

        match self.client.list_environments(credentials, project) {
            Ok(environments) => environments
                .into_iter()
                .filter(|name| !ENVIRONMENT_EXCLUSIONS.iter().any(|row| name.contains(row)))
                .collect(),
            Err(e) => {
                self.output.warning(&format!(
                    "Failed to list environments for project '{}': {}",
                    project, e
                ));
                Vec::new()
            }
        }
    }

    /// Package choices within a project environment, always led by the
    /// LATEST sentinel. An environment string that does not parse still
    /// yields the sentinel, so the universal choice stays available.
    pub fn package_choices(
        &self,
        credentials: &Credentials,
        project: &str,
        environment: &str,
    ) -> Vec<String> {
        if self.project_choices(credentials).is_empty() {
            return Vec::new();
        }

        let key = match EnvironmentKey::parse(environment) {
            Ok(key) => key,
            Err(e) => {
                self.output.warning(&e.to_string());
                return vec![LATEST_PACKAGE.to_string()];
            }
        };

        let mut choices = vec![LATEST_PACKAGE.to_string()];

        match self.client.list_packages(credentials, project, &key) {
            Ok(packages) => {
                choices.extend(
                    packages
                        .into_iter()
                        .filter(|name| name != "null" && !name.starts_with("Deployment")),
                );
            }
            Err(e) => {
                self.output.warning(&format!(
                    "Failed to list packages for '{}' in '{}': {}",
                    project, environment, e
                ));
            }
        }

        choices
    }
}
