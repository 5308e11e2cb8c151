use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;

use crate::credentials::Credentials;
use crate::traits::{DeployClient, Output};

lazy_static! {
    static ref SHARED_CACHE: Arc<ProjectCache> = Arc::new(ProjectCache::new());
}

/// Memoized project list for the most recently fetched credentials.
///
/// Lookups do not compare credentials: the dirty flag set by the field
/// validators on every edit is the only invalidation signal, so a non-dirty
/// entry is returned unchanged even for credentials that differ from the
/// stored key. Fetch failures are stored as an empty list and the flag is
/// cleared either way, so a failing server is not re-queried until a field
/// is edited again.
pub struct ProjectCache {
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    entry: Option<CacheEntry>,
    dirty: bool,
}

struct CacheEntry {
    credentials: Credentials,
    projects: Vec<String>,
}

impl ProjectCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Process-wide instance shared across every editing session, matching
    /// the editor's single cache for all open step configurations.
    pub fn shared() -> Arc<ProjectCache> {
        Arc::clone(&SHARED_CACHE)
    }

    /// Mark the cached list stale; the next lookup refetches.
    pub fn invalidate(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.dirty = true;
    }

    /// The project list for these credentials, fetched at most once per
    /// invalidation. Check, fetch and store happen under one lock so
    /// concurrent field-fill requests cannot race a refetch.
    pub fn projects(
        &self,
        client: &dyn DeployClient,
        output: &dyn Output,
        credentials: &Credentials,
    ) -> Vec<String> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.dirty || state.entry.is_none() {
            let projects = fetch(client, output, credentials);
            state.entry = Some(CacheEntry {
                credentials: credentials.clone(),
                projects,
            });
            state.dirty = false;
        } else if let Some(entry) = &state.entry {
            if entry.credentials != *credentials {
                // Known quirk: without an edit to dirty the cache, a hit is
                // served even for different credentials
                output.dimmed(&format!(
                    "Serving projects cached for {}; edit a credential field to refetch",
                    entry.credentials.server_url
                ));
            }
        }

        match &state.entry {
            Some(entry) => entry.projects.clone(),
            None => Vec::new(),
        }
    }
}

impl Default for ProjectCache {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch(client: &dyn DeployClient, output: &dyn Output, credentials: &Credentials) -> Vec<String> {
    if !credentials.is_complete() {
        return Vec::new();
    }

    match client.list_projects(credentials) {
        Ok(projects) => projects,
        Err(e) => {
            output.warning(&format!(
                "Failed to retrieve projects from {}: {}",
                credentials.server_url, e
            ));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockDeployClient, MockOutput};

    fn credentials() -> Credentials {
        Credentials::new("https://deploy.example.com", "secret")
    }

    #[test]
    fn test_second_lookup_is_served_from_cache() {
        let client = MockDeployClient::new().with_projects(&["OrderService", "Billing"]);
        let output = MockOutput::new();
        let cache = ProjectCache::new();

        let first = cache.projects(&client, &output, &credentials());
        let second = cache.projects(&client, &output, &credentials());

        assert_eq!(first, vec!["OrderService", "Billing"]);
        assert_eq!(second, first);
        assert_eq!(client.calls().projects, 1);
    }

    #[test]
    fn test_invalidate_forces_exactly_one_refetch() {
        let client = MockDeployClient::new().with_projects(&["OrderService"]);
        let output = MockOutput::new();
        let cache = ProjectCache::new();

        cache.projects(&client, &output, &credentials());
        cache.invalidate();
        cache.projects(&client, &output, &credentials());
        cache.projects(&client, &output, &credentials());

        assert_eq!(client.calls().projects, 2);
    }

    #[test]
    fn test_incomplete_credentials_never_hit_the_server() {
        let client = MockDeployClient::new().with_projects(&["OrderService"]);
        let output = MockOutput::new();
        let cache = ProjectCache::new();

        let projects = cache.projects(&client, &output, &Credentials::new("", "secret"));

        assert!(projects.is_empty());
        assert_eq!(client.calls().projects, 0);
    }

    #[test]
    fn test_fetch_failure_degrades_to_empty_and_warns() {
        let client = MockDeployClient::new();
        let output = MockOutput::new();
        let cache = ProjectCache::new();

        let projects = cache.projects(&client, &output, &credentials());

        assert!(projects.is_empty());
        assert!(output.has_warning());
    }

    #[test]
    fn test_failure_is_not_retried_until_invalidated() {
        let client = MockDeployClient::new();
        let output = MockOutput::new();
        let cache = ProjectCache::new();

        cache.projects(&client, &output, &credentials());
        cache.projects(&client, &output, &credentials());
        assert_eq!(client.calls().projects, 1);

        cache.invalidate();
        cache.projects(&client, &output, &credentials());
        assert_eq!(client.calls().projects, 2);
    }

    #[test]
    fn test_non_dirty_hit_ignores_changed_credentials() {
        let client = MockDeployClient::new().with_projects(&["OrderService"]);
        let output = MockOutput::new();
        let cache = ProjectCache::new();

        cache.projects(&client, &output, &credentials());
        let other = Credentials::new("https://other.example.com", "other-token");
        let projects = cache.projects(&client, &output, &other);

        // Dirtiness is the sole invalidation signal; the stale hit is served
        assert_eq!(projects, vec!["OrderService"]);
        assert_eq!(client.calls().projects, 1);
        assert_eq!(
            client.last_project_credentials().unwrap().server_url,
            "https://deploy.example.com"
        );
    }

    #[test]
    fn test_invalidate_refetches_with_the_new_credentials() {
        let client = MockDeployClient::new().with_projects(&["OrderService"]);
        let output = MockOutput::new();
        let cache = ProjectCache::new();

        cache.projects(&client, &output, &credentials());
        cache.invalidate();
        let other = Credentials::new("https://other.example.com", "other-token");
        cache.projects(&client, &output, &other);

        assert_eq!(client.calls().projects, 2);
        assert_eq!(
            client.last_project_credentials().unwrap().server_url,
            "https://other.example.com"
        );
    }
}
