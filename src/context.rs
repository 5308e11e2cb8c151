use crate::resolver::ProjectCache;
use crate::traits::{
    DeployClient, HttpDeployClient, InquireUserInput, Output, TerminalOutput, UserInput,
};
#[cfg(test)]
use crate::traits::{MockDeployClient, MockOutput, MockUserInput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub client: Arc<dyn DeployClient>,
    pub output: Arc<dyn Output>,
    pub input: Arc<dyn UserInput>,
    pub cache: Arc<ProjectCache>,
}

impl Context {
    /// Create a new context with real implementations (for production use).
    /// Every context shares the one process-wide project cache.
    pub fn new() -> Self {
        Self {
            client: Arc::new(HttpDeployClient::new()),
            output: Arc::new(TerminalOutput),
            input: Arc::new(InquireUserInput),
            cache: ProjectCache::shared(),
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test() -> Self {
        Self {
            client: Arc::new(MockDeployClient::new()),
            output: Arc::new(MockOutput::new()),
            input: Arc::new(MockUserInput::new()),
            cache: Arc::new(ProjectCache::new()),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test_with(
        client: Arc<dyn DeployClient>,
        output: Arc<dyn Output>,
        input: Arc<dyn UserInput>,
    ) -> Self {
        Self {
            client,
            output,
            input,
            cache: Arc::new(ProjectCache::new()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            output: Arc::clone(&self.output),
            input: Arc::clone(&self.input),
            cache: Arc::clone(&self.cache),
        }
    }
}
