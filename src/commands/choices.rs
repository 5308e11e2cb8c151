use anyhow::Result;

use crate::context::Context as AppContext;
use crate::credentials::Credentials;
use crate::resolver::CascadeResolver;

pub struct ChoicesCommand;

impl ChoicesCommand {
    /// List the deployable projects visible to these credentials
    pub fn execute_projects(ctx: &AppContext, credentials: &Credentials) -> Result<()> {
        let resolver = CascadeResolver::new(&*ctx.client, &ctx.cache, &*ctx.output);
        let projects = resolver.project_choices(credentials);

        print_choices(ctx, "Projects", &projects);
        Ok(())
    }

    /// List the environments configured for a project
    pub fn execute_environments(
        ctx: &AppContext,
        credentials: &Credentials,
        project: &str,
    ) -> Result<()> {
        let resolver = CascadeResolver::new(&*ctx.client, &ctx.cache, &*ctx.output);
        let environments = resolver.environment_choices(credentials, project);

        print_choices(ctx, &format!("Environments of {}", project), &environments);
        Ok(())
    }

    /// List the packages deployable to a project environment
    pub fn execute_packages(
        ctx: &AppContext,
        credentials: &Credentials,
        project: &str,
        environment: &str,
    ) -> Result<()> {
        let resolver = CascadeResolver::new(&*ctx.client, &ctx.cache, &*ctx.output);
        let packages = resolver.package_choices(credentials, project, environment);

        print_choices(ctx, &format!("Packages for {}", environment), &packages);
        Ok(())
    }
}

fn print_choices(ctx: &AppContext, title: &str, choices: &[String]) {
    ctx.output.section(title);

    if choices.is_empty() {
        ctx.output.dimmed("No choices available");
        return;
    }

    for name in choices {
        ctx.output.lavender(&format!("  {}", name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockDeployClient, MockOutput, MockUserInput};
    use std::sync::Arc;

    fn credentials() -> Credentials {
        Credentials::new("https://deploy.example.com", "secret")
    }

    #[test]
    fn test_projects_are_printed() {
        let client = Arc::new(MockDeployClient::new().with_projects(&["OrderService"]));
        let output = Arc::new(MockOutput::new());
        let ctx = AppContext::test_with(
            client,
            output.clone(),
            Arc::new(MockUserInput::new()),
        );

        ChoicesCommand::execute_projects(&ctx, &credentials()).unwrap();

        assert!(output.to_text().contains("OrderService"));
    }

    #[test]
    fn test_empty_choices_are_reported_not_failed() {
        let client = Arc::new(MockDeployClient::new());
        let output = Arc::new(MockOutput::new());
        let ctx = AppContext::test_with(
            client,
            output.clone(),
            Arc::new(MockUserInput::new()),
        );

        // The client fails outright, but the command still succeeds with an
        // empty listing
        ChoicesCommand::execute_projects(&ctx, &credentials()).unwrap();

        assert!(output.to_text().contains("No choices available"));
    }

    #[test]
    fn test_packages_listing_includes_the_sentinel() {
        let client = Arc::new(
            MockDeployClient::new()
                .with_projects(&["OrderService"])
                .with_packages(&["release-3"]),
        );
        let output = Arc::new(MockOutput::new());
        let ctx = AppContext::test_with(
            client,
            output.clone(),
            Arc::new(MockUserInput::new()),
        );

        ChoicesCommand::execute_packages(
            &ctx,
            &credentials(),
            "OrderService",
            "PROD.cluster1.domainA.inst1",
        )
        .unwrap();

        let text = output.to_text();
        assert!(text.contains("LATEST"));
        assert!(text.contains("release-3"));
    }
}
