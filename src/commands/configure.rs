use anyhow::{Result, bail};

use crate::commands::DeployCommand;
use crate::context::Context as AppContext;
use crate::credentials::Credentials;
use crate::resolver::CascadeResolver;
use crate::traits::DeployRequest;

pub struct ConfigureCommand;

impl ConfigureCommand {
    /// Walk the project -> environment -> package cascade interactively and
    /// emit the assembled step configuration
    pub fn execute(ctx: &AppContext, credentials: &Credentials, run: bool) -> Result<()> {
        ctx.output.section("Configure deploy step");

        let resolver = CascadeResolver::new(&*ctx.client, &ctx.cache, &*ctx.output);

        let projects = resolver.project_choices(credentials);
        if projects.is_empty() {
            bail!("No projects available; check the server URL and token with 'depstep verify'");
        }
        let project = ctx.input.select("Project", projects)?;

        let environments = resolver.environment_choices(credentials, &project);
        if environments.is_empty() {
            bail!("No environments available for project '{}'", project);
        }
        let environment = ctx.input.select("Environment", environments)?;

        // Never empty past this point; LATEST is always on offer
        let packages = resolver.package_choices(credentials, &project, &environment);
        let package_name = ctx.input.select("Package", packages)?;

        let asynchronous = ctx.input.confirm("Run the job asynchronously?", false)?;

        let request = DeployRequest {
            project,
            environment,
            package_name,
            poll_output: true,
            asynchronous,
        };

        ctx.output.blank();
        ctx.output.info("Step configuration:");
        ctx.output.lavender(&serde_json::to_string_pretty(&request)?);

        if run || ctx.input.confirm("Deploy now?", false)? {
            DeployCommand::execute(ctx, credentials, &request)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockDeployClient, MockOutput, MockResponse, MockUserInput};
    use std::sync::Arc;

    fn credentials() -> Credentials {
        Credentials::new("https://deploy.example.com", "secret")
    }

    fn cascade_client() -> MockDeployClient {
        MockDeployClient::new()
            .with_projects(&["OrderService"])
            .with_environments(&["Project [OrderService]", "PROD.cluster1.domainA.inst1"])
            .with_packages(&["null", "Deployment-55", "release-3"])
    }

    #[test]
    fn test_configure_walks_the_cascade() {
        let input = MockUserInput::with_responses(vec![
            MockResponse::Select("OrderService".to_string()),
            MockResponse::Select("PROD.cluster1.domainA.inst1".to_string()),
            MockResponse::Select("release-3".to_string()),
            MockResponse::Confirm(false),
            MockResponse::Confirm(false),
        ]);
        let output = Arc::new(MockOutput::new());
        let ctx = AppContext::test_with(
            Arc::new(cascade_client()),
            output.clone(),
            Arc::new(input),
        );

        ConfigureCommand::execute(&ctx, &credentials(), false).unwrap();

        let text = output.to_text();
        assert!(text.contains("\"project\": \"OrderService\""));
        assert!(text.contains("\"package_name\": \"release-3\""));
    }

    #[test]
    fn test_configure_with_run_deploys_without_asking() {
        let input = MockUserInput::with_responses(vec![
            MockResponse::Select("OrderService".to_string()),
            MockResponse::Select("PROD.cluster1.domainA.inst1".to_string()),
            MockResponse::Select("LATEST".to_string()),
            MockResponse::Confirm(false),
        ]);
        let client = Arc::new(cascade_client().with_deploy_output("Job 7 finished OK"));
        let output = Arc::new(MockOutput::new());
        let ctx = AppContext::test_with(client.clone(), output.clone(), Arc::new(input));

        ConfigureCommand::execute(&ctx, &credentials(), true).unwrap();

        assert_eq!(client.calls().deploys, 1);
        assert!(output.to_text().contains("Job 7 finished OK"));
    }

    #[test]
    fn test_configure_fails_up_front_without_projects() {
        let output = Arc::new(MockOutput::new());
        let ctx = AppContext::test_with(
            Arc::new(MockDeployClient::new()),
            output,
            Arc::new(MockUserInput::new()),
        );

        let result = ConfigureCommand::execute(&ctx, &credentials(), false);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("No projects available")
        );
    }
}
