use anyhow::{Context, Result};

use crate::context::Context as AppContext;
use crate::credentials::Credentials;
use crate::traits::DeployRequest;

pub struct DeployCommand;

impl DeployCommand {
    /// Invoke the deployment and relay the server's job output
    pub fn execute(
        ctx: &AppContext,
        credentials: &Credentials,
        request: &DeployRequest,
    ) -> Result<()> {
        ctx.output.section("Deploying");
        ctx.output.key_value("Server URL", &credentials.server_url);
        ctx.output.key_value("Project", &request.project);
        ctx.output.key_value("Environment", &request.environment);
        ctx.output.key_value("Package", &request.package_name);
        ctx.output.key_value(
            "Asynchronous",
            if request.asynchronous { "yes" } else { "no" },
        );
        ctx.output.blank();

        let job_output = ctx
            .client
            .deploy(credentials, request)
            .context("Deployment invocation failed")?;

        ctx.output.info(&job_output);

        if request.asynchronous {
            ctx.output
                .dimmed("Job running asynchronously. Check the results here once finished:");
            ctx.output.lavender(&format!(
                "  {}/ws/feed/{}/list/jobs",
                credentials.server_url.trim_end_matches('/'),
                request.project
            ));
        }

        ctx.output.success("Deployment job submitted");
        Ok(())
    }
}
