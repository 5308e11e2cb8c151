mod commands;
mod context;
mod credentials;
mod output;
mod resolver;
mod traits;
mod validation;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{ChoicesCommand, ConfigureCommand, DeployCommand, VerifyCommand};
use context::Context;
use credentials::Credentials;
use resolver::LATEST_PACKAGE;
use traits::DeployRequest;

#[derive(Parser)]
#[command(name = "depstep")]
#[command(about = "Configuration helper and step runner for deployment server pipelines", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ServerArgs {
    /// Deployment server URL, e.g. "https://deploy.example.com"
    #[arg(long, env = "DEPSTEP_SERVER_URL")]
    server_url: String,

    /// Authentication token for the deployment server
    #[arg(long, env = "DEPSTEP_TOKEN", hide_env_values = true)]
    token: String,
}

impl ServerArgs {
    fn credentials(&self) -> Credentials {
        Credentials::new(self.server_url.clone(), self.token.clone())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the deployable projects on the server
    Projects {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// List the environments of a project
    Environments {
        #[command(flatten)]
        server: ServerArgs,

        /// Project to list environments for
        #[arg(short, long)]
        project: String,
    },

    /// List the packages deployable to a project environment
    Packages {
        #[command(flatten)]
        server: ServerArgs,

        /// Project the environment belongs to
        #[arg(short, long)]
        project: String,

        /// Environment identifier, e.g. "PROD.cluster1.domainA.inst1"
        #[arg(short, long)]
        environment: String,
    },

    /// Check that the server is reachable with the given credentials
    Verify {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Interactively assemble a deploy step configuration
    Configure {
        #[command(flatten)]
        server: ServerArgs,

        /// Run the assembled step immediately
        #[arg(long)]
        run: bool,
    },

    /// Run a deploy step
    Deploy {
        #[command(flatten)]
        server: ServerArgs,

        /// Project to deploy
        #[arg(short, long)]
        project: String,

        /// Environment to deploy to
        #[arg(short, long)]
        environment: String,

        /// Package to deploy
        #[arg(short = 'k', long, default_value = LATEST_PACKAGE)]
        package: String,

        /// Do not stream the job output
        #[arg(long)]
        no_poll: bool,

        /// Submit the job asynchronously and return
        #[arg(long = "async")]
        asynchronous: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::new();

    match cli.command {
        Commands::Projects { server } => {
            ChoicesCommand::execute_projects(&ctx, &server.credentials())?;
        }
        Commands::Environments { server, project } => {
            ChoicesCommand::execute_environments(&ctx, &server.credentials(), &project)?;
        }
        Commands::Packages {
            server,
            project,
            environment,
        } => {
            ChoicesCommand::execute_packages(&ctx, &server.credentials(), &project, &environment)?;
        }
        Commands::Verify { server } => {
            VerifyCommand::execute(&ctx, &server.credentials())?;
        }
        Commands::Configure { server, run } => {
            ConfigureCommand::execute(&ctx, &server.credentials(), run)?;
        }
        Commands::Deploy {
            server,
            project,
            environment,
            package,
            no_poll,
            asynchronous,
        } => {
            let request = DeployRequest {
                project,
                environment,
                package_name: package,
                poll_output: !no_poll,
                asynchronous,
            };
            DeployCommand::execute(&ctx, &server.credentials(), &request)?;
        }
    }

    Ok(())
}
