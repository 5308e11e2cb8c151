use anyhow::{Result, bail};

use crate::context::Context as AppContext;
use crate::credentials::Credentials;
use crate::validation::{self, FieldCheck};

pub struct VerifyCommand;

impl VerifyCommand {
    /// Run the field checks and the explicit connection check, the way the
    /// editor would on a "verify connection" click
    pub fn execute(ctx: &AppContext, credentials: &Credentials) -> Result<()> {
        match validation::validate_server_url(&ctx.cache, &credentials.server_url) {
            FieldCheck::Error(e) => bail!("Server URL: {}", e),
            FieldCheck::Warning(w) => ctx.output.warning(&format!("Server URL: {}", w)),
            FieldCheck::Ok => {}
        }

        if let FieldCheck::Error(e) = validation::validate_auth_token(&ctx.cache, &credentials.token)
        {
            bail!("Authentication token: {}", e);
        }

        if let FieldCheck::Error(e) =
            validation::verify_connection(&*ctx.client, &ctx.cache, &*ctx.output, credentials)
        {
            bail!("{}", e);
        }

        ctx.output
            .success(&format!("Connected to {}", credentials.server_url));
        Ok(())
    }
}
