use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(help = "User id placed in the token subject")]
    pub user_id: i64,
}

/// Issues a bearer token signed with the configured secret
pub async fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let claims = Claims::new(args.user_id);
    let token = generate_jwt(&claims).context("set SECURITY_JWT_SECRET to issue tokens")?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "sub": claims.sub, "exp": claims.exp })),
        )?,
    }
    Ok(())
}
