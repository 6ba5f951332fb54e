//! Mint an access token for a user.
//!
//! Reads JWT_SECRET and JWT_ISSUER (optional) from the environment or `.env`.

use anyhow::Context;
use clap::Parser;
use reelhouse_api::auth::JwtService;
use serde::Serialize;
use uuid::Uuid;

const DEFAULT_JWT_ISSUER: &str = "reelhouse-access";

#[derive(Parser)]
#[command(name = "issue-token", about = "Issue a Reelhouse access token")]
struct Cli {
    /// User UUID to put in the `sub` claim (random when omitted)
    #[arg(long)]
    user_id: Option<Uuid>,
    /// Token lifetime in hours
    #[arg(long, default_value = "24")]
    ttl_hours: i64,
}

#[derive(Serialize)]
struct IssuedToken {
    user_id: Uuid,
    token: String,
    expires_in_seconds: i64,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.ttl_hours <= 0 {
        anyhow::bail!("--ttl-hours must be positive");
    }

    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    let issuer = std::env::var("JWT_ISSUER")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string());

    let user_id = cli.user_id.unwrap_or_else(Uuid::new_v4);
    let ttl = chrono::Duration::hours(cli.ttl_hours);
    let token = JwtService::new(&secret, issuer)
        .issue_token(user_id, ttl)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let issued = IssuedToken {
        user_id,
        token,
        expires_in_seconds: ttl.num_seconds(),
    };
    println!("{}", serde_json::to_string_pretty(&issued)?);
    Ok(())
}
