//! `token` subcommands: issue, list and revoke API tokens.

use bookshelf_app::{
    auth::{ApiTokenMetadata, AuthService, PgAuthService},
    domain::users::records::UserUuid,
};
use clap::{Args, Subcommand};
use jiff::Timestamp;
use uuid::Uuid;

use super::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(flatten)]
    database: DatabaseArgs,

    #[command(subcommand)]
    action: TokenAction,
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    /// Issue another API token for an existing user
    Issue {
        /// Owner of the new token
        #[arg(long)]
        user: Uuid,

        /// Expiry as an RFC 3339 timestamp; tokens never expire without one
        #[arg(long, value_parser = future_timestamp)]
        expires_at: Option<Timestamp>,
    },

    /// Show every token a user holds, revoked ones included
    List {
        #[arg(long)]
        user: Uuid,
    },

    /// Revoke a token so it stops authenticating
    Revoke {
        #[arg(long)]
        token: Uuid,
    },
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    let auth = PgAuthService::new(command.database.connect().await?.pool().clone());

    match command.action {
        TokenAction::Issue { user, expires_at } => {
            let issued = auth
                .issue_api_token(UserUuid::from_uuid(user), expires_at)
                .await
                .map_err(|error| format!("failed to issue token: {error}"))?;

            print_token(&issued.metadata);
            println!("api_token={}", issued.token);
            println!("# the token is shown once; store it now");
        }
        TokenAction::List { user } => {
            let tokens = auth
                .list_api_tokens(UserUuid::from_uuid(user))
                .await
                .map_err(|error| format!("failed to list tokens: {error}"))?;

            if tokens.is_empty() {
                println!("# user {user} holds no tokens");
            }

            for token in &tokens {
                print_token(token);
                println!();
            }
        }
        TokenAction::Revoke { token } => {
            let revoked = auth
                .revoke_api_token(token)
                .await
                .map_err(|error| format!("failed to revoke token: {error}"))?;

            let outcome = if revoked { "revoked" } else { "already inactive" };

            println!("{token} {outcome}");
        }
    }

    Ok(())
}

fn print_token(token: &ApiTokenMetadata) {
    let or = |value: Option<Timestamp>, fallback: &str| {
        value.map_or_else(|| fallback.to_string(), |at| at.to_string())
    };

    println!("token={} owner={} v{}", token.uuid, token.user_uuid, token.version.as_i16());
    println!("  created  {}", token.created_at);
    println!("  used     {}", or(token.last_used_at, "never"));
    println!("  expires  {}", or(token.expires_at, "never"));
    println!("  revoked  {}", or(token.revoked_at, "no"));
}

fn future_timestamp(raw: &str) -> Result<Timestamp, String> {
    let at: Timestamp = raw.parse().map_err(|error| format!("not an RFC 3339 timestamp: {error}"))?;

    if at <= Timestamp::now() {
        return Err("expiry must be in the future".to_string());
    }

    Ok(at)
}
