//! Operator commands run against the store database.

use bookshelf_app::database::{self, Db};
use clap::{Args, Parser, Subcommand};

mod db;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "bookshelf-app", version, about = "Bookshelf operator CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create and list users
    User(user::UserCommand),
    /// Manage API tokens
    Token(token::TokenCommand),
    /// Schema maintenance
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Command::User(command) => user::run(command).await,
            Command::Token(command) => token::run(command).await,
            Command::Db(command) => db::run(command).await,
        }
    }
}

/// Connection settings shared by every command.
#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<Db, String> {
        let url = self
            .database_url
            .as_deref()
            .ok_or("DATABASE_URL is not set; pass --database-url")?;

        database::connect(url)
            .await
            .map(Db::new)
            .map_err(|error| format!("cannot reach database: {error}"))
    }
}
