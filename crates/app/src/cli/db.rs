use bookshelf_app::database;
use clap::{Args, Subcommand};

use super::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(flatten)]
    database: DatabaseArgs,

    #[command(subcommand)]
    action: DbAction,
}

#[derive(Debug, Subcommand)]
enum DbAction {
    /// Apply pending migrations
    Migrate,
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    let db = command.database.connect().await?;

    match command.action {
        DbAction::Migrate => {
            database::migrate(db.pool())
                .await
                .map_err(|error| format!("migration failed: {error}"))?;

            println!("schema is up to date");
        }
    }

    Ok(())
}
