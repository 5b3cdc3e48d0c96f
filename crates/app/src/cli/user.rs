//! `user` subcommands.

use bookshelf_app::{
    auth::{AuthService, PgAuthService},
    domain::users::{
        PgUsersService, UsersService,
        data::NewUser,
        records::{Role, UserUuid},
    },
    pagination::PageRequest,
};
use clap::{Args, Subcommand};

use super::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(flatten)]
    database: DatabaseArgs,

    #[command(subcommand)]
    action: UserAction,
}

#[derive(Debug, Subcommand)]
enum UserAction {
    /// Create a user and print a one-time API token for them
    Create {
        #[arg(long)]
        name: String,

        /// Must not already belong to another user
        #[arg(long)]
        email: String,

        /// customer, author or admin
        #[arg(long, default_value = "customer")]
        role: Role,
    },

    /// Page through users, newest first
    List {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,
    },
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    let db = command.database.connect().await?;

    match command.action {
        UserAction::Create { name, email, role } => {
            let user = PgUsersService::new(db.clone())
                .create_user(NewUser {
                    uuid: UserUuid::new(),
                    name,
                    email,
                    role,
                })
                .await
                .map_err(|error| format!("failed to create user: {error}"))?;

            let issued = PgAuthService::new(db.pool().clone())
                .issue_api_token(user.uuid, None)
                .await
                .map_err(|error| format!("user created but token issue failed: {error}"))?;

            println!("user={} role={} email={}", user.uuid, user.role, user.email);
            println!("api_token={}", issued.token);
            println!("# the token is shown once; store it now");
        }
        UserAction::List { page, per_page } => {
            let users = PgUsersService::new(db)
                .list_users(PageRequest::new(page, per_page))
                .await
                .map_err(|error| format!("failed to list users: {error}"))?;

            for user in &users.items {
                println!("{}\t{}\t{}\t{}", user.uuid, user.role, user.email, user.name);
            }

            println!("# {} of {} users", users.items.len(), users.total);
        }
    }

    Ok(())
}
