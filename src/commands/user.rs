//! User commands.

use clap::{Args, Subcommand};
use std::io::{self, BufRead, Write};

use groupstore_core::{ApiPaths, BasicCredentials, StoreClient};

use super::resource::{self, CommandError, OutputFormat, PatchArgs};

/// Manage users within a group
#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// List the users of a group
    List {
        /// Group name
        group: String,
    },

    /// Show a user's document and version
    Show {
        /// Group name
        group: String,

        /// User name
        user: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a new user (fails if it already exists)
    Create {
        /// Group name
        group: String,

        /// User name
        user: String,

        /// Initial document as a JSON object
        #[arg(long)]
        data: Option<String>,
    },

    /// Replace a user's document, provided it is still at the given version
    Replace {
        /// Group name
        group: String,

        /// User name
        user: String,

        /// Version the new document is based on
        #[arg(long)]
        if_match: String,

        /// New document as a JSON object
        #[arg(long)]
        data: String,
    },

    /// Change individual keys of a user's document
    Edit {
        /// Group name
        group: String,

        /// User name
        user: String,

        #[command(flatten)]
        patch: PatchArgs,

        /// Fail unless the user is at this version
        #[arg(long)]
        if_match: Option<String>,
    },

    /// Delete a user
    Delete {
        /// Group name
        group: String,

        /// User name
        user: String,

        /// Only delete if the user is at this version
        #[arg(long)]
        if_match: Option<String>,
    },

    /// Set a user's password
    Passwd {
        /// Group name
        group: String,

        /// User name
        user: String,

        /// New password (read from stdin if omitted)
        #[arg(long)]
        new_password: Option<String>,

        /// Authenticate as this user instead of the configured credentials
        #[arg(long, requires = "old_password")]
        as_user: Option<String>,

        /// Current password for --as-user
        #[arg(long, requires = "as_user")]
        old_password: Option<String>,
    },
}

impl UserCommand {
    pub async fn run(&self, client: &StoreClient, paths: &ApiPaths) -> Result<(), CommandError> {
        match &self.command {
            UserSubcommand::List { group } => resource::list(client, &paths.users(group)).await,
            UserSubcommand::Show {
                group,
                user,
                format,
            } => resource::show(client, &paths.user(group, user), format).await,
            UserSubcommand::Create { group, user, data } => {
                resource::create(client, &paths.user(group, user), data.as_deref()).await
            }
            UserSubcommand::Replace {
                group,
                user,
                if_match,
                data,
            } => resource::replace(client, &paths.user(group, user), if_match, data).await,
            UserSubcommand::Edit {
                group,
                user,
                patch,
                if_match,
            } => {
                resource::edit(client, &paths.user(group, user), patch, if_match.as_deref())
                    .await
            }
            UserSubcommand::Delete {
                group,
                user,
                if_match,
            } => resource::delete(client, &paths.user(group, user), if_match.as_deref()).await,
            UserSubcommand::Passwd {
                group,
                user,
                new_password,
                as_user,
                old_password,
            } => {
                let new_password = match new_password {
                    Some(p) => p.clone(),
                    None => prompt_password()?,
                };
                let override_credentials = match (as_user, old_password) {
                    (Some(name), Some(old)) => Some(BasicCredentials::new(name, old)),
                    _ => None,
                };

                client
                    .set_password(
                        &paths.password(group, user),
                        &new_password,
                        override_credentials.as_ref(),
                    )
                    .await?;
                println!("Password updated for {}/{}", group, user);
                Ok(())
            }
        }
    }
}

/// Reads a new password from stdin.
fn prompt_password() -> Result<String, CommandError> {
    print!("New password: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();

    if password.is_empty() {
        return Err(CommandError::InvalidArgument(
            "password cannot be empty".to_string(),
        ));
    }
    Ok(password)
}
