//! Group commands.

use clap::{Args, Subcommand};

use groupstore_core::{ApiPaths, StoreClient};

use super::resource::{self, CommandError, OutputFormat, PatchArgs};

/// Manage groups
#[derive(Args)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub command: GroupSubcommand,
}

#[derive(Subcommand)]
pub enum GroupSubcommand {
    /// List all groups
    List,

    /// Show a group's document and version
    Show {
        /// Group name
        name: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a new group (fails if it already exists)
    Create {
        /// Group name
        name: String,

        /// Initial document as a JSON object
        #[arg(long)]
        data: Option<String>,
    },

    /// Replace a group's document, provided it is still at the given version
    Replace {
        /// Group name
        name: String,

        /// Version the new document is based on
        #[arg(long)]
        if_match: String,

        /// New document as a JSON object
        #[arg(long)]
        data: String,
    },

    /// Change individual keys of a group's document
    Edit {
        /// Group name
        name: String,

        #[command(flatten)]
        patch: PatchArgs,

        /// Fail unless the group is at this version
        #[arg(long)]
        if_match: Option<String>,
    },

    /// Delete a group
    Delete {
        /// Group name
        name: String,

        /// Only delete if the group is at this version
        #[arg(long)]
        if_match: Option<String>,
    },
}

impl GroupCommand {
    pub async fn run(&self, client: &StoreClient, paths: &ApiPaths) -> Result<(), CommandError> {
        match &self.command {
            GroupSubcommand::List => resource::list(client, &paths.groups()).await,
            GroupSubcommand::Show { name, format } => {
                resource::show(client, &paths.group(name), format).await
            }
            GroupSubcommand::Create { name, data } => {
                resource::create(client, &paths.group(name), data.as_deref()).await
            }
            GroupSubcommand::Replace {
                name,
                if_match,
                data,
            } => resource::replace(client, &paths.group(name), if_match, data).await,
            GroupSubcommand::Edit {
                name,
                patch,
                if_match,
            } => resource::edit(client, &paths.group(name), patch, if_match.as_deref()).await,
            GroupSubcommand::Delete { name, if_match } => {
                resource::delete(client, &paths.group(name), if_match.as_deref()).await
            }
        }
    }
}
