use clap::{Parser, Subcommand};
use eyre::Result;

use crate::cli::Environment;
use crate::output::LibraryList;

#[derive(Debug, Parser)]
#[command(about = "Command for browsing block libraries")]
pub struct LibrariesCommand {
    #[command(subcommand)]
    pub subcommand: LibrariesSubCommands,
}

#[derive(Debug, Subcommand)]
pub enum LibrariesSubCommands {
    #[command(alias = "ls")]
    List(ListCommand),
}

#[derive(Debug, Parser)]
#[command(about = "List libraries")]
pub struct ListCommand {
    /// List the public community libraries
    #[arg(long, conflicts_with = "owner")]
    pub community: bool,

    /// User whose libraries to list (defaults to the logged in user)
    #[arg(long, value_name = "USERNAME")]
    pub owner: Option<String>,
}

impl LibrariesCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        match self.subcommand {
            LibrariesSubCommands::List(list) => list.run(environment).await,
        }
    }
}

impl ListCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        let libraries = if self.community {
            environment.client.list_community_libraries().await?
        } else {
            environment
                .client
                .list_user_libraries(self.owner.as_deref())
                .await?
        };

        environment.output.write(&LibraryList { libraries });

        Ok(())
    }
}
