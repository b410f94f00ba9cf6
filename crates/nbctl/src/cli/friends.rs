use clap::{Parser, Subcommand};
use eyre::Result;

use crate::cli::Environment;
use crate::output::FriendList;

#[derive(Debug, Parser)]
#[command(about = "Command for browsing friends")]
pub struct FriendsCommand {
    #[command(subcommand)]
    pub subcommand: FriendsSubCommands,
}

#[derive(Debug, Subcommand)]
pub enum FriendsSubCommands {
    #[command(alias = "ls")]
    List(ListCommand),
}

#[derive(Copy, Clone, Debug, Parser)]
#[command(about = "List friends of the logged in user")]
pub struct ListCommand {
    /// Only list friends that are currently online
    #[arg(long)]
    pub online: bool,
}

impl FriendsCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        match self.subcommand {
            FriendsSubCommands::List(list) => list.run(environment).await,
        }
    }
}

impl ListCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        let friends = if self.online {
            environment.client.list_online_friends().await?
        } else {
            environment.client.list_friends().await?
        };

        environment.output.write(&FriendList {
            online: self.online,
            friends,
        });

        Ok(())
    }
}
