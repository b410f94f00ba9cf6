use clap::{Parser, Subcommand};
use const_format::concatcp;
use eyre::Result;

use crate::cli::Environment;
use crate::output::ProjectList;

pub const EXAMPLES: &str = r"
  # List your projects
  $ nbctl projects ls

  # List projects shared with you
  $ nbctl projects ls --shared

  # List another user's projects
  $ nbctl projects ls --owner alice
";

#[derive(Debug, Parser)]
#[command(about = "Command for browsing projects")]
#[command(after_help = concatcp!(
    "Examples:",
    EXAMPLES
))]
pub struct ProjectsCommand {
    #[command(subcommand)]
    pub subcommand: ProjectsSubCommands,
}

#[derive(Debug, Subcommand)]
pub enum ProjectsSubCommands {
    #[command(alias = "ls")]
    List(ListCommand),
}

#[derive(Debug, Parser)]
#[command(about = "List projects")]
pub struct ListCommand {
    /// List projects shared with the user instead of owned by them
    #[arg(long)]
    pub shared: bool,

    /// User whose projects to list (defaults to the logged in user)
    #[arg(long, value_name = "USERNAME")]
    pub owner: Option<String>,
}

impl ProjectsCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        match self.subcommand {
            ProjectsSubCommands::List(list) => list.run(environment).await,
        }
    }
}

impl ListCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        let owner = self.owner.as_deref();
        let projects = if self.shared {
            environment.client.list_shared_projects(owner).await?
        } else {
            environment.client.list_user_projects(owner).await?
        };

        environment.output.write(&ProjectList { projects });

        Ok(())
    }
}
