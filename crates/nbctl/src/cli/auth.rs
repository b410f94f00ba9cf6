use clap::Parser;
use const_format::concatcp;
use eyre::{OptionExt, Result};
use netsblox_client::ClientError;
use netsblox_primitives::users::DEFAULT_STRATEGY;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::cli::Environment;
use crate::output::{InfoLine, LoginStatus, Principal};

pub const EXAMPLES: &str = r"
  # Log in, reading the password from stdin
  $ nbctl login admin

  # Log in through another strategy
  $ NETSBLOX_PASSWORD=secret nbctl login admin --strategy Snap!
";

#[derive(Debug, Parser)]
#[command(about = "Log in and save the session")]
#[command(after_help = concatcp!(
    "Examples:",
    EXAMPLES
))]
pub struct LoginCommand {
    /// Account to log in as
    pub username: String,

    /// Password; read from stdin when omitted
    #[arg(long, env = "NETSBLOX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Login strategy understood by the server
    #[arg(long, default_value = DEFAULT_STRATEGY)]
    pub strategy: String,
}

impl LoginCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        let password = match self.password {
            Some(password) => password,
            None => read_password().await?,
        };

        let username = environment
            .session
            .login_with_strategy(&self.username, &password, &self.strategy)
            .await?;

        environment.persist_session().await?;
        environment.output.write(&Principal { username });

        Ok(())
    }
}

async fn read_password() -> Result<String> {
    eprint!("Password: ");

    let mut line = String::new();
    let _read = BufReader::new(stdin()).read_line(&mut line).await?;

    let password = line.trim_end_matches(['\r', '\n']);
    (!password.is_empty())
        .then(|| password.to_owned())
        .ok_or_eyre("no password given")
}

#[derive(Copy, Clone, Debug, Parser)]
#[command(about = "End the session and forget the saved token")]
pub struct LogoutCommand;

impl LogoutCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        let result = environment.session.logout().await;

        environment.forget_session().await?;
        result?;

        environment.output.write(&InfoLine("Logged out"));

        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Parser)]
#[command(about = "Print the user the cloud associates with this session")]
pub struct WhoamiCommand;

impl WhoamiCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        let username = environment.session.whoami().await?;

        environment.output.write(&Principal { username });

        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Parser)]
#[command(about = "Check whether the saved session is still valid")]
pub struct StatusCommand;

impl StatusCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        // A rejected session is the answer here, not a failure.
        environment.session.set_error_hook(|err: &ClientError| {
            debug!(error = %err, "Session check failed");
        });

        let logged_in = environment.session.check_login().await;

        environment.output.write(&LoginStatus {
            logged_in,
            client: environment.session.client_state(),
        });

        Ok(())
    }
}
