use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Color, Table};
use const_format::concatcp;
use eyre::{Report as EyreReport, Result};
use netsblox_client::{Client, ClientError, Credential, Session, SessionConfig};
use serde::{Serialize, Serializer};
use thiserror::Error as ThisError;
use tracing::warn;
use url::Url;

use crate::config::Config;
use crate::defaults;
use crate::output::{Format, Output, Report};

mod auth;
mod friends;
mod libraries;
mod network;
mod projects;

use auth::{LoginCommand, LogoutCommand, StatusCommand, WhoamiCommand};
use friends::FriendsCommand;
use libraries::LibrariesCommand;
use network::RoomsCommand;
use projects::ProjectsCommand;

pub const EXAMPLES: &str = r"
  # Log in and remember the session
  $ nbctl login admin

  # List your projects
  $ nbctl projects ls

  # List projects shared with you, as JSON
  $ nbctl --output-format json projects ls --shared
";

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(after_help = concatcp!(
    "Environment variables:\n",
    "  NETSBLOX_URL     Cloud to connect to\n",
    "  NBCTL_CONFIG     Path of the configuration file\n\n",
    "Examples:",
    EXAMPLES
))]
pub struct RootCommand {
    #[command(flatten)]
    pub args: RootArgs,

    #[command(subcommand)]
    pub action: SubCommands,
}

#[derive(Debug, Subcommand)]
pub enum SubCommands {
    Login(LoginCommand),
    Logout(LogoutCommand),
    Whoami(WhoamiCommand),
    Status(StatusCommand),
    Projects(ProjectsCommand),
    Friends(FriendsCommand),
    Libraries(LibrariesCommand),
    Rooms(RoomsCommand),
}

#[derive(Debug, Parser)]
pub struct RootArgs {
    /// Configuration file holding the cloud URL and session
    #[arg(long, value_name = "PATH", default_value_t = defaults::default_config_path())]
    #[arg(env = "NBCTL_CONFIG", hide_env_values = true)]
    pub config: Utf8PathBuf,

    /// NetsBlox cloud URL
    #[arg(long, value_name = "URL", env = "NETSBLOX_URL")]
    pub url: Option<Url>,

    #[arg(long, value_name = "FORMAT", default_value_t, value_enum)]
    pub output_format: Format,
}

#[derive(Debug)]
pub struct Environment {
    pub output: Output,
    pub session: Session,
    pub client: Client,
    config: Config,
    config_path: Utf8PathBuf,
}

impl Environment {
    /// Opens a session against the configured cloud, restoring any saved
    /// credential.
    pub fn new(output: Output, config: Config, config_path: Utf8PathBuf, url: Url) -> Result<Self> {
        let mut session_config = SessionConfig::new(url);
        session_config.client_id.clone_from(&config.client_id);

        let session = Session::new(session_config)?;
        session.set_credential(config.token.clone().map(Credential::token));
        session.set_username(config.username.clone());

        let client = Client::new(session.clone());

        Ok(Self {
            output,
            session,
            client,
            config,
            config_path,
        })
    }

    fn session_token(&self) -> Option<String> {
        self.session
            .credential()
            .as_ref()
            .and_then(Credential::as_token)
            .map(str::to_owned)
    }

    /// Writes the session's current identity back to the config file.
    pub async fn persist_session(&mut self) -> Result<()> {
        self.config.token = self.session_token();
        self.config.username = self.session.username();
        if let Some(client_id) = self.session.client_id() {
            self.config.client_id = Some(client_id);
        }

        self.config.save(&self.config_path).await
    }

    /// Persists the session if a command rotated or dropped the credential.
    pub async fn sync_session(&mut self) -> Result<()> {
        let token = self.session_token();
        let username = self.session.username();
        if self.config.token == token && self.config.username == username {
            return Ok(());
        }

        self.persist_session().await
    }

    pub async fn forget_session(&mut self) -> Result<()> {
        self.config.forget_session();
        self.config.save(&self.config_path).await
    }
}

impl RootCommand {
    pub async fn run(self) -> Result<(), CliError> {
        let output = Output::new(self.args.output_format);

        let mut environment = match self.prepare_environment(output).await {
            Ok(environment) => environment,
            Err(err) => {
                let err = CliError::Other(err);
                Output::new(self.args.output_format).write(&err);
                return Err(err);
            }
        };

        let result = match self.action {
            SubCommands::Login(login) => login.run(&mut environment).await,
            SubCommands::Logout(logout) => logout.run(&mut environment).await,
            SubCommands::Whoami(whoami) => whoami.run(&mut environment).await,
            SubCommands::Status(status) => status.run(&mut environment).await,
            SubCommands::Projects(projects) => projects.run(&mut environment).await,
            SubCommands::Friends(friends) => friends.run(&mut environment).await,
            SubCommands::Libraries(libraries) => libraries.run(&mut environment).await,
            SubCommands::Rooms(rooms) => rooms.run(&mut environment).await,
        };

        let synced = environment.sync_session().await;
        let result = match (result, synced) {
            (Err(err), Err(sync_err)) => {
                warn!(error = %sync_err, "Failed to save the session");
                Err(err)
            }
            (result, synced) => result.and(synced),
        };

        if let Err(err) = result {
            let err = CliError::from_report(err);
            environment.output.write(&err);
            return Err(err);
        }

        Ok(())
    }

    async fn prepare_environment(&self, output: Output) -> Result<Environment> {
        let config = Config::load(&self.args.config).await?;

        let url = match (&self.args.url, &config.url) {
            (Some(url), _) | (None, Some(url)) => url.clone(),
            (None, None) => defaults::DEFAULT_CLOUD_URL.parse()?,
        };

        Environment::new(output, config, self.args.config.clone(), url)
    }
}

#[derive(Debug, Serialize, ThisError)]
pub enum CliError {
    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error(transparent)]
    Other(
        #[from]
        #[serde(serialize_with = "serialize_eyre_report")]
        EyreReport,
    ),
}

impl CliError {
    /// Separates errors the cloud answered with from everything else.
    fn from_report(report: EyreReport) -> Self {
        match report.downcast_ref::<ClientError>() {
            Some(ClientError::Request { status, message }) => Self::ApiError(ApiError {
                status_code: *status,
                message: message.clone(),
            }),
            _ => Self::Other(report),
        }
    }
}

impl From<CliError> for ExitCode {
    fn from(error: CliError) -> Self {
        match error {
            CliError::ApiError(_) => Self::from(101),
            CliError::Other(_) => Self::FAILURE,
        }
    }
}

impl Report for CliError {
    fn report(&self) {
        let mut table = Table::new();
        let _ = table.set_header(vec![Cell::new("ERROR").fg(Color::Red)]);
        let _ = table.add_row(vec![match self {
            Self::ApiError(e) => format!("API Error ({}): {}", e.status_code, e.message),
            Self::Other(e) => format!("Error: {e:?}"),
        }]);
        println!("{table}");
    }
}

#[derive(Debug, Serialize, ThisError)]
#[error("{status_code}: {message}")]
pub struct ApiError {
    pub status_code: u16,
    pub message: String,
}

fn serialize_eyre_report<S>(report: &EyreReport, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(report.chain().map(ToString::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_before_subcommand() {
        let command = RootCommand::try_parse_from([
            "nbctl",
            "--url",
            "http://localhost:7777",
            "--config",
            "/tmp/nbctl.toml",
            "--output-format",
            "json",
            "whoami",
        ])
        .unwrap();

        assert_eq!(
            command.args.url.as_ref().map(Url::as_str),
            Some("http://localhost:7777/")
        );
        assert_eq!(command.args.config, "/tmp/nbctl.toml");
        assert!(matches!(command.args.output_format, Format::Json));
        assert!(matches!(command.action, SubCommands::Whoami(_)));
    }

    #[tokio::test]
    async fn login_persists_token_and_logout_removes_it() {
        use std::fs;

        use tempfile::tempdir;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "netsblox=abc123; Path=/; HttpOnly")
                    .set_body_json(serde_json::json!({"username": "admin", "groupId": null})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/users/logout"))
            .and(header("cookie", "netsblox=abc123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let config_arg = config_path.to_str().unwrap();
        let uri = server.uri();

        RootCommand::try_parse_from([
            "nbctl", "--url", &uri, "--config", config_arg, "login", "admin", "--password", "pw",
        ])
        .unwrap()
        .run()
        .await
        .unwrap();

        let saved = fs::read_to_string(&config_path).unwrap();
        assert!(saved.contains("token = \"abc123\""));
        assert!(saved.contains("username = \"admin\""));

        RootCommand::try_parse_from(["nbctl", "--url", &uri, "--config", config_arg, "logout"])
            .unwrap()
            .run()
            .await
            .unwrap();

        let saved = fs::read_to_string(&config_path).unwrap();
        assert!(!saved.contains("token"));
        assert!(!saved.contains("username"));
    }

    #[tokio::test]
    async fn rotated_credentials_are_saved_after_any_command() {
        use std::fs;

        use tempfile::tempdir;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/whoami"))
            .and(header("cookie", "netsblox=old"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "netsblox=new; Path=/; HttpOnly")
                    .set_body_string("admin"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "token = \"old\"\nusername = \"admin\"\n").unwrap();
        let config_arg = config_path.to_str().unwrap();
        let uri = server.uri();

        RootCommand::try_parse_from(["nbctl", "--url", &uri, "--config", config_arg, "whoami"])
            .unwrap()
            .run()
            .await
            .unwrap();

        let saved = fs::read_to_string(&config_path).unwrap();
        assert!(saved.contains("token = \"new\""));
    }

    #[tokio::test]
    async fn rejected_session_is_forgotten() {
        use std::fs;

        use tempfile::tempdir;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/whoami"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "token = \"stale\"\nusername = \"admin\"\n").unwrap();
        let config_arg = config_path.to_str().unwrap();
        let uri = server.uri();

        RootCommand::try_parse_from(["nbctl", "--url", &uri, "--config", config_arg, "status"])
            .unwrap()
            .run()
            .await
            .unwrap();

        let saved = fs::read_to_string(&config_path).unwrap();
        assert!(!saved.contains("token"));
        assert!(!saved.contains("username"));
    }

    #[test]
    fn request_errors_become_api_errors() {
        let report = EyreReport::new(ClientError::Request {
            status: 401,
            message: "Invalid credentials".to_owned(),
        });

        let err = CliError::from_report(report);

        assert!(matches!(
            &err,
            CliError::ApiError(ApiError { status_code: 401, message }) if message == "Invalid credentials"
        ));
    }

    #[test]
    fn other_errors_keep_their_report() {
        let report = EyreReport::new(ClientError::ConnectionRefused {
            url: "http://127.0.0.1:1/users/whoami".to_owned(),
        });

        let err = CliError::from_report(report);

        assert!(matches!(err, CliError::Other(_)));
    }
}
