use color_eyre::owo_colors::OwoColorize;
use netsblox_client::ClientSnapshot;
use serde::Serialize;

use super::{table, Report};

/// The principal a command acted as.
#[derive(Debug, Serialize)]
pub struct Principal {
    pub username: String,
}

impl Report for Principal {
    fn report(&self) {
        println!("{}", self.username);
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    pub logged_in: bool,
    #[serde(flatten)]
    pub client: ClientSnapshot,
}

impl Report for LoginStatus {
    fn report(&self) {
        let status = if self.logged_in {
            "logged in".green().to_string()
        } else {
            "logged out".red().to_string()
        };

        let mut table = table(&["Status", "Username", "Client ID"]);
        let _ = table.add_row(vec![
            status,
            self.client.username.clone().unwrap_or_default(),
            self.client.client_id.clone().unwrap_or_default(),
        ]);

        println!("{table}");
    }
}
