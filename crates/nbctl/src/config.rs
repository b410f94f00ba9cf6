use camino::Utf8Path;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

/// Persisted CLI state: which cloud to talk to and who is logged in there.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,

    /// Session token captured by `nbctl login`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl Config {
    pub async fn load(path: &Utf8Path) -> eyre::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("failed to read {path}"))?;

        let config = toml::from_str(&contents).wrap_err_with(|| format!("invalid config {path}"))?;

        Ok(config)
    }

    pub async fn save(&self, path: &Utf8Path) -> eyre::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;

        fs::write(path, contents)
            .await
            .wrap_err_with(|| format!("failed to write {path}"))?;

        // Owner-only while a token is stored.
        #[cfg(unix)]
        if self.token.is_some() {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;

            fs::set_permissions(path, Permissions::from_mode(0o600))
                .await
                .wrap_err_with(|| format!("failed to restrict permissions of {path}"))?;
        }

        Ok(())
    }

    pub fn forget_session(&mut self) {
        self.token = None;
        self.username = None;
    }
}
