use camino::{Utf8Path, Utf8PathBuf};

pub const DEFAULT_CLOUD_URL: &str = "https://cloud.netsblox.org";

const CONFIG_FILE: &str = "nbctl/config.toml";

pub fn default_config_path() -> Utf8PathBuf {
    dirs::config_dir()
        .as_deref()
        .and_then(Utf8Path::from_path)
        .map(|dir| dir.join(CONFIG_FILE))
        .unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE))
}
