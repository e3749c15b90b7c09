use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Prefs file location. None = `<data dir>/tasks.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Key the task set is stored under inside the prefs file
    #[serde(default = "default_key")]
    pub key: String,
    /// Save after every mutation in the shell (otherwise only on exit and `save`)
    #[serde(default = "default_true")]
    pub autosave: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: None,
            key: default_key(),
            autosave: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Ring the terminal bell when a task is added
    #[serde(default)]
    pub bell: bool,
}

fn default_true() -> bool {
    true
}

fn default_key() -> String {
    "tasks".to_string()
}
