// called on startup and quit; remembers the operator's editor setup between
// sessions. patterns themselves live on the server, never on disk here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::curve::SamplerConfig;

const PULSETTY_DIR: &str = ".pulsetty";
const CONFIG_FILE: &str = "config.json";

/// Everything worth keeping between runs: where the collaborator lives,
/// which device we drive, and the sampler knobs as last set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditorConfig {
    pub server_url: String,
    pub device_id: String,
    pub sampler: SamplerConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            server_url: String::from("http://127.0.0.1:3000"),
            device_id: String::from("default"),
            sampler: SamplerConfig::default(),
        }
    }
}

// <session_dir>/.pulsetty/config.json
fn config_file_path(session_dir: &Path) -> PathBuf {
    session_dir.join(PULSETTY_DIR).join(CONFIG_FILE)
}

pub fn load_config(session_dir: &Path) -> Option<EditorConfig> {
    let path = config_file_path(session_dir);
    let data = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&data).ok()
}

// Save the editor config to disk, making the files if they don't exist already
pub fn save_config(session_dir: &Path, config: &EditorConfig) -> anyhow::Result<()> {
    let path = config_file_path(session_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?; // create .pulsetty/ if needed
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_disk() {
        let dir = std::env::temp_dir().join("pulsetty-config-test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        assert!(load_config(&dir).is_none());

        let mut config = EditorConfig::default();
        config.server_url = "http://10.0.0.7:8080".into();
        config.sampler.resolution = 24;
        save_config(&dir, &config).unwrap();

        let loaded = load_config(&dir).unwrap();
        assert_eq!(loaded.server_url, "http://10.0.0.7:8080");
        assert_eq!(loaded.sampler.resolution, 24);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
