use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub sources_dir: PathBuf,
    pub env_name: String,
}

impl Default for Config {
    fn default() -> Self {
        let env_name = env::var("SUBC_ENV").unwrap_or_else(|_| String::from("default"));
        let base_dir = if cfg!(windows) {
            PathBuf::from(env::var("USERPROFILE").unwrap_or_else(|_| String::from(".")))
        } else {
            PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from(".")))
        };

        let sources_dir = if let Ok(custom_dir) = env::var("SUBC_SOURCES_DIR") {
            PathBuf::from(custom_dir)
        } else {
            // Prefer a local sources directory when one exists
            let local_sources = Path::new("./data/sources");
            if local_sources.is_dir() {
                local_sources.to_path_buf()
            } else {
                base_dir.join(".subc").join(&env_name).join("sources")
            }
        };

        Config {
            sources_dir,
            env_name,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = Self::get_config_path();
        if !config_path.exists() {
            return Config::default();
        }

        let contents = fs::read_to_string(&config_path).unwrap_or_default();
        serde_json::from_str(&contents).unwrap_or_default()
    }

    pub fn save(&self) -> io::Result<()> {
        let config_path = Self::get_config_path();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)
    }

    pub fn get_config_path() -> PathBuf {
        let env_name = env::var("SUBC_ENV").unwrap_or_else(|_| String::from("default"));
        let base_dir = if cfg!(windows) {
            PathBuf::from(env::var("USERPROFILE").unwrap_or_else(|_| String::from(".")))
        } else {
            PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from(".")))
        };
        base_dir.join(".subc").join(&env_name).join("config.json")
    }
}
