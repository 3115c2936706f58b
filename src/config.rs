use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_seconds_per_question")]
    pub seconds_per_question: u32,
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub player_name: String,
}

fn default_question_count() -> usize {
    9
}
fn default_seconds_per_question() -> u32 {
    25
}
fn default_load_delay_ms() -> u64 {
    400
}
fn default_theme() -> String {
    "neon".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            seconds_per_question: default_seconds_per_question(),
            load_delay_ms: default_load_delay_ms(),
            theme: default_theme(),
            player_name: String::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neonquiz")
            .join("config.toml")
    }

    /// Clamp numeric settings into playable ranges.
    pub fn validate(&mut self) {
        self.question_count = self.question_count.clamp(1, 50);
        self.seconds_per_question = self.seconds_per_question.clamp(5, 120);
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}
