/// Personal records kept between runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Records {
    #[serde(default)]
    pub best_total_kills: u32,
    #[serde(default)]
    pub victories: u32,
    #[serde(default)]
    pub fastest_victory_ms: Option<u64>,
}

impl Records {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".cat_hero_records.ron")
    }

    /// Missing or unreadable files yield fresh records.
    pub fn load(path: &Path) -> Records {
        if !path.exists() {
            return Records::default();
        }
        match std::fs::read_to_string(path) {
            Ok(text) => match ron::from_str(&text) {
                Ok(records) => records,
                Err(e) => {
                    warn!("ignoring corrupt records file {}: {}", path.display(), e);
                    Records::default()
                }
            },
            Err(e) => {
                warn!("could not read records file {}: {}", path.display(), e);
                Records::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text)?;
        info!("saved records to {}", path.display());
        Ok(())
    }

    /// Folds a finished run in. Returns true when anything improved.
    pub fn record_run(&mut self, total_kills: u32, victory_time: Option<Duration>) -> bool {
        let mut improved = false;
        if total_kills > self.best_total_kills {
            self.best_total_kills = total_kills;
            improved = true;
        }
        if let Some(time) = victory_time {
            self.victories += 1;
            improved = true;
            let ms = time.as_millis() as u64;
            if self.fastest_victory_ms.map_or(true, |best| ms < best) {
                self.fastest_victory_ms = Some(ms);
            }
        }
        improved
    }
}
