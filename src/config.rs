/// Tuning knobs for the engine, loadable from a RON file.
///
/// Every field has a default, so a config file only needs to name what it
/// changes:
///
/// ```ron
/// (
///     attack_mode: Area,
///     spawn: (max_batch: 1),
/// )
/// ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::levels::{classic_levels, default_levels, Level};

/// How a standard (non-blast) attack picks its victims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackMode {
    /// Damages every living enemy inside the attack radius.
    Area,
    /// Damages only the nearest living enemy inside the attack radius.
    SingleTarget,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub initial_delay_ms: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Upper bound of the random batch size (1 = one enemy per attempt).
    pub max_batch: u32,
    /// Probability of a boar when both quotas still have room.
    pub boar_chance: f64,
    /// How far outside the world edge new enemies appear.
    pub edge_offset: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1000,
            min_delay_ms: 800,
            max_delay_ms: 2000,
            max_batch: 3,
            boar_chance: 0.8,
            edge_offset: 50.0,
        }
    }
}

impl SpawnConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub max_hp: u32,
    pub base_attack_range: f32,
    /// World units per point of attack range.
    pub range_unit: f32,
    pub attack_mode: AttackMode,
    pub attack_cooldown_ms: u64,
    /// How long an attack blocks the next one regardless of cooldown.
    pub attack_lock_ms: u64,
    pub streak_threshold: u32,
    pub blast_radius: f32,
    pub contact_distance: f32,
    pub pickup_distance: f32,
    pub invulnerability_ms: u64,
    pub game_over_delay_ms: u64,
    pub collectibles_per_kind: u32,
    pub decorations: u32,
    pub trees: u32,
    pub spawn: SpawnConfig,
    pub levels: Vec<Level>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 1600.0,
            world_height: 1200.0,
            max_hp: 5,
            base_attack_range: 4.0,
            range_unit: 40.0,
            attack_mode: AttackMode::SingleTarget,
            attack_cooldown_ms: 500,
            attack_lock_ms: 300,
            streak_threshold: 10,
            blast_radius: 200.0,
            contact_distance: 35.0,
            pickup_distance: 30.0,
            invulnerability_ms: 2000,
            game_over_delay_ms: 3000,
            collectibles_per_kind: 3,
            decorations: 40,
            trees: 10,
            spawn: SpawnConfig::default(),
            levels: default_levels(),
        }
    }
}

impl GameConfig {
    /// Classic tuning: area attacks, one enemy
    /// per spawn and a slower, wider spawn interval.
    pub fn classic() -> Self {
        Self {
            attack_mode: AttackMode::Area,
            spawn: SpawnConfig {
                initial_delay_ms: 5000,
                min_delay_ms: 3000,
                max_delay_ms: 7000,
                max_batch: 1,
                ..SpawnConfig::default()
            },
            levels: classic_levels(),
            ..Self::default()
        }
    }

    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&text)?;
        log::info!(
            "loaded config from {} ({} levels, {:?})",
            path.as_ref().display(),
            config.levels.len(),
            config.attack_mode
        );
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(GameError::InvalidConfig("no levels defined".into()));
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.world_width) || !positive(self.world_height) {
            return Err(GameError::InvalidConfig("world size must be positive".into()));
        }
        let distances = [
            ("base_attack_range", self.base_attack_range),
            ("range_unit", self.range_unit),
            ("blast_radius", self.blast_radius),
            ("contact_distance", self.contact_distance),
            ("pickup_distance", self.pickup_distance),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(GameError::InvalidConfig(format!("{} must be a non-negative number", name)));
            }
        }
        if !self.spawn.edge_offset.is_finite() {
            return Err(GameError::InvalidConfig("spawn.edge_offset must be finite".into()));
        }
        if self.max_hp == 0 {
            return Err(GameError::InvalidConfig("max_hp must be at least 1".into()));
        }
        if self.spawn.max_batch == 0 {
            return Err(GameError::InvalidConfig("spawn.max_batch must be at least 1".into()));
        }
        if self.spawn.min_delay_ms > self.spawn.max_delay_ms {
            return Err(GameError::InvalidConfig(format!(
                "spawn delay range is inverted ({} > {})",
                self.spawn.min_delay_ms, self.spawn.max_delay_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn.boar_chance) {
            return Err(GameError::InvalidConfig("spawn.boar_chance must be within 0..=1".into()));
        }
        for level in &self.levels {
            if level.background_rgb().is_none() {
                return Err(GameError::InvalidConfig(format!(
                    "level '{}' has malformed background_color '{}' (expected #RRGGBB)",
                    level.name, level.background_color
                )));
            }
            if level.target_kills == 0 || level.target_kills > level.total_enemies() {
                return Err(GameError::InvalidConfig(format!(
                    "level '{}' needs {} kills but only has {} enemies",
                    level.name,
                    level.target_kills,
                    level.total_enemies()
                )));
            }
        }
        Ok(())
    }

    pub fn attack_cooldown(&self) -> Duration {
        Duration::from_millis(self.attack_cooldown_ms)
    }

    pub fn attack_lock(&self) -> Duration {
        Duration::from_millis(self.attack_lock_ms)
    }

    pub fn invulnerability(&self) -> Duration {
        Duration::from_millis(self.invulnerability_ms)
    }

    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }
}
