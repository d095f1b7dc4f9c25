/// What the engine tells the outside world. The engine never touches the
/// screen; a presentation layer drains `GameEvent`s and reads a
/// `HudSnapshot` each frame.

use std::time::Duration;

use crate::engine::GameStatus;
use crate::entities::{CollectibleKind, EnemyKind};

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    StatusChanged { from: GameStatus, to: GameStatus },
    LevelStarted { index: usize, name: String },
    EnemySpawned { kind: EnemyKind },
    EnemyKilled { kind: EnemyKind },
    PlayerDamaged { hp: u32 },
    ShieldAbsorbed { shield: u32 },
    ItemCollected { kind: CollectibleKind },
    BlastReady,
    BlastFired { kills: u32 },
    /// Transient feedback line, e.g. "Hit enemy! ⚔️".
    Message(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Banner {
    None,
    Streak { current: u32, threshold: u32 },
    BlastReady,
}

/// Everything the HUD shows, derived from engine state.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    pub status: GameStatus,
    pub level_index: usize,
    pub level_name: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub shield_hp: u32,
    pub yarn_balls: u32,
    pub butterflies: u32,
    pub fish_treats: u32,
    pub elapsed: Duration,
    pub enemies_killed: u32,
    pub target_kills: u32,
    pub total_kills: u32,
    pub banner: Banner,
}

impl HudSnapshot {
    /// Level progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.target_kills == 0 {
            return 1.0;
        }
        (self.enemies_killed as f32 / self.target_kills as f32).min(1.0)
    }

    pub fn hearts(&self) -> String {
        let mut out = String::new();
        for i in 0..self.max_hp {
            out.push_str(if i < self.current_hp { "♥" } else { "♡" });
        }
        for _ in 0..self.shield_hp {
            out.push('◆');
        }
        out
    }

    pub fn progress_text(&self) -> String {
        let base = format!(
            "{}/{} enemies defeated - {}",
            self.enemies_killed, self.target_kills, self.level_name
        );
        match &self.banner {
            Banner::None => base,
            Banner::Streak { current, threshold } => {
                format!("{} | Kill Streak: {}/{}", base, current, threshold)
            }
            Banner::BlastReady => format!("{} | ⚡ SWORD BLAST READY! ⚡", base),
        }
    }

    pub fn time_text(&self) -> String {
        format_time(self.elapsed)
    }
}

/// `m:ss`, minutes unbounded.
pub fn format_time(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
