/// Level descriptors: read-only data selected by index at level start.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Garden,
    Forest,
    Battlefield,
}

impl Theme {
    /// Glyph scattered across the map as ground decoration.
    pub fn decoration_glyph(self) -> &'static str {
        match self {
            Theme::Garden => "🌸",
            Theme::Forest => "🌲",
            Theme::Battlefield => "🗿",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// `#RRGGBB`; the terminal renderer tints the playfield with it.
    pub background_color: String,
    pub total_boars: u32,
    pub total_wolves: u32,
    pub target_kills: u32,
    pub theme: Theme,
    pub description: String,
}

impl Level {
    pub fn total_enemies(&self) -> u32 {
        self.total_boars + self.total_wolves
    }

    /// Parses `background_color` into RGB, if well-formed.
    pub fn background_rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.background_color.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

fn level(
    name: &str,
    background_color: &str,
    (total_boars, total_wolves, target_kills): (u32, u32, u32),
    theme: Theme,
    description: &str,
) -> Level {
    Level {
        name: name.to_string(),
        background_color: background_color.to_string(),
        total_boars,
        total_wolves,
        target_kills,
        theme,
        description: description.to_string(),
    }
}

/// Level table of the modular engine (1.5× the classic enemy counts).
pub fn default_levels() -> Vec<Level> {
    vec![
        level("Boar Invasion", "#7CB342", (30, 0, 30), Theme::Garden,
            "Defend the garden from wild boars!"),
        level("Wolf Pack Attack", "#66BB6A", (45, 8, 53), Theme::Forest,
            "Face the fierce wolf pack!"),
        level("Final Battle", "#42A5F5", (60, 15, 75), Theme::Battlefield,
            "The ultimate showdown!"),
    ]
}

/// Level table of the classic tuning (smaller enemy counts).
pub fn classic_levels() -> Vec<Level> {
    vec![
        level("Boar Invasion", "#7CB342", (20, 0, 20), Theme::Garden,
            "Defend the garden from wild boars!"),
        level("Wolf Pack Attack", "#66BB6A", (30, 5, 35), Theme::Forest,
            "Face the fierce wolf pack!"),
        level("Final Battle", "#42A5F5", (40, 10, 50), Theme::Battlefield,
            "The ultimate showdown!"),
    ]
}
