/// Sprite loading.
///
/// Every sprite is optional: a file that is missing or fails to decode is
/// logged and skipped, and the renderer falls back to the entity's glyph.
/// Loading runs on its own thread and is time-boxed so a slow disk never
/// holds up the first frame.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use image::RgbaImage;
use log::{info, warn};

use crate::error::Result;

pub const DEFAULT_ASSET_DIR: &str = "assets/img";

pub const LOAD_TIMEOUT: Duration = Duration::from_secs(3);

pub const SPRITE_FILES: [&str; 10] = [
    "avt_act_1.png",
    "avt_act_2.png",
    "avt_act_3.png",
    "avt_die_1.png",
    "boar_act_1.png",
    "boar_act_2.png",
    "boar_die_1.png",
    "wolf_act_1.png",
    "wolf_act_2.png",
    "wolf_die_1.png",
];

/// Flat colours the sprite sheets use for their fake-transparency
/// checkerboard.
const CHECKERBOARD: [(u8, u8, u8); 10] = [
    (192, 192, 192),
    (255, 255, 255),
    (204, 204, 204),
    (128, 128, 128),
    (160, 160, 160),
    (169, 169, 169),
    (211, 211, 211),
    (220, 220, 220),
    (240, 240, 240),
    (245, 245, 245),
];

pub fn is_checkerboard(r: u8, g: u8, b: u8) -> bool {
    CHECKERBOARD.contains(&(r, g, b)) || (r > 240 && g > 240 && b > 240)
}

/// A decoded sprite reduced to what a character-cell renderer can show.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Mean colour of the foreground pixels.
    pub color: (u8, u8, u8),
    /// Fraction of pixels that survived background removal.
    pub coverage: f32,
}

/// What to draw for an entity: its sprite when one loaded, else its glyph.
#[derive(Clone, Debug, PartialEq)]
pub enum Visual<'a> {
    Raster(&'a Sprite),
    Glyph(&'a str),
}

/// Strips the checkerboard background and averages what is left.
pub fn sprite_from_image(img: &RgbaImage) -> Sprite {
    let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
    for pixel in img.pixels() {
        let [pr, pg, pb, pa] = pixel.0;
        if pa == 0 || is_checkerboard(pr, pg, pb) {
            continue;
        }
        r += pr as u64;
        g += pg as u64;
        b += pb as u64;
        n += 1;
    }
    let total = (img.width() as u64 * img.height() as u64).max(1);
    let color = if n == 0 {
        (255, 255, 255)
    } else {
        ((r / n) as u8, (g / n) as u8, (b / n) as u8)
    };
    Sprite {
        color,
        coverage: n as f32 / total as f32,
    }
}

pub fn load_sprite(path: &Path) -> Result<Sprite> {
    let img = image::open(path)?.to_rgba8();
    Ok(sprite_from_image(&img))
}

/// Sprites keyed by file stem (`boar_act_1`).
#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    sprites: HashMap<String, Sprite>,
}

impl AssetStore {
    pub fn insert(&mut self, key: impl Into<String>, sprite: Sprite) {
        self.sprites.insert(key.into(), sprite);
    }

    pub fn get(&self, key: &str) -> Option<&Sprite> {
        self.sprites.get(key)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn visual<'a>(&'a self, key: &str, glyph: &'a str) -> Visual<'a> {
        match self.sprites.get(key) {
            Some(sprite) if sprite.coverage > 0.0 => Visual::Raster(sprite),
            _ => Visual::Glyph(glyph),
        }
    }

    /// Loads every file in `SPRITE_FILES` from `dir`; failures are logged
    /// and skipped.
    pub fn load_dir(dir: &Path) -> AssetStore {
        let mut store = AssetStore::default();
        for file in SPRITE_FILES {
            let path = dir.join(file);
            let key = file.trim_end_matches(".png");
            match load_sprite(&path) {
                Ok(sprite) => store.insert(key, sprite),
                Err(e) => warn!("failed to load {}: {}", path.display(), e),
            }
        }
        info!("loaded {}/{} sprites from {}", store.len(), SPRITE_FILES.len(), dir.display());
        store
    }

    /// `load_dir` on a worker thread; gives up after `timeout` and returns
    /// an empty store so every entity renders as its glyph.
    pub fn load_with_timeout(dir: PathBuf, timeout: Duration) -> AssetStore {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // receiver may have timed out already
            let _ = tx.send(AssetStore::load_dir(&dir));
        });
        match rx.recv_timeout(timeout) {
            Ok(store) => store,
            Err(_) => {
                warn!("sprite loading timed out after {:?}; using glyphs", timeout);
                AssetStore::default()
            }
        }
    }
}
