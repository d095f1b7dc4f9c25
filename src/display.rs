/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// engine. No game logic is performed; this module only translates engine
/// state, the HUD snapshot and loaded sprites into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use cat_hero::assets::{AssetStore, Visual};
use cat_hero::engine::{GameEngine, GameStatus};
use cat_hero::entities::{EnemyKind, Vec2};
use cat_hero::events::{format_time, HudSnapshot};
use cat_hero::records::Records;

/// World units covered by one terminal cell.
pub const CELL_W: f32 = 10.0;
pub const CELL_H: f32 = 20.0;

/// Sideways drift of a swaying decoration, in world units per radian.
const SWAY_REACH: f32 = 60.0;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_HP: Color = Color::Red;
const C_HUD_SHIELD: Color = Color::Cyan;
const C_HUD_TEXT: Color = Color::White;
const C_PROGRESS: Color = Color::Green;
const C_BANNER: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_BOAR: Color = Color::DarkYellow;
const C_WOLF: Color = Color::Grey;
const C_DYING: Color = Color::DarkGrey;
const C_BLAST: Color = Color::Yellow;
const C_PARTICLE: Color = Color::Magenta;
const C_SPARKLE: Color = Color::Yellow;
const C_MESSAGE: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Per-frame presentation state that lives outside the engine.
pub struct View<'a> {
    pub width: u16,
    pub height: u16,
    pub message: Option<&'a str>,
    pub records: &'a Records,
}

/// World-space size of the playfield for a terminal of the given size.
/// Row 0 is the HUD and the last row the progress line.
pub fn viewport_for(width: u16, height: u16) -> (f32, f32) {
    (width as f32 * CELL_W, height.saturating_sub(2) as f32 * CELL_H)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    engine: &GameEngine,
    assets: &AssetStore,
    view: &View,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if engine.status == GameStatus::Menu {
        draw_menu(out, engine, view)?;
    } else {
        draw_world(out, engine, assets, view)?;
        let hud = engine.snapshot();
        draw_hud(out, &hud, view)?;
        draw_progress(out, &hud, view)?;

        match engine.status {
            GameStatus::Paused => draw_paused(out, view)?,
            GameStatus::LevelComplete => draw_level_complete(out, &hud, view)?,
            GameStatus::Victory => draw_victory(out, engine, &hud, view)?,
            GameStatus::GameOver => draw_game_over(out, &hud, view)?,
            _ => {}
        }
    }

    if let Some(message) = view.message {
        let col = (view.width / 2).saturating_sub(message.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, 2))?;
        out.queue(style::SetForegroundColor(C_MESSAGE))?;
        out.queue(Print(message))?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Maps a world position to a playfield cell, if it is on screen.
fn to_cell(pos: Vec2, camera: Vec2, view: &View) -> Option<(u16, u16)> {
    let col = ((pos.x - camera.x) / CELL_W).floor();
    let row = ((pos.y - camera.y) / CELL_H).floor() + 1.0;
    let max_col = view.width.saturating_sub(2) as f32;
    let max_row = view.height.saturating_sub(2) as f32;
    if col < 0.0 || col > max_col || row < 1.0 || row > max_row {
        return None;
    }
    Some((col as u16, row as u16))
}

fn draw_at<W: Write>(
    out: &mut W,
    cell: Option<(u16, u16)>,
    color: Color,
    text: &str,
) -> std::io::Result<()> {
    if let Some((col, row)) = cell {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

/// Sprites become a solid block in their dominant colour; glyphs print as-is.
fn draw_visual<W: Write>(
    out: &mut W,
    cell: Option<(u16, u16)>,
    visual: Visual,
    glyph_color: Color,
) -> std::io::Result<()> {
    match visual {
        Visual::Raster(sprite) => {
            let (r, g, b) = sprite.color;
            draw_at(out, cell, Color::Rgb { r, g, b }, "██")
        }
        Visual::Glyph(glyph) => draw_at(out, cell, glyph_color, glyph),
    }
}

fn draw_world<W: Write>(
    out: &mut W,
    engine: &GameEngine,
    assets: &AssetStore,
    view: &View,
) -> std::io::Result<()> {
    let camera = engine.camera;
    let ground = engine
        .level()
        .background_rgb()
        .map(|(r, g, b)| Color::Rgb { r, g, b })
        .unwrap_or(Color::DarkGreen);

    for item in &engine.environment {
        let pos = Vec2::new(item.pos.x + item.sway() * SWAY_REACH * item.scale, item.pos.y);
        draw_at(out, to_cell(pos, camera, view), ground, item.glyph)?;
    }

    for item in &engine.collectibles {
        let pos = Vec2::new(item.pos.x, item.pos.y + item.float_offset());
        let cell = to_cell(pos, camera, view);
        draw_at(out, cell, C_HUD_TEXT, item.kind.glyph())?;
        if item.bounce_phase.sin() > 0.7 {
            draw_at(out, cell.map(|(col, row)| (col + 2, row)), C_SPARKLE, "✦")?;
        }
    }

    for enemy in &engine.enemies {
        let cell = to_cell(enemy.pos, camera, view);
        let key = enemy.sprite_key();
        let visual = assets.visual(&key, enemy.kind.glyph());
        let color = if enemy.fade() < 0.5 {
            C_DYING
        } else if enemy.kind == EnemyKind::Boar {
            C_BOAR
        } else {
            C_WOLF
        };
        draw_visual(out, cell, visual, color)?;
    }

    for blast in &engine.blasts {
        for step in 0..32 {
            let angle = step as f32 / 32.0 * std::f32::consts::TAU;
            let pos = Vec2::new(
                blast.pos.x + angle.cos() * blast.radius,
                blast.pos.y + angle.sin() * blast.radius,
            );
            let mark = if blast.alpha() > 0.5 { "*" } else { "·" };
            draw_at(out, to_cell(pos, camera, view), C_BLAST, mark)?;
        }
    }

    for particle in &engine.particles {
        let color = if particle.alpha() < 0.5 { C_DYING } else { C_PARTICLE };
        draw_at(out, to_cell(particle.pos, camera, view), color, particle.glyph)?;
    }

    // blink while invulnerable
    let blink = engine.is_invulnerable() && (engine.invulnerability.as_millis() / 200) % 2 == 1;
    if !blink {
        let player = &engine.player;
        let visual = assets.visual(player.sprite_key(), player.glyph());
        draw_visual(out, to_cell(player.pos, camera, view), visual, C_PLAYER)?;
    }

    Ok(())
}

// ── HUD (row 0) and progress (last row) ───────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, hud: &HudSnapshot, view: &View) -> std::io::Result<()> {
    let hearts = hud.hearts();
    let (hp, shield) = hearts.split_at(hearts.find('◆').unwrap_or(hearts.len()));
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(hp))?;
    out.queue(style::SetForegroundColor(C_HUD_SHIELD))?;
    out.queue(Print(shield))?;

    let counts = format!(
        "  Yarn:{}  Butterfly:{}  Fish:{}",
        hud.yarn_balls, hud.butterflies, hud.fish_treats
    );
    out.queue(style::SetForegroundColor(C_HUD_TEXT))?;
    out.queue(Print(&counts))?;

    let time = format!("Level {}  {}", hud.level_index + 1, hud.time_text());
    let col = view.width.saturating_sub(time.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(Print(&time))?;
    Ok(())
}

fn draw_progress<W: Write>(out: &mut W, hud: &HudSnapshot, view: &View) -> std::io::Result<()> {
    const BAR: usize = 20;
    let filled = (hud.progress() * BAR as f32).round() as usize;
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_PROGRESS))?;
    out.queue(Print(format!("[{}{}] ", "█".repeat(filled), "░".repeat(BAR - filled.min(BAR)))))?;
    out.queue(style::SetForegroundColor(C_BANNER))?;
    out.queue(Print(hud.progress_text()))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_box<W: Write>(out: &mut W, view: &View, lines: &[(String, Color)]) -> std::io::Result<()> {
    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, engine: &GameEngine, view: &View) -> std::io::Result<()> {
    let mut lines = vec![
        ("╔══════════════════════════════════╗".to_string(), Color::Cyan),
        ("║  CAT HERO'S BACKYARD ADVENTURE   ║".to_string(), Color::Cyan),
        ("╚══════════════════════════════════╝".to_string(), Color::Cyan),
        (String::new(), Color::White),
    ];
    for (i, level) in engine.config.levels.iter().enumerate() {
        lines.push((format!("{}. {} — {}", i + 1, level.name, level.description), Color::Green));
    }
    lines.push((String::new(), Color::White));
    if view.records.best_total_kills > 0 {
        lines.push((format!("Best run: {} kills", view.records.best_total_kills), Color::Yellow));
    }
    if let Some(ms) = view.records.fastest_victory_ms {
        let best = format_time(std::time::Duration::from_millis(ms));
        lines.push((format!("Fastest victory: {}", best), Color::Yellow));
    }
    lines.push(("ENTER : New Game   Q : Quit".to_string(), Color::White));
    lines.push((
        "Arrows / WASD : Move   SPACE : Attack   ESC : Pause".to_string(),
        C_HINT,
    ));
    draw_box(out, view, &lines)
}

fn draw_paused<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let lines = [
        ("╔════════════════╗".to_string(), Color::Cyan),
        ("║     PAUSED     ║".to_string(), Color::Cyan),
        ("╚════════════════╝".to_string(), Color::Cyan),
        ("ESC - Resume  M - Menu".to_string(), Color::White),
    ];
    draw_box(out, view, &lines)
}

fn collection_line(hud: &HudSnapshot) -> String {
    format!(
        "Yarn {}  Butterflies {}  Fish {}  Time {}",
        hud.yarn_balls,
        hud.butterflies,
        hud.fish_treats,
        hud.time_text()
    )
}

fn draw_level_complete<W: Write>(out: &mut W, hud: &HudSnapshot, view: &View) -> std::io::Result<()> {
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Green),
        ("║  LEVEL  COMPLETE!  ║".to_string(), Color::Green),
        ("╚════════════════════╝".to_string(), Color::Green),
        (collection_line(hud), Color::Yellow),
        ("ENTER - Next Level  M - Menu".to_string(), Color::White),
    ];
    draw_box(out, view, &lines)
}

fn draw_victory<W: Write>(
    out: &mut W,
    engine: &GameEngine,
    hud: &HudSnapshot,
    view: &View,
) -> std::io::Result<()> {
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Yellow),
        ("║      VICTORY!      ║".to_string(), Color::Yellow),
        ("╚════════════════════╝".to_string(), Color::Yellow),
        (collection_line(hud), Color::Yellow),
        (
            format!("Total kills {}  Total time {}", engine.total_kills, format_time(engine.total_time)),
            Color::White,
        ),
        ("ENTER - Play Again  M - Menu".to_string(), Color::White),
    ];
    draw_box(out, view, &lines)
}

fn draw_game_over<W: Write>(out: &mut W, hud: &HudSnapshot, view: &View) -> std::io::Result<()> {
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║     GAME  OVER     ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Total kills: {}", hud.total_kills), Color::Yellow),
        ("ENTER - Play Again".to_string(), Color::White),
    ];
    draw_box(out, view, &lines)
}
