/// World entities: plain data plus the small per-entity behaviors the
/// engine drives every frame. Entities never reach back into the engine.

use std::ops::{Add, Mul, Sub};
use std::time::Duration;

use rand::Rng;

use crate::input::InputState;

/// Speeds and per-frame decay factors are tuned against this frame length;
/// `frame_scale` converts a measured delta into "nominal frames".
pub const NOMINAL_FRAME: Duration = Duration::from_millis(16);

/// How long a dead enemy lingers (fading) before it is reaped.
pub const DEATH_ANIMATION: Duration = Duration::from_millis(1000);

/// Player attack pose duration.
pub const ATTACK_ANIMATION: Duration = Duration::from_millis(300);

pub fn frame_scale(dt: Duration) -> f32 {
    dt.as_secs_f32() / NOMINAL_FRAME.as_secs_f32()
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    Idle,
    /// Alternating walk frame (0 or 1).
    Walk(u8),
    Attack,
    Die,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// World units per nominal frame.
    pub speed: f32,
    /// Collision radius; also keeps the player this far from the world edge.
    pub size: f32,
    pub action: PlayerAction,
    pub is_attacking: bool,
    pub attack_timer: Duration,
    pub anim_time: f32,
    pub is_dead: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            speed: 3.0,
            size: 40.0,
            action: PlayerAction::Idle,
            is_attacking: false,
            attack_timer: Duration::ZERO,
            anim_time: 0.0,
            is_dead: false,
        }
    }

    pub fn update(&mut self, input: &InputState, world: Vec2, dt: Duration) {
        if self.is_dead {
            return;
        }
        let scale = frame_scale(dt);
        self.anim_time += 0.1 * scale;

        let (dx, dy) = input.direction();
        self.vel = Vec2::new(dx, dy) * self.speed;
        self.pos = self.pos + self.vel * scale;

        self.pos.x = self.pos.x.max(self.size).min(world.x - self.size);
        self.pos.y = self.pos.y.max(self.size).min(world.y - self.size);

        if self.is_attacking {
            self.action = PlayerAction::Attack;
            self.attack_timer += dt;
            if self.attack_timer >= ATTACK_ANIMATION {
                self.is_attacking = false;
                self.attack_timer = Duration::ZERO;
            }
        } else if input.is_moving() {
            self.action = PlayerAction::Walk(((self.anim_time * 5.0) as u32 % 2) as u8);
        } else {
            self.action = PlayerAction::Idle;
        }
    }

    pub fn start_attack(&mut self) {
        self.is_attacking = true;
        self.attack_timer = Duration::ZERO;
    }

    pub fn die(&mut self) {
        self.is_dead = true;
        self.action = PlayerAction::Die;
        self.vel = Vec2::ZERO;
    }

    pub fn sprite_key(&self) -> &'static str {
        match self.action {
            PlayerAction::Idle => "avt_act_1",
            PlayerAction::Walk(0) | PlayerAction::Attack => "avt_act_2",
            PlayerAction::Walk(_) => "avt_act_3",
            PlayerAction::Die => "avt_die_1",
        }
    }

    pub fn glyph(&self) -> &'static str {
        "🐱"
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Boar,
    Wolf,
}

impl EnemyKind {
    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Boar => 1.5,
            EnemyKind::Wolf => 2.0,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            EnemyKind::Boar => 35.0,
            EnemyKind::Wolf => 40.0,
        }
    }

    pub fn max_hp(self) -> u32 {
        match self {
            EnemyKind::Boar => 1,
            EnemyKind::Wolf => 2,
        }
    }

    /// Wolves bite again sooner than boars.
    pub fn contact_cooldown(self) -> Duration {
        match self {
            EnemyKind::Boar => Duration::from_millis(2000),
            EnemyKind::Wolf => Duration::from_millis(1500),
        }
    }

    fn anim_rate(self) -> f32 {
        match self {
            EnemyKind::Boar => 3.0,
            EnemyKind::Wolf => 4.0,
        }
    }

    pub fn sprite_prefix(self) -> &'static str {
        match self {
            EnemyKind::Boar => "boar",
            EnemyKind::Wolf => "wolf",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            EnemyKind::Boar => "🐗",
            EnemyKind::Wolf => "🐺",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: EnemyKind,
    pub current_hp: u32,
    pub is_dead: bool,
    /// Set once the death animation has played out; the engine reaps it.
    pub should_remove: bool,
    pub contact_cooldown: Duration,
    pub death_timer: Duration,
    pub anim_time: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            kind,
            current_hp: kind.max_hp(),
            is_dead: false,
            should_remove: false,
            contact_cooldown: Duration::ZERO,
            death_timer: Duration::ZERO,
            anim_time: 0.0,
        }
    }

    pub fn max_hp(&self) -> u32 {
        self.kind.max_hp()
    }

    /// Chase `target` at the kind's speed; dead enemies only run their
    /// death countdown.
    pub fn update(&mut self, target: Vec2, dt: Duration) {
        let scale = frame_scale(dt);
        self.anim_time += 0.1 * scale;
        self.contact_cooldown = self.contact_cooldown.saturating_sub(dt);

        if self.is_dead {
            self.death_timer += dt;
            if self.death_timer >= DEATH_ANIMATION {
                self.should_remove = true;
            }
            return;
        }

        let delta = target - self.pos;
        let distance = delta.length();
        if distance > 0.0 {
            self.vel = delta * (self.kind.speed() / distance);
        }
        self.pos = self.pos + self.vel * scale;
    }

    pub fn take_damage(&mut self, amount: u32) {
        if self.is_dead {
            return;
        }
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.current_hp == 0 {
            self.die();
        }
    }

    pub fn die(&mut self) {
        self.is_dead = true;
        self.current_hp = 0;
        self.vel = Vec2::ZERO;
        self.death_timer = Duration::ZERO;
    }

    pub fn can_attack_player(&self) -> bool {
        self.contact_cooldown.is_zero()
    }

    pub fn on_player_contact(&mut self) {
        self.contact_cooldown = self.kind.contact_cooldown();
    }

    pub fn sprite_key(&self) -> String {
        let action = if self.is_dead {
            "die_1"
        } else if (self.anim_time * self.kind.anim_rate()) as u32 % 2 == 0 {
            "act_1"
        } else {
            "act_2"
        };
        format!("{}_{}", self.kind.sprite_prefix(), action)
    }

    /// Opacity while the death animation plays (1.0 when alive).
    pub fn fade(&self) -> f32 {
        if !self.is_dead {
            return 1.0;
        }
        1.0 - (self.death_timer.as_secs_f32() / DEATH_ANIMATION.as_secs_f32()).min(1.0)
    }
}

// ── Collectibles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectibleKind {
    /// Permanently widens the attack range for the level.
    Yarn,
    /// Grants shield charges that absorb damage before HP.
    Butterfly,
    /// Heals one HP.
    Fish,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 3] =
        [CollectibleKind::Yarn, CollectibleKind::Butterfly, CollectibleKind::Fish];

    pub fn glyph(self) -> &'static str {
        match self {
            CollectibleKind::Yarn => "🧶",
            CollectibleKind::Butterfly => "🦋",
            CollectibleKind::Fish => "🐟",
        }
    }

    /// Particle glyph for the pickup celebration.
    pub fn effect_glyph(self) -> &'static str {
        match self {
            CollectibleKind::Yarn => "⚔",
            CollectibleKind::Butterfly => "🛡",
            CollectibleKind::Fish => "❤",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Collectible {
    pub pos: Vec2,
    pub kind: CollectibleKind,
    pub collected: bool,
    pub anim_time: f32,
    pub bounce_phase: f32,
}

impl Collectible {
    pub fn new(kind: CollectibleKind, pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            kind,
            collected: false,
            anim_time: rng.gen_range(0.0..std::f32::consts::TAU),
            bounce_phase: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }

    pub fn update(&mut self, dt: Duration) {
        let scale = frame_scale(dt);
        self.anim_time += 0.05 * scale;
        self.bounce_phase += 0.1 * scale;
    }

    /// Vertical bob in world units.
    pub fn float_offset(&self) -> f32 {
        (self.anim_time * 3.0).sin() * 5.0
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvironmentKind {
    Flower,
    Tree,
    Rock,
}

/// Decoration only; no gameplay effect.
#[derive(Clone, Debug)]
pub struct EnvironmentItem {
    pub pos: Vec2,
    pub kind: EnvironmentKind,
    pub glyph: &'static str,
    pub scale: f32,
    pub anim_time: f32,
}

impl EnvironmentItem {
    pub fn new(kind: EnvironmentKind, glyph: &'static str, pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            kind,
            glyph,
            scale: rng.gen_range(0.8..1.2),
            anim_time: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.anim_time += 0.02 * frame_scale(dt);
    }

    /// Flowers sway; everything else stands still.
    pub fn sway(&self) -> f32 {
        match self.kind {
            EnvironmentKind::Flower => (self.anim_time * 0.5).sin() * 0.1,
            _ => 0.0,
        }
    }
}
