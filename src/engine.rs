/// The game engine: state machine, per-frame update, spawning and combat.
///
/// The engine is the only thing that mutates world state. All randomness is
/// injected through `rng` arguments so callers control determinism (tests use
/// a seeded `StdRng`). Time comes in as measured frame deltas; nothing here
/// assumes a fixed frame rate.

use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::config::{AttackMode, GameConfig};
use crate::effects::{Particle, WeaponBlast};
use crate::entities::{
    frame_scale, Collectible, CollectibleKind, Enemy, EnemyKind, EnvironmentItem,
    EnvironmentKind, Player, Vec2,
};
use crate::events::{Banner, GameEvent, HudSnapshot};
use crate::input::InputState;
use crate::levels::{Level, Theme};

/// Damage dealt by the weapon blast; enough to kill anything.
const LETHAL_DAMAGE: u32 = 999;

const HIT_PARTICLE_LIFE: Duration = Duration::from_millis(800);
const PICKUP_PARTICLE_LIFE: Duration = Duration::from_millis(1000);
const BURST_SIZE: usize = 8;

/// Camera closes this fraction of the gap to its target per nominal frame.
const CAMERA_FOLLOW: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    Paused,
    GameOver,
    LevelComplete,
    Victory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Attacks are only accepted while playing.
    NotPlaying,
    /// Cooldown or a previous attack still in progress.
    OnCooldown,
    /// Nothing alive within range.
    Missed,
    Hit { hits: u32, kills: u32 },
    Blast { kills: u32 },
}

pub struct GameEngine {
    pub config: GameConfig,
    pub status: GameStatus,
    pub level_index: usize,
    pub level_time: Duration,
    pub total_time: Duration,

    pub max_hp: u32,
    pub current_hp: u32,
    pub shield_hp: u32,
    pub attack_range: f32,
    pub kill_streak: u32,
    pub total_kills: u32,
    pub enemies_killed: u32,
    pub weapon_blast_ready: bool,

    pub yarn_balls: u32,
    pub butterflies: u32,
    pub fish_treats: u32,

    pub attack_cooldown: Duration,
    pub attack_lock: Duration,
    pub invulnerability: Duration,

    pub spawn_timer: Duration,
    pub spawned_boars: u32,
    pub spawned_wolves: u32,

    /// Countdown back to the menu after a game over.
    pub menu_return: Option<Duration>,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub environment: Vec<EnvironmentItem>,
    pub particles: Vec<Particle>,
    pub blasts: Vec<WeaponBlast>,

    pub camera: Vec2,
    pub viewport: Vec2,

    events: Vec<GameEvent>,
}

impl GameEngine {
    /// `config` is expected to have passed `GameConfig::validate`.
    pub fn new(config: GameConfig) -> Self {
        let world = Vec2::new(config.world_width, config.world_height);
        Self {
            status: GameStatus::Menu,
            level_index: 0,
            level_time: Duration::ZERO,
            total_time: Duration::ZERO,
            max_hp: config.max_hp,
            current_hp: config.max_hp,
            shield_hp: 0,
            attack_range: config.base_attack_range,
            kill_streak: 0,
            total_kills: 0,
            enemies_killed: 0,
            weapon_blast_ready: false,
            yarn_balls: 0,
            butterflies: 0,
            fish_treats: 0,
            attack_cooldown: Duration::ZERO,
            attack_lock: Duration::ZERO,
            invulnerability: Duration::ZERO,
            spawn_timer: config.spawn.initial_delay(),
            spawned_boars: 0,
            spawned_wolves: 0,
            menu_return: None,
            player: Player::new(world * 0.5),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            environment: Vec::new(),
            particles: Vec::new(),
            blasts: Vec::new(),
            camera: Vec2::ZERO,
            viewport: Vec2::new(800.0, 600.0),
            events: Vec::new(),
            config,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn world(&self) -> Vec2 {
        Vec2::new(self.config.world_width, self.config.world_height)
    }

    pub fn level(&self) -> &Level {
        &self.config.levels[self.level_index]
    }

    pub fn is_invulnerable(&self) -> bool {
        !self.invulnerability.is_zero()
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.is_dead).count()
    }

    pub fn snapshot(&self) -> HudSnapshot {
        let banner = if self.weapon_blast_ready {
            Banner::BlastReady
        } else if self.kill_streak > 0 {
            Banner::Streak {
                current: self.kill_streak,
                threshold: self.config.streak_threshold,
            }
        } else {
            Banner::None
        };
        let level = self.level();
        HudSnapshot {
            status: self.status,
            level_index: self.level_index,
            level_name: level.name.clone(),
            current_hp: self.current_hp,
            max_hp: self.max_hp,
            shield_hp: self.shield_hp,
            yarn_balls: self.yarn_balls,
            butterflies: self.butterflies,
            fish_treats: self.fish_treats,
            elapsed: self.level_time,
            enemies_killed: self.enemies_killed,
            target_kills: level.target_kills,
            total_kills: self.total_kills,
            banner,
        }
    }

    /// Hands over every event produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.clamp_camera();
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn message(&mut self, text: &str) {
        self.events.push(GameEvent::Message(text.to_string()));
    }

    fn set_status(&mut self, to: GameStatus) {
        let from = self.status;
        if from == to {
            return;
        }
        info!("status {:?} -> {:?}", from, to);
        self.status = to;
        self.emit(GameEvent::StatusChanged { from, to });
    }

    // ── State machine ─────────────────────────────────────────────────────────

    /// Starts over from the first level. Accepted from any state.
    pub fn start_new_game(&mut self, rng: &mut impl Rng) {
        self.level_index = 0;
        self.total_kills = 0;
        self.total_time = Duration::ZERO;
        self.start_level(rng);
    }

    fn start_level(&mut self, rng: &mut impl Rng) {
        self.max_hp = self.config.max_hp;
        self.current_hp = self.max_hp;
        self.shield_hp = 0;
        self.attack_range = self.config.base_attack_range;
        self.kill_streak = 0;
        self.enemies_killed = 0;
        self.weapon_blast_ready = false;
        self.yarn_balls = 0;
        self.butterflies = 0;
        self.fish_treats = 0;
        self.level_time = Duration::ZERO;

        self.initialize_level(rng);

        let name = self.level().name.clone();
        info!("starting level {} ({})", self.level_index + 1, name);
        self.set_status(GameStatus::Playing);
        self.emit(GameEvent::LevelStarted { index: self.level_index, name });
    }

    fn initialize_level(&mut self, rng: &mut impl Rng) {
        let world = self.world();
        self.player = Player::new(world * 0.5);

        self.enemies.clear();
        self.collectibles.clear();
        self.environment.clear();
        self.particles.clear();
        self.blasts.clear();

        let theme = self.level().theme;
        self.create_environment(theme, rng);
        self.create_collectibles(rng);

        self.spawn_timer = self.config.spawn.initial_delay();
        self.spawned_boars = 0;
        self.spawned_wolves = 0;
        self.attack_cooldown = Duration::ZERO;
        self.attack_lock = Duration::ZERO;
        self.invulnerability = Duration::ZERO;
        self.menu_return = None;

        self.camera = self.camera_target();
        self.clamp_camera();
    }

    fn create_environment(&mut self, theme: Theme, rng: &mut impl Rng) {
        let world = self.world();
        let kind = match theme {
            Theme::Garden | Theme::Forest => EnvironmentKind::Flower,
            Theme::Battlefield => EnvironmentKind::Rock,
        };
        for _ in 0..self.config.decorations {
            let pos = Vec2::new(rng.gen_range(0.0..world.x), rng.gen_range(0.0..world.y));
            let item = EnvironmentItem::new(kind, theme.decoration_glyph(), pos, rng);
            self.environment.push(item);
        }
        for _ in 0..self.config.trees {
            let pos = Vec2::new(rng.gen_range(0.0..world.x), rng.gen_range(0.0..world.y));
            let item = EnvironmentItem::new(EnvironmentKind::Tree, "🌳", pos, rng);
            self.environment.push(item);
        }
    }

    fn create_collectibles(&mut self, rng: &mut impl Rng) {
        let world = self.world();
        // keep pickups away from the edges
        let margin = Vec2::new((world.x * 0.25).min(100.0), (world.y * 0.25).min(100.0));
        for kind in CollectibleKind::ALL {
            for _ in 0..self.config.collectibles_per_kind {
                let pos = Vec2::new(
                    rng.gen_range(margin.x..world.x - margin.x),
                    rng.gen_range(margin.y..world.y - margin.y),
                );
                let item = Collectible::new(kind, pos, rng);
                self.collectibles.push(item);
            }
        }
    }

    pub fn pause(&mut self) {
        if self.status == GameStatus::Playing {
            self.set_status(GameStatus::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.status == GameStatus::Paused {
            self.set_status(GameStatus::Playing);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.status {
            GameStatus::Playing => self.pause(),
            GameStatus::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn exit_to_menu(&mut self) {
        self.menu_return = None;
        self.set_status(GameStatus::Menu);
    }

    /// Advances past a completed level, or to victory after the last one.
    pub fn next_level(&mut self, rng: &mut impl Rng) {
        if self.status != GameStatus::LevelComplete {
            return;
        }
        if self.level_index + 1 < self.config.levels.len() {
            self.level_index += 1;
            self.start_level(rng);
        } else {
            info!("victory after {} kills", self.total_kills);
            self.set_status(GameStatus::Victory);
            self.message("Victory! The backyard is safe! 🏆");
        }
    }

    fn complete_level(&mut self) {
        info!(
            "level {} complete in {:?}",
            self.level_index + 1,
            self.level_time
        );
        self.set_status(GameStatus::LevelComplete);
    }

    fn game_over(&mut self) {
        self.player.die();
        self.menu_return = Some(self.config.game_over_delay());
        self.set_status(GameStatus::GameOver);
        self.message("Game Over! Try Again 💔");
    }

    // ── Per-frame update ──────────────────────────────────────────────────────

    /// Advances the simulation by `dt`. Only `Playing` simulates; after a
    /// game over the countdown back to the menu is the only thing that runs.
    pub fn update(&mut self, dt: Duration, input: &InputState, rng: &mut impl Rng) {
        match self.status {
            GameStatus::Playing => {}
            GameStatus::GameOver => {
                self.tick_menu_return(dt);
                return;
            }
            _ => return,
        }

        self.level_time += dt;
        self.total_time += dt;

        self.attack_cooldown = self.attack_cooldown.saturating_sub(dt);
        self.attack_lock = self.attack_lock.saturating_sub(dt);
        self.invulnerability = self.invulnerability.saturating_sub(dt);

        let world = self.world();
        self.player.update(input, world, dt);

        self.spawn_enemies(dt, rng);
        self.update_enemies(dt);
        self.enemies.retain(|e| !e.should_remove);

        self.update_collectibles(dt, rng);
        self.collectibles.retain(|c| !c.collected);

        for item in &mut self.environment {
            item.update(dt);
        }

        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(Particle::is_alive);
        for blast in &mut self.blasts {
            blast.update(dt);
        }
        self.blasts.retain(WeaponBlast::is_alive);

        self.update_camera(dt);
    }

    fn tick_menu_return(&mut self, dt: Duration) {
        if let Some(remaining) = self.menu_return {
            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                self.exit_to_menu();
            } else {
                self.menu_return = Some(remaining);
            }
        }
    }

    fn update_enemies(&mut self, dt: Duration) {
        let target = self.player.pos;
        let contact_distance = self.config.contact_distance;
        // the first bite grants invulnerability, so one hit per frame at most
        let mut invulnerable = self.is_invulnerable();
        let mut bitten = false;

        for enemy in &mut self.enemies {
            enemy.update(target, dt);
            if !enemy.is_dead
                && enemy.can_attack_player()
                && !invulnerable
                && enemy.pos.distance(target) < contact_distance
            {
                enemy.on_player_contact();
                invulnerable = true;
                bitten = true;
            }
        }

        if bitten {
            self.take_damage(1);
        }
    }

    fn update_collectibles(&mut self, dt: Duration, rng: &mut impl Rng) {
        let target = self.player.pos;
        let pickup_distance = self.config.pickup_distance;
        let mut picked = Vec::new();

        for item in &mut self.collectibles {
            item.update(dt);
            if !item.collected && item.pos.distance(target) < pickup_distance {
                item.collected = true;
                picked.push((item.kind, item.pos));
            }
        }

        for (kind, pos) in picked {
            self.collect_item(kind);
            self.particles
                .extend(Particle::burst(pos, kind.effect_glyph(), BURST_SIZE, PICKUP_PARTICLE_LIFE, rng));
        }
    }

    // ── Spawning ──────────────────────────────────────────────────────────────

    fn spawn_enemies(&mut self, dt: Duration, rng: &mut impl Rng) {
        self.spawn_timer = self.spawn_timer.saturating_sub(dt);
        if !self.spawn_timer.is_zero() {
            return;
        }

        // killed + alive == spawned, so what is left is the unspawned quota
        let total = self.level().total_enemies();
        let needed = total.saturating_sub(self.spawned_boars + self.spawned_wolves);
        if needed == 0 {
            return;
        }

        let batch = rng.gen_range(1..=self.config.spawn.max_batch).min(needed);
        for _ in 0..batch {
            self.spawn_random_enemy(rng);
        }

        let spawn = &self.config.spawn;
        let delay = rng.gen_range(spawn.min_delay_ms..=spawn.max_delay_ms);
        self.spawn_timer = Duration::from_millis(delay);
        debug!("spawned {} enemies, next attempt in {}ms", batch, delay);
    }

    fn spawn_random_enemy(&mut self, rng: &mut impl Rng) {
        let level = self.level();
        let boars_left = level.total_boars.saturating_sub(self.spawned_boars);
        let wolves_left = level.total_wolves.saturating_sub(self.spawned_wolves);

        let kind = if boars_left > 0 && wolves_left > 0 {
            if rng.gen_bool(self.config.spawn.boar_chance) {
                EnemyKind::Boar
            } else {
                EnemyKind::Wolf
            }
        } else if wolves_left > 0 {
            EnemyKind::Wolf
        } else if boars_left > 0 {
            EnemyKind::Boar
        } else {
            return;
        };

        let world = self.world();
        let offset = self.config.spawn.edge_offset;
        let pos = match rng.gen_range(0..4) {
            0 => Vec2::new(rng.gen_range(0.0..world.x), -offset),
            1 => Vec2::new(world.x + offset, rng.gen_range(0.0..world.y)),
            2 => Vec2::new(rng.gen_range(0.0..world.x), world.y + offset),
            _ => Vec2::new(-offset, rng.gen_range(0.0..world.y)),
        };

        match kind {
            EnemyKind::Boar => self.spawned_boars += 1,
            EnemyKind::Wolf => self.spawned_wolves += 1,
        }
        self.enemies.push(Enemy::new(kind, pos));
        self.emit(GameEvent::EnemySpawned { kind });
    }

    // ── Combat ────────────────────────────────────────────────────────────────

    pub fn perform_attack(&mut self, rng: &mut impl Rng) -> AttackOutcome {
        if self.status != GameStatus::Playing {
            return AttackOutcome::NotPlaying;
        }
        if !self.attack_cooldown.is_zero() || !self.attack_lock.is_zero() {
            return AttackOutcome::OnCooldown;
        }

        self.attack_cooldown = self.config.attack_cooldown();
        self.attack_lock = self.config.attack_lock();
        self.player.start_attack();

        if self.weapon_blast_ready {
            let kills = self.perform_weapon_blast();
            return AttackOutcome::Blast { kills };
        }

        let origin = self.player.pos;
        let range = self.attack_range * self.config.range_unit;
        let in_range = self
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_dead)
            .map(|(i, e)| (i, e.pos.distance(origin)))
            .filter(|&(_, d)| d <= range);

        let targets: Vec<usize> = match self.config.attack_mode {
            AttackMode::Area => in_range.map(|(i, _)| i).collect(),
            AttackMode::SingleTarget => in_range
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i)
                .into_iter()
                .collect(),
        };

        if targets.is_empty() {
            return AttackOutcome::Missed;
        }

        let mut hits = 0;
        let mut kills = 0;
        for index in targets {
            if self.status != GameStatus::Playing {
                break;
            }
            let enemy = &mut self.enemies[index];
            enemy.take_damage(1);
            let (pos, kind, dead) = (enemy.pos, enemy.kind, enemy.is_dead);
            hits += 1;
            self.particles
                .extend(Particle::burst(pos, "💥", BURST_SIZE, HIT_PARTICLE_LIFE, rng));
            if dead {
                kills += 1;
                self.on_enemy_killed(kind, true);
            }
        }
        self.message("Hit enemy! ⚔️");
        AttackOutcome::Hit { hits, kills }
    }

    /// Kills everything inside the blast radius. Consumes the charge and
    /// resets the streak; blast kills do not count toward the next one.
    fn perform_weapon_blast(&mut self) -> u32 {
        self.weapon_blast_ready = false;
        self.kill_streak = 0;

        let origin = self.player.pos;
        let radius = self.config.blast_radius;
        self.blasts.push(WeaponBlast::new(origin, radius));

        let mut kills = 0;
        for index in 0..self.enemies.len() {
            // a completed level stops counting
            if self.status != GameStatus::Playing {
                break;
            }
            let enemy = &mut self.enemies[index];
            if enemy.is_dead || enemy.pos.distance(origin) > radius {
                continue;
            }
            enemy.take_damage(LETHAL_DAMAGE);
            let kind = enemy.kind;
            kills += 1;
            // blast kills do not feed the next streak
            self.on_enemy_killed(kind, false);
        }

        info!("weapon blast killed {}", kills);
        self.emit(GameEvent::BlastFired { kills });
        self.message("SWORD BLAST! 💥");
        kills
    }

    fn on_enemy_killed(&mut self, kind: EnemyKind, extends_streak: bool) {
        if extends_streak {
            self.kill_streak += 1;
        }
        self.enemies_killed += 1;
        self.total_kills += 1;
        debug!("{:?} killed ({} this level)", kind, self.enemies_killed);
        self.emit(GameEvent::EnemyKilled { kind });

        if self.kill_streak >= self.config.streak_threshold && !self.weapon_blast_ready {
            self.weapon_blast_ready = true;
            self.emit(GameEvent::BlastReady);
            self.message("Weapon Blast Ready! ⚡");
        }

        self.check_level_complete();
    }

    fn check_level_complete(&mut self) {
        if self.status == GameStatus::Playing && self.enemies_killed >= self.level().target_kills {
            self.complete_level();
        }
    }

    // ── Damage and pickups ────────────────────────────────────────────────────

    /// Shield charges soak damage before HP does. Every hit opens the
    /// invulnerability window.
    pub fn take_damage(&mut self, amount: u32) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.invulnerability = self.config.invulnerability();

        if self.shield_hp > 0 {
            self.shield_hp = self.shield_hp.saturating_sub(amount);
            self.emit(GameEvent::ShieldAbsorbed { shield: self.shield_hp });
            self.message("Shield absorbed damage! 🛡️");
        } else {
            self.current_hp = self.current_hp.saturating_sub(amount);
            self.emit(GameEvent::PlayerDamaged { hp: self.current_hp });
            if self.current_hp == 0 {
                self.game_over();
            } else {
                self.message("Health lost! Find fish treats! 🐟");
            }
        }
    }

    pub fn collect_item(&mut self, kind: CollectibleKind) {
        match kind {
            CollectibleKind::Yarn => {
                self.yarn_balls += 1;
                self.attack_range += 0.5;
                self.message("Attack Range Increased! ⚔️");
            }
            CollectibleKind::Butterfly => {
                self.butterflies += 1;
                self.shield_hp += 2;
                self.message("Shield Activated! 🛡️");
            }
            CollectibleKind::Fish => {
                self.fish_treats += 1;
                self.current_hp = (self.current_hp + 1).min(self.max_hp);
                self.message("Health Restored! ❤️");
            }
        }
        self.emit(GameEvent::ItemCollected { kind });
    }

    // ── Camera ────────────────────────────────────────────────────────────────

    fn camera_target(&self) -> Vec2 {
        self.player.pos - self.viewport * 0.5
    }

    fn update_camera(&mut self, dt: Duration) {
        let factor = 1.0 - (1.0 - CAMERA_FOLLOW).powf(frame_scale(dt));
        let target = self.camera_target();
        self.camera = self.camera + (target - self.camera) * factor;
        self.clamp_camera();
    }

    fn clamp_camera(&mut self) {
        let world = self.world();
        let max_x = (world.x - self.viewport.x).max(0.0);
        let max_y = (world.y - self.viewport.y).max(0.0);
        self.camera.x = self.camera.x.clamp(0.0, max_x);
        self.camera.y = self.camera.y.clamp(0.0, max_y);
    }
}
