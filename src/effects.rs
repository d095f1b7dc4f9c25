/// Short-lived visual effects. Both kinds count their `life` down and are
/// reaped by the engine once it reaches zero.

use std::time::Duration;

use rand::Rng;

use crate::entities::{frame_scale, Vec2};

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub glyph: &'static str,
    pub life: Duration,
    pub max_life: Duration,
}

impl Particle {
    pub fn new(pos: Vec2, glyph: &'static str, angle: f32, speed: f32, life: Duration) -> Self {
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            glyph,
            life,
            max_life: life,
        }
    }

    /// A burst of `count` particles flying out in random directions.
    pub fn burst(pos: Vec2, glyph: &'static str, count: usize, life: Duration, rng: &mut impl Rng) -> Vec<Particle> {
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(2.0..5.0);
            particles.push(Particle::new(pos, glyph, angle, speed, life));
        }
        particles
    }

    pub fn update(&mut self, dt: Duration) {
        let scale = frame_scale(dt);
        self.pos = self.pos + self.vel * scale;
        // velocity loses 2% per nominal frame
        self.vel = self.vel * 0.98_f32.powf(scale);
        self.life = self.life.saturating_sub(dt);
    }

    pub fn is_alive(&self) -> bool {
        !self.life.is_zero()
    }

    pub fn alpha(&self) -> f32 {
        self.life.as_secs_f32() / self.max_life.as_secs_f32()
    }
}

pub const BLAST_LIFE: Duration = Duration::from_millis(1000);

/// Expanding ring drawn when the weapon blast fires.
#[derive(Clone, Debug)]
pub struct WeaponBlast {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub life: Duration,
}

impl WeaponBlast {
    pub fn new(pos: Vec2, max_radius: f32) -> Self {
        Self {
            pos,
            radius: 0.0,
            max_radius,
            life: BLAST_LIFE,
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.life = self.life.saturating_sub(dt);
        let progress = 1.0 - self.life.as_secs_f32() / BLAST_LIFE.as_secs_f32();
        self.radius = progress * self.max_radius;
    }

    pub fn is_alive(&self) -> bool {
        !self.life.is_zero()
    }

    pub fn alpha(&self) -> f32 {
        self.life.as_secs_f32() / BLAST_LIFE.as_secs_f32()
    }
}
