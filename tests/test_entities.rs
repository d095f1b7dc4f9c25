use std::time::Duration;

use cat_hero::effects::{Particle, WeaponBlast};
use cat_hero::entities::*;
use cat_hero::input::InputState;

use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME: Duration = Duration::from_millis(16);
const WORLD: Vec2 = Vec2 { x: 1600.0, y: 1200.0 };

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── geometry ──────────────────────────────────────────────────────────────────

#[test]
fn vec2_arithmetic() {
    let a = Vec2::new(3.0, 4.0);
    assert_eq!(a.length(), 5.0);
    assert_eq!(a + Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
    assert_eq!(a - a, Vec2::ZERO);
    assert_eq!(a * 2.0, Vec2::new(6.0, 8.0));
    assert_eq!(Vec2::ZERO.distance(a), 5.0);
}

#[test]
fn frame_scale_is_relative_to_nominal_frame() {
    assert!((frame_scale(FRAME) - 1.0).abs() < 1e-6);
    assert!((frame_scale(Duration::from_millis(32)) - 2.0).abs() < 1e-6);
    assert_eq!(frame_scale(Duration::ZERO), 0.0);
}

// ── input ─────────────────────────────────────────────────────────────────────

#[test]
fn diagonal_input_is_normalized() {
    let input = InputState { up: true, right: true, ..InputState::default() };
    let (dx, dy) = input.direction();
    assert!((dx - 0.707).abs() < 1e-6);
    assert!((dy + 0.707).abs() < 1e-6);
}

#[test]
fn opposite_keys_cancel() {
    let input = InputState { left: true, right: true, ..InputState::default() };
    assert_eq!(input.direction(), (0.0, 0.0));
    assert!(!input.is_moving());
}

// ── player ────────────────────────────────────────────────────────────────────

#[test]
fn player_walks_and_idles() {
    let mut player = Player::new(Vec2::new(800.0, 600.0));
    assert_eq!(player.sprite_key(), "avt_act_1");

    player.update(&InputState { down: true, ..InputState::default() }, WORLD, FRAME);
    assert!(matches!(player.action, PlayerAction::Walk(_)));
    assert!((player.pos.y - 603.0).abs() < 1e-3);

    player.update(&InputState::default(), WORLD, FRAME);
    assert_eq!(player.action, PlayerAction::Idle);
}

#[test]
fn player_stays_inside_world() {
    let mut player = Player::new(Vec2::new(50.0, 50.0));
    let input = InputState { up: true, left: true, ..InputState::default() };
    for _ in 0..100 {
        player.update(&input, WORLD, FRAME);
    }
    assert_eq!(player.pos, Vec2::new(player.size, player.size));
}

#[test]
fn attack_pose_lasts_its_animation() {
    let mut player = Player::new(Vec2::new(800.0, 600.0));
    player.start_attack();
    player.update(&InputState::default(), WORLD, Duration::from_millis(100));
    assert_eq!(player.action, PlayerAction::Attack);
    assert_eq!(player.sprite_key(), "avt_act_2");

    player.update(&InputState::default(), WORLD, Duration::from_millis(200));
    assert!(!player.is_attacking);
    player.update(&InputState::default(), WORLD, FRAME);
    assert_eq!(player.action, PlayerAction::Idle);
}

#[test]
fn dead_player_does_not_move() {
    let mut player = Player::new(Vec2::new(800.0, 600.0));
    player.die();
    player.update(&InputState { right: true, ..InputState::default() }, WORLD, FRAME);
    assert_eq!(player.pos, Vec2::new(800.0, 600.0));
    assert_eq!(player.sprite_key(), "avt_die_1");
}

// ── enemies ───────────────────────────────────────────────────────────────────

#[test]
fn enemy_kinds_have_distinct_stats() {
    assert_eq!(EnemyKind::Boar.max_hp(), 1);
    assert_eq!(EnemyKind::Wolf.max_hp(), 2);
    assert!(EnemyKind::Wolf.speed() > EnemyKind::Boar.speed());
    assert!(EnemyKind::Wolf.contact_cooldown() < EnemyKind::Boar.contact_cooldown());
}

#[test]
fn enemy_chases_target() {
    let mut enemy = Enemy::new(EnemyKind::Wolf, Vec2::new(0.0, 0.0));
    enemy.update(Vec2::new(100.0, 0.0), FRAME);
    assert!((enemy.pos.x - 2.0).abs() < 1e-4);
    assert_eq!(enemy.pos.y, 0.0);
}

#[test]
fn enemy_on_target_does_not_produce_nan() {
    let mut enemy = Enemy::new(EnemyKind::Boar, Vec2::new(10.0, 10.0));
    enemy.update(Vec2::new(10.0, 10.0), FRAME);
    assert!(enemy.pos.x.is_finite() && enemy.pos.y.is_finite());
}

#[test]
fn damage_clamps_at_zero_and_kills() {
    let mut wolf = Enemy::new(EnemyKind::Wolf, Vec2::ZERO);
    wolf.take_damage(1);
    assert_eq!(wolf.current_hp, 1);
    assert!(!wolf.is_dead);
    wolf.take_damage(5);
    assert_eq!(wolf.current_hp, 0);
    assert!(wolf.is_dead);
}

#[test]
fn dead_enemy_is_removed_after_death_animation() {
    let mut boar = Enemy::new(EnemyKind::Boar, Vec2::ZERO);
    boar.die();
    boar.update(Vec2::new(100.0, 0.0), Duration::from_millis(500));
    assert_eq!(boar.pos, Vec2::ZERO);
    assert!(!boar.should_remove);
    assert!((boar.fade() - 0.5).abs() < 1e-3);
    assert_eq!(boar.sprite_key(), "boar_die_1");

    boar.update(Vec2::new(100.0, 0.0), Duration::from_millis(500));
    assert!(boar.should_remove);
}

#[test]
fn contact_cooldown_blocks_repeat_bites() {
    let mut wolf = Enemy::new(EnemyKind::Wolf, Vec2::ZERO);
    assert!(wolf.can_attack_player());
    wolf.on_player_contact();
    assert!(!wolf.can_attack_player());
    wolf.update(Vec2::ZERO, Duration::from_millis(1499));
    assert!(!wolf.can_attack_player());
    wolf.update(Vec2::ZERO, Duration::from_millis(1));
    assert!(wolf.can_attack_player());
}

#[test]
fn enemy_sprite_alternates_walk_frames() {
    let mut boar = Enemy::new(EnemyKind::Boar, Vec2::ZERO);
    assert_eq!(boar.sprite_key(), "boar_act_1");
    let mut seen_second = false;
    for _ in 0..10 {
        boar.update(Vec2::new(1000.0, 0.0), FRAME);
        seen_second |= boar.sprite_key() == "boar_act_2";
    }
    assert!(seen_second);
}

// ── collectibles and environment ──────────────────────────────────────────────

#[test]
fn collectible_bobs_in_place() {
    let mut rng = seeded_rng();
    let mut item = Collectible::new(CollectibleKind::Fish, Vec2::new(10.0, 10.0), &mut rng);
    item.update(FRAME);
    assert_eq!(item.pos, Vec2::new(10.0, 10.0));
    assert!(item.float_offset().abs() <= 5.0);
    assert!(!item.collected);
}

#[test]
fn only_flowers_sway() {
    let mut rng = seeded_rng();
    let tree = EnvironmentItem::new(EnvironmentKind::Tree, "🌳", Vec2::ZERO, &mut rng);
    assert_eq!(tree.sway(), 0.0);
    let flower = EnvironmentItem::new(EnvironmentKind::Flower, "🌸", Vec2::ZERO, &mut rng);
    assert!(flower.sway().abs() <= 0.1);
    assert!(flower.scale >= 0.8 && flower.scale < 1.2);
}

#[test]
fn flowers_sway_over_time() {
    let mut rng = seeded_rng();
    let mut flower = EnvironmentItem::new(EnvironmentKind::Flower, "🌸", Vec2::ZERO, &mut rng);
    let before = (flower.anim_time, flower.sway());
    flower.update(Duration::from_millis(800));
    assert!((flower.anim_time - (before.0 + 1.0)).abs() < 1e-4);
    assert_ne!(flower.sway(), before.1);
    assert_eq!(flower.pos, Vec2::ZERO);
}

// ── effects ───────────────────────────────────────────────────────────────────

#[test]
fn particles_slow_down_and_expire() {
    let mut rng = seeded_rng();
    let mut burst = Particle::burst(Vec2::ZERO, "💥", 8, Duration::from_millis(800), &mut rng);
    assert_eq!(burst.len(), 8);

    let p = &mut burst[0];
    let speed = p.vel.length();
    p.update(FRAME);
    assert!(p.vel.length() < speed);
    assert!(p.is_alive());
    assert!(p.alpha() < 1.0);

    p.update(Duration::from_millis(800));
    assert!(!p.is_alive());
}

#[test]
fn blast_ring_grows_to_full_radius() {
    let mut blast = WeaponBlast::new(Vec2::ZERO, 200.0);
    assert_eq!(blast.radius, 0.0);
    blast.update(Duration::from_millis(250));
    assert!((blast.radius - 50.0).abs() < 0.5);
    assert!((blast.alpha() - 0.75).abs() < 1e-3);
    blast.update(Duration::from_millis(750));
    assert!(!blast.is_alive());
    assert!((blast.radius - 200.0).abs() < 1e-3);
}
