/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`. Side effects are limited to the injected RNG; anything the
/// outside world should react to is recorded in `GameState::events`.

use std::f32::consts::TAU;

use rand::Rng;
use tracing::{debug, info};

use crate::entities::{
    Bounded, Enemy, EnemyKind, FrameContext, GameEvent, GameState, GameStatus, Intent, Item,
    ItemKind, LevelSummary, Particle, Player, Updatable, MAX_LIVES,
};
use crate::map::{pixel_to_cell, TileMap};

pub const MAX_LEVEL: u32 = 3;
pub const INVULNERABILITY_MS: f32 = 2000.0;
pub const SCREEN_SHAKE_FRAMES: u32 = 10;
const PARTICLES_PER_BURST: usize = 8;
const TIME_BONUS_MAX: u32 = 300;
const TIME_BONUS_PER_SECOND: u32 = 10;
const CRYSTAL_BONUS: u32 = 10;

// ── Level tables ─────────────────────────────────────────────────────────────

/// Item and enemy counts spawned when a level loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    pub crystals: u32,
    pub potions: u32,
    pub keys: u32,
    pub slimes: u32,
    pub fireballs: u32,
}

const LEVELS: [LevelConfig; 3] = [
    LevelConfig { crystals: 10, potions: 2, keys: 1, slimes: 3, fireballs: 0 },
    LevelConfig { crystals: 15, potions: 3, keys: 2, slimes: 4, fireballs: 2 },
    LevelConfig { crystals: 20, potions: 4, keys: 3, slimes: 5, fireballs: 4 },
];

/// Levels past the table reuse its last row; level 0 counts as level 1.
pub fn level_config(level: u32) -> LevelConfig {
    let index = (level.max(1) as usize - 1).min(LEVELS.len() - 1);
    LEVELS[index]
}

/// Points for a pickup.
fn score_for(kind: ItemKind) -> u32 {
    match kind {
        ItemKind::Crystal => 10,
        ItemKind::Potion => 5,
        ItemKind::Key => 15,
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh session sitting on the title screen.
pub fn init_state(best_score: u32, rng: &mut impl Rng) -> GameState {
    let map = TileMap::generate(1, rng);
    let (sx, sy) = map.start_position();
    let mut state = GameState {
        status: GameStatus::Start,
        level: 1,
        score: 0,
        best_score,
        level_elapsed_ms: 0.0,
        screen_shake: 0,
        map,
        player: Player::new(sx, sy),
        enemies: Vec::new(),
        items: Vec::new(),
        particles: Vec::new(),
        summary: None,
        events: Vec::new(),
        frame: 0,
    };
    populate(&mut state, rng);
    state
}

/// Replace the whole world with a newly generated `level`. Score, best
/// score and status carry over unchanged.
pub fn load_level(state: &GameState, level: u32, rng: &mut impl Rng) -> GameState {
    let map = TileMap::generate(level, rng);
    let (sx, sy) = map.start_position();
    let mut next = GameState {
        level,
        level_elapsed_ms: 0.0,
        screen_shake: 0,
        map,
        player: Player::new(sx, sy),
        enemies: Vec::new(),
        items: Vec::new(),
        particles: Vec::new(),
        summary: None,
        events: vec![GameEvent::LevelLoaded(level)],
        ..state.clone()
    };
    populate(&mut next, rng);
    info!(
        level,
        items = next.items.len(),
        enemies = next.enemies.len(),
        "level loaded"
    );
    next
}

fn populate(state: &mut GameState, rng: &mut impl Rng) {
    let config = level_config(state.level);
    let items = [
        (ItemKind::Crystal, config.crystals),
        (ItemKind::Potion, config.potions),
        (ItemKind::Key, config.keys),
    ];
    for (kind, count) in items {
        for _ in 0..count {
            let (x, y) = state.map.random_walkable_position(rng);
            state.items.push(Item::new(x, y, kind));
        }
    }
    let enemies = [(EnemyKind::Slime, config.slimes), (EnemyKind::Fireball, config.fireballs)];
    for (kind, count) in enemies {
        for _ in 0..count {
            let (x, y) = state.map.random_walkable_position(rng);
            state.enemies.push(Enemy::new(x, y, kind));
        }
    }
}

// ── Session transitions ──────────────────────────────────────────────────────

/// Begin a new run at level 1 with a zero score. Valid from the title
/// screen and after a game over; otherwise the state is returned as-is.
pub fn start_game(state: &GameState, rng: &mut impl Rng) -> GameState {
    match state.status {
        GameStatus::Start | GameStatus::GameOver => {
            let fresh = GameState { score: 0, ..state.clone() };
            GameState { status: GameStatus::Playing, ..load_level(&fresh, 1, rng) }
        }
        _ => GameState { events: Vec::new(), ..state.clone() },
    }
}

pub fn toggle_pause(state: &GameState) -> GameState {
    let status = match state.status {
        GameStatus::Playing => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Playing,
        other => other,
    };
    GameState { status, events: Vec::new(), ..state.clone() }
}

/// Advance from a completed level to the next one, or back to the title
/// screen with a `Victory` event once the last level is done.
pub fn next_level(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::LevelComplete {
        return GameState { events: Vec::new(), ..state.clone() };
    }
    let level = state.level + 1;
    if level > MAX_LEVEL {
        info!(score = state.score, "all levels cleared");
        let mut next = return_to_menu(state, rng);
        next.events.push(GameEvent::Victory);
        return next;
    }
    GameState { status: GameStatus::Playing, ..load_level(state, level, rng) }
}

/// Abandon the current world and go back to the title screen.
pub fn return_to_menu(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = init_state(state.best_score, rng);
    next.score = state.score;
    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame. Outside `Playing` the state is
/// frozen and only the event list is cleared.
pub fn tick(
    state: &GameState,
    intent: &Intent,
    dt_ms: f32,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = GameState { events: Vec::new(), ..state.clone() };
    if state.status != GameStatus::Playing {
        return next;
    }
    next.frame += 1;
    next.level_elapsed_ms += dt_ms;
    next.player.invulnerable_ms = (next.player.invulnerable_ms - dt_ms).max(0.0);

    // ── 1. Player input and animation ────────────────────────────────────────
    let (dx, dy) = intent.vector();
    if dx != 0.0 || dy != 0.0 {
        next.player.move_by(dx, dy, &next.map);
    }
    let ctx = FrameContext { dt_ms, player_pos: (next.player.x, next.player.y) };
    next.player.update(&ctx);

    // ── 2. Enemies, items, particles ─────────────────────────────────────────
    for enemy in &mut next.enemies {
        enemy.update(&ctx);
    }
    for item in &mut next.items {
        item.update(&ctx);
    }
    for particle in &mut next.particles {
        particle.update(&ctx);
    }
    next.particles.retain(Particle::is_alive);

    // ── 3. Collisions ────────────────────────────────────────────────────────
    collect_items(&mut next, rng);
    resolve_enemy_contacts(&mut next);
    if next.status == GameStatus::Playing && at_open_exit(&next) {
        complete_level(&mut next);
    }

    next.screen_shake = next.screen_shake.saturating_sub(1);
    next
}

/// Apply every item the player overlaps, then drop those items.
fn collect_items(state: &mut GameState, rng: &mut impl Rng) {
    let player = state.player.bounds();
    let (picked, kept): (Vec<Item>, Vec<Item>) = std::mem::take(&mut state.items)
        .into_iter()
        .partition(|item| item.bounds().overlaps(&player));
    state.items = kept;

    for item in picked {
        match item.kind {
            ItemKind::Crystal => state.player.crystals_collected += 1,
            ItemKind::Potion => state.player.lives = (state.player.lives + 1).min(MAX_LIVES),
            ItemKind::Key => state.player.keys += 1,
        }
        state.score += score_for(item.kind);
        let (cx, cy) = item.bounds().center();
        spawn_burst(state, cx, cy, item.kind, rng);
        state.events.push(GameEvent::Collected(item.kind));
        debug!(kind = ?item.kind, score = state.score, "item collected");
    }
}

fn spawn_burst(state: &mut GameState, x: f32, y: f32, kind: ItemKind, rng: &mut impl Rng) {
    for i in 0..PARTICLES_PER_BURST {
        let angle = TAU * i as f32 / PARTICLES_PER_BURST as f32;
        let speed = 1.0 + rng.gen::<f32>();
        state.particles.push(Particle::new(x, y, angle, speed, kind.color()));
    }
}

/// At most one hit per frame: the first overlapping enemy makes the player
/// invulnerable, which shields against the rest.
fn resolve_enemy_contacts(state: &mut GameState) {
    let touched = state
        .enemies
        .iter()
        .any(|enemy| state.player.collides_with(enemy));
    if !touched || state.player.is_invulnerable() {
        return;
    }

    state.player.lives = state.player.lives.saturating_sub(1);
    state.player.invulnerable_ms = INVULNERABILITY_MS;
    state.screen_shake = SCREEN_SHAKE_FRAMES;
    state.events.push(GameEvent::Hit);
    debug!(lives = state.player.lives, "player hit");

    if state.player.lives == 0 {
        game_over(state);
    }
}

fn game_over(state: &mut GameState) {
    let new_best = state.score > state.best_score;
    if new_best {
        state.best_score = state.score;
    }
    state.status = GameStatus::GameOver;
    state.events.push(GameEvent::GameOver { score: state.score, new_best });
    info!(score = state.score, level = state.level, new_best, "game over");
}

/// True when the player's centre sits on the exit cell and no crystals are
/// left to collect.
fn at_open_exit(state: &GameState) -> bool {
    let (cx, cy) = state.player.bounds().center();
    let (gx, gy) = pixel_to_cell(cx, cy);
    let exit = state.map.exit_position();
    gx == exit.x as i64 && gy == exit.y as i64 && state.crystals_remaining() == 0
}

/// Bonus for clearing a level after `elapsed_ms` of play.
pub fn level_bonus(crystals: u32, elapsed_ms: f32) -> LevelSummary {
    let seconds = (elapsed_ms / 1000.0).floor() as u32;
    let time_bonus = TIME_BONUS_MAX.saturating_sub(seconds.saturating_mul(TIME_BONUS_PER_SECOND));
    let crystal_bonus = crystals * CRYSTAL_BONUS;
    LevelSummary {
        crystals,
        crystal_bonus,
        time_bonus,
        total: crystal_bonus + time_bonus,
    }
}

fn complete_level(state: &mut GameState) {
    let summary = level_bonus(state.player.crystals_collected, state.level_elapsed_ms);
    state.score += summary.total;
    state.summary = Some(summary);
    state.status = GameStatus::LevelComplete;
    state.events.push(GameEvent::LevelComplete(summary));
    info!(
        level = state.level,
        time_bonus = summary.time_bonus,
        crystal_bonus = summary.crystal_bonus,
        "level complete"
    );
}
