/// World entities and their per-frame update rules.
///
/// Entities never hold references to each other; anything an update needs
/// from outside (elapsed time, the player's position) arrives through
/// `FrameContext`.

use std::f32::consts::FRAC_1_SQRT_2;

use crate::map::{TileMap, CANVAS_HEIGHT, CANVAS_WIDTH};

pub const PLAYER_WIDTH: f32 = 12.0;
pub const PLAYER_HEIGHT: f32 = 14.0;
pub const PLAYER_SPEED: f32 = 2.0;
pub const MAX_LIVES: u32 = 3;
const WALK_FRAME_MS: f32 = 200.0;

pub const ENEMY_SIZE: f32 = 12.0;
const ENEMY_BASE_SPEED: f32 = 1.0;
const ENEMY_ANIM_MS: f32 = 150.0;
const ENEMY_ANIM_FRAMES: u32 = 3;

pub const ITEM_SIZE: f32 = 8.0;
const ITEM_ANIM_MS: f32 = 100.0;

pub const PARTICLE_LIFETIME: u32 = 60;
const PARTICLE_GRAVITY: f32 = 0.1;

/// Fireball patrol cycle: right, down, left, up.
const PATROL: [(f32, f32); 4] = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];

// ── Shared capabilities ──────────────────────────────────────────────────────

/// Axis-aligned box in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Strict overlap on both axes; boxes that only touch do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Anything with a collision box.
pub trait Bounded {
    fn bounds(&self) -> Rect;

    fn collides_with(&self, other: &impl Bounded) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// Inputs shared by every entity update within one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    /// Milliseconds since the previous frame.
    pub dt_ms: f32,
    /// Player's top-left corner at the start of the frame.
    pub player_pos: (f32, f32),
}

/// Per-frame simulation step.
pub trait Updatable {
    fn update(&mut self, ctx: &FrameContext);
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Directional intent sampled from the input provider for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Intent {
    /// Movement vector with diagonals scaled so their length matches an
    /// axial step. Opposite keys cancel.
    pub fn vector(&self) -> (f32, f32) {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        let (dx, dy) = (axis(self.left, self.right), axis(self.up, self.down));
        if dx != 0.0 && dy != 0.0 {
            (dx * FRAC_1_SQRT_2, dy * FRAC_1_SQRT_2)
        } else {
            (dx, dy)
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub lives: u32,
    pub keys: u32,
    pub crystals_collected: u32,
    /// Remaining invulnerability in milliseconds; zero means vulnerable.
    pub invulnerable_ms: f32,
    pub direction: Direction,
    pub anim_frame: u32,
    anim_timer: f32,
    moving: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            speed: PLAYER_SPEED,
            lives: MAX_LIVES,
            keys: 0,
            crystals_collected: 0,
            invulnerable_ms: 0.0,
            direction: Direction::Down,
            anim_frame: 0,
            anim_timer: 0.0,
            moving: false,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Step by `(dx, dy) * speed`, resolving each axis against the map
    /// separately so the player slides along walls, then clamp to the canvas.
    pub fn move_by(&mut self, dx: f32, dy: f32, map: &TileMap) {
        self.moving = true;

        self.direction = if dx.abs() >= dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };

        let new_x = self.x + dx * self.speed;
        let new_y = self.y + dy * self.speed;
        if map.can_walk(new_x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT) {
            self.x = new_x;
        }
        if map.can_walk(self.x, new_y, PLAYER_WIDTH, PLAYER_HEIGHT) {
            self.y = new_y;
        }

        self.x = self.x.clamp(0.0, CANVAS_WIDTH - PLAYER_WIDTH);
        self.y = self.y.clamp(0.0, CANVAS_HEIGHT - PLAYER_HEIGHT);
    }
}

impl Updatable for Player {
    fn update(&mut self, ctx: &FrameContext) {
        if self.moving {
            self.anim_timer += ctx.dt_ms;
            if self.anim_timer > WALK_FRAME_MS {
                self.anim_frame = (self.anim_frame + 1) % 2;
                self.anim_timer = 0.0;
            }
        } else {
            self.anim_frame = 0;
        }
        self.moving = false;
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: PLAYER_WIDTH, height: PLAYER_HEIGHT }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    /// Greedy pursuit of the player.
    Slime,
    /// Fixed four-direction patrol.
    Fireball,
}

impl EnemyKind {
    fn speed(self) -> f32 {
        match self {
            EnemyKind::Slime => ENEMY_BASE_SPEED,
            EnemyKind::Fireball => ENEMY_BASE_SPEED * 1.5,
        }
    }

    /// Milliseconds between direction decisions.
    fn move_delay(self) -> f32 {
        match self {
            EnemyKind::Slime => 500.0,
            EnemyKind::Fireball => 300.0,
        }
    }
}

/// Enemies ignore the tile map entirely; only the canvas edge stops them.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub kind: EnemyKind,
    pub speed: f32,
    /// Displacement applied every frame, in pixels.
    pub velocity: (f32, f32),
    pub anim_frame: u32,
    move_timer: f32,
    anim_timer: f32,
}

impl Enemy {
    pub fn new(x: f32, y: f32, kind: EnemyKind) -> Self {
        Self {
            x,
            y,
            kind,
            speed: kind.speed(),
            velocity: (0.0, 0.0),
            anim_frame: 0,
            move_timer: 0.0,
            anim_timer: 0.0,
        }
    }

    fn choose_velocity(&self, target: (f32, f32)) -> (f32, f32) {
        match self.kind {
            EnemyKind::Slime => {
                let (dx, dy) = (target.0 - self.x, target.1 - self.y);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > 0.0 {
                    (dx / dist * self.speed, dy / dist * self.speed)
                } else {
                    (0.0, 0.0)
                }
            }
            EnemyKind::Fireball => {
                let (px, py) = PATROL[(self.anim_frame / 2) as usize % PATROL.len()];
                (px * self.speed, py * self.speed)
            }
        }
    }
}

impl Updatable for Enemy {
    fn update(&mut self, ctx: &FrameContext) {
        self.move_timer += ctx.dt_ms;
        self.anim_timer += ctx.dt_ms;

        if self.anim_timer > ENEMY_ANIM_MS {
            self.anim_frame = (self.anim_frame + 1) % ENEMY_ANIM_FRAMES;
            self.anim_timer = 0.0;
        }

        if self.move_timer > self.kind.move_delay() {
            self.velocity = self.choose_velocity(ctx.player_pos);
            self.move_timer = 0.0;
        }

        self.x += self.velocity.0;
        self.y += self.velocity.1;

        // Bounce off the canvas edge.
        let max_x = CANVAS_WIDTH - ENEMY_SIZE;
        let max_y = CANVAS_HEIGHT - ENEMY_SIZE;
        if self.x < 0.0 || self.x > max_x {
            self.velocity.0 = -self.velocity.0;
            self.x = self.x.clamp(0.0, max_x);
        }
        if self.y < 0.0 || self.y > max_y {
            self.velocity.1 = -self.velocity.1;
            self.y = self.y.clamp(0.0, max_y);
        }
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: ENEMY_SIZE, height: ENEMY_SIZE }
    }
}

// ── Items ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Crystal,
    Potion,
    Key,
}

impl ItemKind {
    /// Burst colour when the item is picked up.
    pub fn color(self) -> Rgb {
        match self {
            ItemKind::Crystal => Rgb(0x00, 0xff, 0xff),
            ItemKind::Potion => Rgb(0xff, 0x00, 0xff),
            ItemKind::Key => Rgb(0xff, 0xd7, 0x00),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Item {
    pub x: f32,
    pub y: f32,
    pub kind: ItemKind,
    /// Grows without bound; the renderer takes it modulo whatever it needs.
    pub anim_frame: u32,
    /// Vertical float offset for drawing only.
    pub bob_offset: f32,
    anim_timer: f32,
}

impl Item {
    pub fn new(x: f32, y: f32, kind: ItemKind) -> Self {
        Self { x, y, kind, anim_frame: 0, bob_offset: 0.0, anim_timer: 0.0 }
    }
}

impl Updatable for Item {
    fn update(&mut self, ctx: &FrameContext) {
        self.anim_timer += ctx.dt_ms;
        if self.anim_timer > ITEM_ANIM_MS {
            self.anim_frame += 1;
            self.anim_timer = 0.0;
        }
        self.bob_offset = (self.anim_frame as f32 * 0.1).sin() * 2.0;
    }
}

impl Bounded for Item {
    fn bounds(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: ITEM_SIZE, height: ITEM_SIZE }
    }
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Decorative spark; advances per frame regardless of elapsed time.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Frames left before removal.
    pub life: u32,
    pub color: Rgb,
}

impl Particle {
    pub fn new(x: f32, y: f32, angle: f32, speed: f32, color: Rgb) -> Self {
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            life: PARTICLE_LIFETIME,
            color,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

impl Updatable for Particle {
    fn update(&mut self, _ctx: &FrameContext) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Start,
    Playing,
    Paused,
    GameOver,
    LevelComplete,
}

/// Points awarded when a level is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    pub crystals: u32,
    pub crystal_bonus: u32,
    pub time_bonus: u32,
    pub total: u32,
}

/// Something noteworthy that happened during a transition. The orchestrator
/// turns these into audio cues and persistence calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    LevelLoaded(u32),
    Collected(ItemKind),
    Hit,
    LevelComplete(LevelSummary),
    GameOver { score: u32, new_best: bool },
    /// The last level was cleared and the session went back to the title.
    Victory,
}

/// The whole world. Cloneable so pure transitions can return a fresh copy.
#[derive(Clone, Debug)]
pub struct GameState {
    pub status: GameStatus,
    pub level: u32,
    pub score: u32,
    pub best_score: u32,
    /// Simulated time spent playing the current level.
    pub level_elapsed_ms: f32,
    /// Frames of screen shake left.
    pub screen_shake: u32,
    pub map: TileMap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub particles: Vec<Particle>,
    /// Set when the current level was cleared.
    pub summary: Option<LevelSummary>,
    /// Events raised by the most recent transition.
    pub events: Vec<GameEvent>,
    pub frame: u64,
}

impl GameState {
    pub fn crystals_remaining(&self) -> u32 {
        self.items.iter().filter(|i| i.kind == ItemKind::Crystal).count() as u32
    }

    pub fn crystals_total(&self) -> u32 {
        self.player.crystals_collected + self.crystals_remaining()
    }
}
