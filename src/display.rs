/// Terminal renderer for the game state. All screen output happens here.
///
/// Pixel coordinates are scaled down to character cells: one map tile is two
/// columns by one row. Output is queued and flushed once per frame.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use pixel_quest::entities::{
    Direction, Enemy, EnemyKind, GameState, GameStatus, Item, ItemKind, Particle, Rgb,
};
use pixel_quest::map::{Tile, TILE_SIZE};

// ── Layout ────────────────────────────────────────────────────────────────────

/// Terminal row of map row 0 (row 0 is the HUD).
const MAP_TOP: u16 = 1;
/// Each map cell is drawn two columns wide to look roughly square.
const CELL_COLS: u16 = 2;
const PIXELS_PER_COL: f32 = TILE_SIZE / CELL_COLS as f32;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GRASS: Color = Color::DarkGreen;
const C_STONE: Color = Color::Grey;
const C_WATER: Color = Color::Blue;
const C_DIRT: Color = Color::DarkYellow;
const C_WALL: Color = Color::DarkGrey;
const C_DOOR: Color = Color::DarkRed;
const C_EXIT: Color = Color::Green;
const C_PLAYER: Color = Color::Rgb { r: 0xff, g: 0x6b, b: 0x6b };
const C_SLIME: Color = Color::Rgb { r: 0x4c, g: 0xaf, b: 0x50 };
const C_FIRE: [Color; 3] = [
    Color::Rgb { r: 0xff, g: 0x57, b: 0x22 },
    Color::Rgb { r: 0xff, g: 0x98, b: 0x00 },
    Color::Rgb { r: 0xff, g: 0xeb, b: 0x3b },
];
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_CRYSTALS: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Extra presentation state the core doesn't track.
#[derive(Debug, Default)]
pub struct Overlay {
    /// Set after the last level is cleared, until the next run starts.
    pub victory: bool,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, overlay: &Overlay) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if state.status == GameStatus::Start {
        draw_title(out, state, overlay)?;
    } else {
        let shake = shake_offset(state);
        draw_hud(out, state)?;
        draw_map(out, state, shake)?;
        for item in &state.items {
            draw_item(out, item, shake)?;
        }
        for enemy in &state.enemies {
            draw_enemy(out, enemy, shake)?;
        }
        draw_player(out, state, shake)?;
        for particle in &state.particles {
            draw_particle(out, particle, shake)?;
        }
        draw_controls_hint(out, state)?;

        match state.status {
            GameStatus::Paused => {
                draw_box(out, state, &["PAUSED", "", "Esc/P - Resume  M - Menu"])?
            }
            GameStatus::GameOver => draw_game_over(out, state)?,
            GameStatus::LevelComplete => draw_level_complete(out, state)?,
            _ => {}
        }
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, map_bottom(state) + 2))?;
    out.flush()?;
    Ok(())
}

fn map_bottom(state: &GameState) -> u16 {
    MAP_TOP + state.map.height() as u16
}

fn map_cols(state: &GameState) -> u16 {
    state.map.width() as u16 * CELL_COLS
}

/// Horizontal jitter while the screen is shaking.
fn shake_offset(state: &GameState) -> u16 {
    if state.screen_shake > 0 && state.frame % 2 == 0 {
        1
    } else {
        0
    }
}

/// Terminal cell for a pixel-space point.
fn to_screen(x: f32, y: f32, shake: u16) -> (u16, u16) {
    let col = (x.max(0.0) / PIXELS_PER_COL) as u16 + shake;
    let row = MAP_TOP + (y.max(0.0) / TILE_SIZE) as u16;
    (col, row)
}

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Title screen ──────────────────────────────────────────────────────────────

fn draw_title<W: Write>(out: &mut W, state: &GameState, overlay: &Overlay) -> std::io::Result<()> {
    let cx = map_cols(state) / 2;
    let mut row = 3;

    let line = |out: &mut W, text: &str, color: Color, row: u16| -> std::io::Result<()> {
        out.queue(cursor::MoveTo(cx.saturating_sub(text.chars().count() as u16 / 2), row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
        Ok(())
    };

    line(out, "◆  PIXEL  QUEST  ◆", Color::Cyan, row)?;
    row += 2;
    if overlay.victory {
        line(out, "Congratulations! Every level cleared!", Color::Green, row)?;
        row += 1;
        line(out, &format!("Final Score: {}", state.score), Color::Yellow, row)?;
        row += 2;
    }
    if state.best_score > 0 {
        line(out, &format!("Best Score: {}", state.best_score), Color::Yellow, row)?;
        row += 2;
    }
    line(out, "Collect every crystal, then reach the exit.", Color::White, row)?;
    row += 2;
    line(out, "WASD / arrows : Move   Esc/P : Pause", C_HINT, row)?;
    row += 1;
    line(out, "ENTER : Start   Q : Quit", C_HINT, row)?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>5} Lv{} ", state.score, state.level)))?;

    out.queue(style::SetForegroundColor(C_HUD_CRYSTALS))?;
    out.queue(Print(format!(
        "◆{}/{} ",
        state.player.crystals_collected,
        state.crystals_total()
    )))?;

    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(format!("⚷{} ", state.player.keys)))?;

    let hearts: String = "♥".repeat(state.player.lives as usize);
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(hearts))?;
    Ok(())
}

// ── Map ───────────────────────────────────────────────────────────────────────

fn tile_glyph(tile: Tile) -> (&'static str, Color) {
    match tile {
        Tile::Grass => ("  ", C_GRASS),
        Tile::Stone => ("▒▒", C_STONE),
        Tile::Water => ("≈≈", C_WATER),
        Tile::Dirt => ("..", C_DIRT),
        Tile::Wall => ("██", C_WALL),
        Tile::Door => ("▐▌", C_DOOR),
        Tile::Exit => ("[]", C_EXIT),
    }
}

fn draw_map<W: Write>(out: &mut W, state: &GameState, shake: u16) -> std::io::Result<()> {
    for (cell, tile) in state.map.cells() {
        let (glyph, color) = tile_glyph(tile);
        out.queue(cursor::MoveTo(
            cell.x as u16 * CELL_COLS + shake,
            MAP_TOP + cell.y as u16,
        ))?;
        out.queue(style::SetForegroundColor(color))?;
        if tile == Tile::Grass {
            out.queue(style::SetBackgroundColor(C_GRASS))?;
            out.queue(Print(glyph))?;
            out.queue(style::SetBackgroundColor(Color::Reset))?;
        } else {
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &GameState, shake: u16) -> std::io::Result<()> {
    let p = &state.player;
    // Blink while invulnerable.
    if p.is_invulnerable() && (state.frame / 6) % 2 == 0 {
        return Ok(());
    }
    let glyph = match p.direction {
        Direction::Up => "▲",
        Direction::Down => "▼",
        Direction::Left => "◀",
        Direction::Right => "▶",
    };
    let (col, row) = to_screen(p.x + 6.0, p.y + 7.0, shake);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, shake: u16) -> std::io::Result<()> {
    let (col, row) = to_screen(enemy.x + 6.0, enemy.y + 6.0, shake);
    out.queue(cursor::MoveTo(col, row))?;
    match enemy.kind {
        EnemyKind::Slime => {
            out.queue(style::SetForegroundColor(C_SLIME))?;
            out.queue(Print(if enemy.anim_frame % 2 == 0 { "ʘ" } else { "o" }))?;
        }
        EnemyKind::Fireball => {
            let color = C_FIRE[enemy.anim_frame as usize % C_FIRE.len()];
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print("✹"))?;
        }
    }
    Ok(())
}

fn draw_item<W: Write>(out: &mut W, item: &Item, shake: u16) -> std::io::Result<()> {
    let (col, row) = to_screen(item.x + 4.0, item.y + 4.0 + item.bob_offset, shake);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(rgb(item.kind.color())))?;
    let glyph = match item.kind {
        ItemKind::Crystal if item.anim_frame % 20 < 10 => "◆",
        ItemKind::Crystal => "◇",
        ItemKind::Potion => "ɵ",
        ItemKind::Key => "⚷",
    };
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_particle<W: Write>(out: &mut W, particle: &Particle, shake: u16) -> std::io::Result<()> {
    let (col, row) = to_screen(particle.x, particle.y, shake);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(rgb(particle.color)))?;
    out.queue(Print(if particle.life > 30 { "*" } else { "·" }))?;
    Ok(())
}

// ── Controls hint (below the map) ─────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, map_bottom(state) + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD/←↑↓→ : Move  Esc/P : Pause  Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_box<W: Write>(out: &mut W, state: &GameState, lines: &[&str]) -> std::io::Result<()> {
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
    let cx = map_cols(state) / 2;
    let left = cx.saturating_sub(inner as u16 / 2 + 1);
    let top = (MAP_TOP + state.map.height() as u16 / 2).saturating_sub(lines.len() as u16 / 2 + 1);

    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(cursor::MoveTo(left, top))?;
    out.queue(Print(format!("╔{}╗", "═".repeat(inner))))?;
    for (i, text) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(left, top + 1 + i as u16))?;
        out.queue(Print(format!("║{:^width$}║", text, width = inner)))?;
    }
    out.queue(cursor::MoveTo(left, top + 1 + lines.len() as u16))?;
    out.queue(Print(format!("╚{}╝", "═".repeat(inner))))?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let score = format!("Final Score: {}", state.score);
    let best = if state.score >= state.best_score && state.score > 0 {
        format!("★ NEW BEST: {} ★", state.best_score)
    } else {
        format!("Best Score: {}", state.best_score)
    };
    let reached = format!("Level {}  Crystals {}", state.level, state.player.crystals_collected);
    draw_box(
        out,
        state,
        &[
            "GAME  OVER",
            "",
            score.as_str(),
            best.as_str(),
            reached.as_str(),
            "",
            "ENTER - Play Again  M - Menu",
        ],
    )
}

fn draw_level_complete<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let Some(summary) = state.summary else {
        return Ok(());
    };
    let crystals = format!("Crystals: {}", summary.crystals);
    let time = format!("Time Bonus: {}", summary.time_bonus);
    let total = format!("Level Points: {}", summary.total);
    draw_box(
        out,
        state,
        &[
            "LEVEL COMPLETE",
            "",
            crystals.as_str(),
            time.as_str(),
            total.as_str(),
            "",
            "ENTER - Next Level  M - Menu",
        ],
    )
}
