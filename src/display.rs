/// Rendering layer — all terminal I/O lives here.
///
/// The simulation runs on a 1920x1080 virtual playfield; this module
/// projects it onto the terminal grid and translates entities into colored
/// glyphs. No game logic is performed here. Entities whose animation key
/// has no sprite in the store degrade to a solid-color block — a missing
/// asset must never halt the game.

use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use space_defender::entities::{Entity, EntityKind, Facing, PLAYFIELD_H, PLAYFIELD_W};
use space_defender::enemy::EnemyType;
use space_defender::session::GameSession;
use space_defender::world::{DrawSurface, World};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Green;
const C_HUD_HEALTH_LOW: Color = Color::Red;
const C_PLAYER: Color = Color::Cyan;
const C_ENEMY_HUMAN: Color = Color::Red;
const C_ENEMY_SHIP: Color = Color::Magenta;
const C_ENEMY_DRONE: Color = Color::Yellow;
const C_ENEMY_BOSS: Color = Color::DarkRed;
const C_BULLET_PLAYER: Color = Color::White;
const C_BULLET_ENEMY: Color = Color::DarkYellow;
const C_PICKUP: Color = Color::Green;
const C_PLATFORM: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

// ── Sprite store ──────────────────────────────────────────────────────────────

/// A frame is a small block of glyph rows drawn at the entity's projected
/// top-left corner.
type Frame = &'static [&'static str];

/// Named frame sequences, cached by key — the terminal analogue of a
/// sprite-folder loader. Keys match `animation::FrameSet` keys; lengths
/// must agree with the sets' declared lengths.
pub struct FrameStore {
    sets: HashMap<&'static str, Vec<Frame>>,
}

impl FrameStore {
    pub fn new() -> Self {
        let mut sets: HashMap<&'static str, Vec<Frame>> = HashMap::new();
        sets.insert("player/idle", vec![&["◢█◣", "▐▀▌"], &["◢█◣", "▐▄▌"]]);
        sets.insert("player/run", vec![&["◢█◣", "/▀\\"], &["◢█◣", "\\▀/"]]);
        sets.insert("player/shoot", vec![&["◢█◣", "▐▀═"], &["◢█◣", "▐▀─"]]);
        sets.insert(
            "player/death",
            vec![&["◢█◣", "▐▀▌"], &[" ▄▄", "▀▀▀"], &["   ", "▁▁▁"]],
        );
        sets.insert("enemy/human/walk", vec![&["▛█▜", "/▙\\"], &["▛█▜", "\\▙/"]]);
        sets.insert("enemy/human/shoot", vec![&["▛█▜", "═▙▌"], &["▛█▜", "─▙▌"]]);
        sets.insert(
            "enemy/human/death",
            vec![&["▛█▜", "/▙\\"], &[" ▄▄", "▀▀▀"], &["   ", "▁▁▁"]],
        );
        sets.insert("enemy/ship", vec![&["◄██►", "▼▼"], &["◄██►", "▽▽"]]);
        sets.insert("enemy/drone", vec![&["╭◯╮", "╰─╯"], &["╭◉╮", "╰─╯"]]);
        sets.insert("enemy/boss", vec![&["◣███◢", "▐▓▓▓▌"], &["◣███◢", "▐▒▒▒▌"]]);
        sets.insert("pickup/heart", vec![&["♥"], &["♡"]]);
        FrameStore { sets }
    }

    /// Frame for (set key, index), or `None` when the key is unknown and
    /// the caller should fall back to a primitive.
    fn frame(&self, key: &str, index: usize) -> Option<Frame> {
        let frames = self.sets.get(key)?;
        frames.get(index % frames.len()).copied()
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        FrameStore::new()
    }
}

/// Mirror a frame horizontally for left-facing sprites.
fn flip_char(c: char) -> char {
    match c {
        '/' => '\\',
        '\\' => '/',
        '(' => ')',
        ')' => '(',
        '◄' => '►',
        '►' => '◄',
        '◢' => '◣',
        '◣' => '◢',
        '▐' => '▌',
        '▌' => '▐',
        '▛' => '▜',
        '▜' => '▛',
        '╭' => '╮',
        '╮' => '╭',
        '╰' => '╯',
        '╯' => '╰',
        '═' => '═',
        other => other,
    }
}

fn flip_row(row: &str) -> String {
    row.chars().rev().map(flip_char).collect()
}

// ── Overlay state ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    None,
    Paused,
    GameOver,
    Victory,
}

pub struct RenderCtx<'a> {
    pub world: &'a World,
    pub session: &'a GameSession,
    pub high_score: i32,
    pub level_name: &'a str,
    pub overlay: Overlay,
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Terminal viewport over the virtual playfield. Row 0 is the HUD and the
/// last row the controls hint; the play area is everything between.
struct Viewport {
    width: u16,
    height: u16,
}

impl Viewport {
    /// Play-area rows: 1 ..= height - 2.
    fn play_top(&self) -> u16 {
        1
    }

    fn play_height(&self) -> u16 {
        self.height.saturating_sub(2)
    }

    fn project(&self, x: f32, y: f32) -> (u16, u16) {
        let sx = (x / PLAYFIELD_W * self.width as f32).clamp(0.0, self.width as f32 - 1.0);
        let sy = (y / PLAYFIELD_H * self.play_height() as f32)
            .clamp(0.0, self.play_height() as f32 - 1.0);
        (sx as u16, self.play_top() + sy as u16)
    }

    /// Projected cell extent of a world-size span, at least one cell.
    fn project_size(&self, w: f32, h: f32) -> (u16, u16) {
        let cw = (w / PLAYFIELD_W * self.width as f32).round().max(1.0);
        let ch = (h / PLAYFIELD_H * self.play_height() as f32).round().max(1.0);
        (cw as u16, ch as u16)
    }
}

// ── Draw surface ──────────────────────────────────────────────────────────────

/// Buffered per-frame surface handed to `World::draw`. I/O errors are
/// latched and surfaced once at the end of the frame.
struct Screen<'a, W: Write> {
    out: &'a mut W,
    view: Viewport,
    store: &'a FrameStore,
    error: Option<std::io::Error>,
}

impl<'a, W: Write> Screen<'a, W> {
    fn try_draw(&mut self, entity: &Entity) -> std::io::Result<()> {
        match &entity.kind {
            EntityKind::Player(st) => {
                // Blink while invincible.
                if st.is_invincible() && (st.invincibility_timer * 8.0) as i32 % 2 == 0 {
                    return Ok(());
                }
                self.draw_sprite(entity, C_PLAYER, st.facing == Facing::Left)
            }
            EntityKind::Enemy(st) => {
                let color = match st.enemy_type {
                    EnemyType::Human => C_ENEMY_HUMAN,
                    EnemyType::Ship => C_ENEMY_SHIP,
                    EnemyType::Drone => C_ENEMY_DRONE,
                    EnemyType::Boss => C_ENEMY_BOSS,
                };
                self.draw_sprite(entity, color, !st.facing_right)?;
                if !st.is_dead && (st.enemy_type == EnemyType::Boss || st.health < st.max_health) {
                    self.draw_health_bar(entity, st.health, st.max_health)?;
                }
                Ok(())
            }
            EntityKind::PlayerBullet { .. } => {
                let (cx, cy) = self.view.project(entity.position.x, entity.position.y);
                self.out.queue(cursor::MoveTo(cx, cy))?;
                self.out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
                self.out.queue(Print("•"))?;
                Ok(())
            }
            EntityKind::EnemyBullet { .. } => {
                let (cx, cy) = self.view.project(entity.position.x, entity.position.y);
                self.out.queue(cursor::MoveTo(cx, cy))?;
                self.out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
                self.out.queue(Print("◦"))?;
                Ok(())
            }
            EntityKind::HealthPickup { .. } => self.draw_sprite(entity, C_PICKUP, false),
            EntityKind::Platform { .. } => self.draw_block(entity, C_PLATFORM, '▀'),
        }
    }

    /// Draw the entity's current animation frame, or a solid block when no
    /// sprite is known for its key.
    fn draw_sprite(&mut self, entity: &Entity, color: Color, flipped: bool) -> std::io::Result<()> {
        let frame = entity
            .animation
            .as_ref()
            .and_then(|anim| self.store.frame(anim.set_key(), anim.frame()));

        let Some(frame) = frame else {
            return self.draw_block(entity, color, '█');
        };

        let (cx, cy) = self.view.project(entity.position.x, entity.position.y);
        self.out.queue(style::SetForegroundColor(color))?;
        for (row_idx, row) in frame.iter().enumerate() {
            let ry = cy + row_idx as u16;
            if ry >= self.view.play_top() + self.view.play_height() {
                break;
            }
            self.out.queue(cursor::MoveTo(cx, ry))?;
            if flipped {
                self.out.queue(Print(flip_row(row)))?;
            } else {
                self.out.queue(Print(*row))?;
            }
        }
        Ok(())
    }

    /// Fallback primitive: fill the projected bounds with one character.
    fn draw_block(&mut self, entity: &Entity, color: Color, ch: char) -> std::io::Result<()> {
        let (cx, cy) = self.view.project(entity.position.x, entity.position.y);
        let (cw, ch_cells) = self.view.project_size(entity.size.x, entity.size.y);
        let row: String = std::iter::repeat(ch).take(cw as usize).collect();

        self.out.queue(style::SetForegroundColor(color))?;
        for dy in 0..ch_cells {
            let ry = cy + dy;
            if ry >= self.view.play_top() + self.view.play_height() {
                break;
            }
            self.out.queue(cursor::MoveTo(cx, ry))?;
            self.out.queue(Print(&row))?;
        }
        Ok(())
    }

    fn draw_health_bar(&mut self, entity: &Entity, health: i32, max: i32) -> std::io::Result<()> {
        let (cx, cy) = self.view.project(entity.position.x, entity.position.y);
        let (cw, _) = self.view.project_size(entity.size.x, entity.size.y);
        let width = cw.max(3) as usize;
        let pct = health as f32 / max as f32;
        let filled = (pct * width as f32).round() as usize;

        let color = if pct <= 0.25 {
            Color::Red
        } else if pct <= 0.5 {
            Color::Yellow
        } else {
            Color::Green
        };

        let bar: String = (0..width)
            .map(|i| if i < filled { '■' } else { '·' })
            .collect();
        self.out.queue(cursor::MoveTo(cx, cy.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(bar))?;
        Ok(())
    }
}

impl<'a, W: Write> DrawSurface for Screen<'a, W> {
    fn draw_entity(&mut self, entity: &Entity) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.try_draw(entity) {
            self.error = Some(err);
        }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    store: &FrameStore,
    ctx: &RenderCtx,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport { width, height };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, &view, ctx)?;

    let mut screen = Screen {
        out: &mut *out,
        view,
        store,
        error: None,
    };
    ctx.world.draw(&mut screen);
    if let Some(err) = screen.error {
        return Err(err);
    }

    draw_controls_hint(out, height)?;

    match ctx.overlay {
        Overlay::None => {}
        Overlay::Paused => {
            let lines = vec![
                "║     PAUSED     ║".to_string(),
                "║ ESC to resume  ║".to_string(),
            ];
            draw_center_box(out, width, height, &lines, Color::Yellow)?;
        }
        Overlay::GameOver => {
            let lines = vec![
                "║   GAME  OVER   ║".to_string(),
                format!("║ Score: {:>7} ║", ctx.session.score),
                "║ R retry  Q quit║".to_string(),
            ];
            draw_center_box(out, width, height, &lines, Color::Red)?;
        }
        Overlay::Victory => {
            let lines = vec![
                "║    VICTORY!    ║".to_string(),
                format!("║ Score: {:>7} ║", ctx.session.score),
                "║ Q back to menu ║".to_string(),
            ];
            draw_center_box(out, width, height, &lines, Color::Green)?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, ctx: &RenderCtx) -> std::io::Result<()> {
    let health = ctx.world.player_state().map_or(0, |st| st.health);

    // Health bar — left
    let filled = (health as usize * 10) / 100;
    let bar: String = (0..10).map(|i| if i < filled { '█' } else { '░' }).collect();
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(if health <= 25 {
        C_HUD_HEALTH_LOW
    } else {
        C_HUD_HEALTH
    }))?;
    out.queue(Print(format!("HP {} {:>3}", bar, health)))?;

    // Score — centre-left
    out.queue(cursor::MoveTo(20, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if ctx.high_score > 0 {
        out.queue(Print(format!(
            "Score:{:>6}  Hi:{:>6}",
            ctx.session.score, ctx.high_score
        )))?;
    } else {
        out.queue(Print(format!("Score:{:>6}", ctx.session.score)))?;
    }

    // Level + enemies remaining — right
    let right_str = format!(
        "L{} {}  Enemies:{:>2}",
        ctx.session.level_number, ctx.level_name, ctx.session.enemies_remaining
    );
    let rx = view
        .width
        .saturating_sub(right_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(right_str))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE/W : Jump   X : Shoot   C : Shoot Up   ESC : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_center_box<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    lines: &[String],
    color: Color,
) -> std::io::Result<()> {
    let inner_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let top = format!("╔{}╗", "═".repeat(inner_width.saturating_sub(2)));
    let bottom = format!("╚{}╝", "═".repeat(inner_width.saturating_sub(2)));

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub((lines.len() as u16 + 2) / 2);
    let col = cx.saturating_sub(inner_width as u16 / 2);

    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, start_row))?;
    out.queue(Print(&top))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(col, start_row + 1 + i as u16))?;
        out.queue(Print(line.as_str()))?;
    }
    out.queue(cursor::MoveTo(col, start_row + 1 + lines.len() as u16))?;
    out.queue(Print(&bottom))?;
    Ok(())
}
