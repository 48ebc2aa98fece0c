//! Terminal rendering.
//!
//! The world is drawn into a pixel buffer twice as tall as the terminal and
//! flushed with upper-half-block characters, one cell per two pixels.

use std::io::{self, Write};

use crossterm::{cursor, queue, style};
use crossterm::style::Color as CColor;

use crate::session::{GameSession, State};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const SKY_TOP: Rgb = Rgb(112, 197, 206);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const HIT: Rgb = Rgb(255, 0, 0);
const HIT_DARK: Rgb = Rgb(170, 0, 0);
const PANEL: Rgb = Rgb(210, 185, 110);
const PANEL_IN: Rgb = Rgb(220, 195, 120);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer ────────────────────────────────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = None;
        let mut prev_bg = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.term()))?;
                    prev_bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                    continue;
                }
                if prev_fg != Some(top) {
                    queue!(out, style::SetForegroundColor(top.term()))?;
                    prev_fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?; // ▀
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, fg: Rgb) {
    let glyph = &DIGITS[d as usize];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

fn draw_number(buf: &mut PixelBuf, x: i32, y: i32, n: u32, fg: Rgb) {
    for (i, ch) in n.to_string().bytes().enumerate() {
        draw_digit(buf, x + i as i32 * 4, y, ch - b'0', fg);
    }
}

fn number_width(n: u32) -> i32 {
    n.to_string().len() as i32 * 4 - 1 // 3px per digit + 1px spacing
}

fn draw_number_centered(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    draw_number(buf, cx - number_width(n) / 2, y, n, fg);
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

// ── Scene drawing ───────────────────────────────────────────────────────────

/// Maps world coordinates onto the pixel buffer.
struct View {
    sx: f32,
    sy: f32,
}

impl View {
    fn x(&self, wx: f32) -> i32 {
        (wx * self.sx).floor() as i32
    }

    fn y(&self, wy: f32) -> i32 {
        (wy * self.sy).floor() as i32
    }
}

pub fn draw<K, R>(session: &GameSession<K, R>, buf: &mut PixelBuf) {
    let cfg = session.config();
    let view = View {
        sx: buf.width() as f32 / cfg.width,
        sy: buf.height() as f32 / cfg.height,
    };

    draw_sky(buf);
    draw_pipes(session, &view, buf);
    draw_bird(session, &view, buf);

    let pw = buf.width() as i32;
    draw_number_centered(buf, pw / 2, 2, session.displayed_score(), WHITE);
    draw_number(buf, 2, 2, session.high_score(), BIRD_Y);

    if session.state() == State::GameOver {
        draw_game_over(session, buf);
    }
}

fn draw_sky(buf: &mut PixelBuf) {
    let h = buf.height();
    for y in 0..h {
        let t = ((y * 256) / h.max(1)) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..buf.width() {
            buf.set(x as i32, y as i32, c);
        }
    }
}

fn draw_pipes<K, R>(session: &GameSession<K, R>, view: &View, buf: &mut PixelBuf) {
    let cap_h = 2;
    let cap_extra = 1;
    for pair in session.pipes() {
        for (pipe, cap_at_bottom) in [(&pair.top, true), (&pair.bottom, false)] {
            let r = pipe.body.bounds();
            let (x0, x1) = (view.x(r.left), view.x(r.right));
            let (y0, y1) = (view.y(r.top), view.y(r.bottom));
            let w = (x1 - x0).max(1);

            for x in 0..w {
                let c = pipe_shade(x, w);
                for y in y0..y1 {
                    buf.set(x0 + x, y, c);
                }
            }

            let cap_y = if cap_at_bottom { y1 - cap_h } else { y0 };
            let cap_w = w + cap_extra * 2;
            for x in 0..cap_w {
                let c = pipe_shade(x, cap_w);
                for y in cap_y..cap_y + cap_h {
                    buf.set(x0 - cap_extra + x, y, c);
                }
                let edge = if cap_at_bottom { cap_y } else { cap_y + cap_h - 1 };
                buf.set(x0 - cap_extra + x, edge, CAP_DARK);
            }
        }
    }
}

fn draw_bird<K, R>(session: &GameSession<K, R>, view: &View, buf: &mut PixelBuf) {
    let player = session.player();
    let r = player.body.bounds();
    let (x0, y0) = (view.x(r.left), view.y(r.top));
    let w = (view.x(r.right) - x0).max(3);
    let h = (view.y(r.bottom) - y0).max(2);

    let (body, wing) = if player.hit {
        (HIT, HIT_DARK)
    } else {
        (BIRD_Y, BIRD_WING)
    };
    // shift the beak and wing by up to 2px to suggest the tilt
    let tilt = (player.angle / 15.0).round().clamp(-2.0, 2.0) as i32;

    buf.fill_rect(x0, y0, w, h, body);
    buf.fill_rect(x0, y0 + h / 2 + tilt.signum(), (w / 2).max(1), (h / 3).max(1), wing);
    buf.set(x0 + w - 2, y0 + h / 4, BIRD_EYE);
    buf.set(x0 + w - 1, y0 + h / 4, BIRD_PUPIL);
    buf.fill_rect(x0 + w, y0 + h / 2 + tilt, (w / 3).max(1), (h / 4).max(1), BIRD_BEAK);
}

fn draw_game_over<K, R>(session: &GameSession<K, R>, buf: &mut PixelBuf) {
    for y in 0..buf.height() {
        for x in 0..buf.width() {
            let c = buf.get(x, y);
            buf.set(x as i32, y as i32, c.dim());
        }
    }

    let cx = buf.width() as i32 / 2;
    let cy = buf.height() as i32 / 2;
    let panel_w = 30;
    let panel_h = 18;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, PANEL);
    buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL_IN);

    draw_number_centered(buf, cx, py + 3, session.score().points(), WHITE);
    draw_number_centered(buf, cx, py + 10, session.high_score(), BIRD_Y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::engine::Stage;
    use crate::storage::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn draws_bird_inside_buffer() {
        let session = GameSession::new(
            GameConfig::default(),
            MemoryStore::new(),
            StdRng::seed_from_u64(1),
        );
        let stage = Stage::new(session);
        let mut buf = PixelBuf::new(80, 48);
        draw(stage.scene(), &mut buf);
        // bird sits at x=100/800, y=300/600 of the world
        assert_eq!(buf.get(10, 24), BIRD_Y);
    }

    #[test]
    fn render_emits_one_cell_per_column_and_row() {
        let buf = PixelBuf::new(4, 4);
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(' ').count(), 8);
    }
}
