use agelife::PIXEL_BYTES;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Rows reserved above the field for the status line.
pub(crate) const HUD_ROWS: u16 = 1;

/// Channel level below which a pixel does not raise a braille dot.
const INK_LEVEL: u8 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

/// Owns the terminal for the lifetime of the viewer; restores it on drop.
pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    /// B, G, R, A pixels covering the area below the HUD.
    pub(crate) pixels: Vec<u8>,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;

        let (cols, rows) = terminal::size()?;
        let mut term = Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            pixels: Vec::new(),
        };
        term.pixels = vec![0; term.canvas_len()];
        Ok(term)
    }

    /// Canvas size in pixels: braille packs 2x4 dots per cell.
    pub(crate) fn canvas_size(&self) -> (usize, usize) {
        (
            self.cols as usize * 2,
            self.rows.saturating_sub(HUD_ROWS) as usize * 4,
        )
    }

    fn canvas_len(&self) -> usize {
        let (w, h) = self.canvas_size();
        w * h * PIXEL_BYTES
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.pixels = vec![0; self.canvas_len()];
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Converts the pixel canvas into braille cells below the HUD.
    pub(crate) fn blit_pixels(&mut self) {
        let (pw, ph) = self.canvas_size();
        pixels_to_cells(&self.pixels, pw, ph, &mut self.cur, HUD_ROWS);
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            EndSynchronizedUpdate,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, text: &str, fg: Color) {
    let mut cx = x;
    for ch in text.chars() {
        if cx >= buf.w {
            break;
        }
        buf.set(
            cx,
            y,
            Cell {
                ch,
                fg,
                bg: Color::Black,
            },
        );
        cx += 1;
    }
}

/* -----------------------------
   Braille encoding: 2×4 pixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: usize, dy: usize) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// Packs a `pw`x`ph` B,G,R,A pixel buffer into braille cells starting at row
/// `top`; each cell takes the average color of its lit dots.
pub(crate) fn pixels_to_cells(pixels: &[u8], pw: usize, ph: usize, out: &mut CellBuffer, top: u16) {
    let cols = out.w as usize;
    let rows = out.h.saturating_sub(top) as usize;

    for cy in 0..rows {
        for cx in 0..cols {
            let mut mask: u8 = 0;
            let (mut sum_r, mut sum_g, mut sum_b) = (0u32, 0u32, 0u32);
            let mut ink = 0u32;

            for dy in 0..4 {
                for dx in 0..2 {
                    let x = cx * 2 + dx;
                    let y = cy * 4 + dy;
                    if x >= pw || y >= ph {
                        continue;
                    }
                    let p = (y * pw + x) * PIXEL_BYTES;
                    let (b, g, r, a) = (pixels[p], pixels[p + 1], pixels[p + 2], pixels[p + 3]);
                    if a == 0 || r.max(g).max(b) < INK_LEVEL {
                        continue;
                    }
                    mask |= braille_bit(dx, dy);
                    sum_r += r as u32;
                    sum_g += g as u32;
                    sum_b += b as u32;
                    ink += 1;
                }
            }

            let fg = if ink > 0 {
                Color::Rgb {
                    r: (sum_r / ink) as u8,
                    g: (sum_g / ink) as u8,
                    b: (sum_b / ink) as u8,
                }
            } else {
                Color::White
            };

            out.set(
                cx as u16,
                cy as u16 + top,
                Cell {
                    ch: char::from_u32(0x2800 + mask as u32).unwrap_or(' '),
                    fg,
                    bg: Color::Black,
                },
            );
        }
    }
}
