//! In-memory ARGB framebuffer.
//!
//! The render loop draws into a `Canvas`; the visualizer copies it to the
//! window.  Keeping the two apart lets tests render whole ticks without
//! opening a window.

// ════════════════════════════════════════════════════════════════════════════
// Extent
// ════════════════════════════════════════════════════════════════════════════

/// Canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub width:  usize,
    pub height: usize,
}

impl Extent {
    pub const fn new(width: usize, height: usize) -> Self {
        Extent { width, height }
    }

    pub fn w(&self) -> f32 { self.width as f32 }
    pub fn h(&self) -> f32 { self.height as f32 }

    pub fn center(&self) -> hand_pose::Point2 {
        hand_pose::Point2::new(self.w() / 2.0, self.h() / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    buf:    Vec<u32>,
    extent: Extent,
}

impl Canvas {
    pub fn new(extent: Extent, background: u32) -> Self {
        Canvas {
            buf: vec![opaque(background); extent.width * extent.height],
            extent,
        }
    }

    pub fn extent(&self) -> Extent { self.extent }
    pub fn buffer(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.extent.width && y < self.extent.height {
            Some(self.buf[y * self.extent.width + x])
        } else {
            None
        }
    }

    /// Reallocate for a new size; contents are reset to `background`.
    pub fn resize(&mut self, extent: Extent, background: u32) {
        self.extent = extent;
        self.buf.clear();
        self.buf.resize(extent.width * extent.height, opaque(background));
    }

    /// Opaque clear.
    pub fn clear(&mut self, color: u32) {
        self.buf.fill(opaque(color));
    }

    /// Overlay `color` at `alpha`, leaving fading trails of the last frames.
    pub fn fade(&mut self, color: u32, alpha: f32) {
        for px in self.buf.iter_mut() {
            *px = blend(*px, color, alpha);
        }
    }

    pub fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.extent.width && (y as usize) < self.extent.height {
            self.buf[y as usize * self.extent.width + x as usize] = color;
        }
    }

    /// Filled disc centred on a sub-pixel position; clipped at the edges.
    pub fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, color: u32) {
        let r = radius.max(0.5);
        let r2 = r * r;
        let x0 = (cx - r).floor() as isize;
        let x1 = (cx + r).ceil() as isize;
        let y0 = (cy - r).floor() as isize;
        let y1 = (cy + r).ceil() as isize;
        for y in y0..=y1 {
            let dy = y as f32 + 0.5 - cy;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Bresenham line.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u32) {
        let (mut x, mut y) = (x0.round() as isize, y0.round() as isize);
        let (xe, ye) = (x1.round() as isize, y1.round() as isize);
        let dx = (xe - x).abs();
        let dy = -(ye - y).abs();
        let sx = if x < xe { 1 } else { -1 };
        let sy = if y < ye { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == xe && y == ye { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Status text in the 3×5 font, one pixel of spacing.  Stops at the
    /// right edge rather than wrapping.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        for (i, ch) in text.chars().enumerate() {
            let left = x + i * GLYPH_ADVANCE;
            if left + GLYPH_ADVANCE > self.extent.width { break; }
            let bits = glyph(ch);
            for bit in 0..15 {
                if bits & (1 << (14 - bit)) != 0 {
                    let (row, col) = (bit / 3, bit % 3);
                    self.set_pixel((left + col) as isize, (y + row) as isize, color);
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Colour helpers
// ────────────────────────────────────────────────────────────────────────────

fn opaque(rgb: u32) -> u32 {
    0xFF000000 | (rgb & 0x00FFFFFF)
}

/// HSV → opaque ARGB.  Hue in degrees and wrapped, so any value is accepted.
pub fn hsv_to_argb(h: f32, s: f32, v: f32) -> u32 {
    let chroma = v * s;
    let sector = h.rem_euclid(360.0) / 60.0;
    let second = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, second, 0.0),
        1 => (second, chroma, 0.0),
        2 => (0.0, chroma, second),
        3 => (0.0, second, chroma),
        4 => (second, 0.0, chroma),
        _ => (chroma, 0.0, second),
    };
    let floor = v - chroma;
    let channel = |c: f32| ((c + floor) * 255.0) as u32;
    0xFF000000 | (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

/// Move each channel of `from` a fraction `t` toward `to`.  Truncates, so
/// repeated fading toward a darker colour always lands on it exactly.
pub fn blend(from: u32, to: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    [16u32, 8, 0].iter().fold(0xFF000000, |acc, &shift| {
        let a = ((from >> shift) & 0xFF) as f32;
        let b = ((to   >> shift) & 0xFF) as f32;
        acc | (((a + (b - a) * t) as u32) << shift)
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Status font
// ────────────────────────────────────────────────────────────────────────────

const GLYPH_ADVANCE: usize = 4;

/// 3×5 glyphs packed row-major into the low 15 bits, top-left pixel highest.
/// Only what the status line prints: digits, lowercase, space and `-`.
const FONT: [(char, u16); 38] = [
    ('0', 0x7B6F), ('1', 0x2C97), ('2', 0x73E7), ('3', 0x73CF), ('4', 0x5BC9), ('5', 0x79CF),
    ('6', 0x79EF), ('7', 0x7249), ('8', 0x7BEF), ('9', 0x7BCF), ('a', 0x7BED), ('b', 0x6BAE),
    ('c', 0x7927), ('d', 0x6B6E), ('e', 0x79E7), ('f', 0x79E4), ('g', 0x796F), ('h', 0x5BED),
    ('i', 0x7497), ('j', 0x126F), ('k', 0x5BAD), ('l', 0x4927), ('m', 0x5F6D), ('n', 0x7B6D),
    ('o', 0x7B6F), ('p', 0x7BE4), ('q', 0x7B79), ('r', 0x6BAD), ('s', 0x79CF), ('t', 0x7492),
    ('u', 0x5B6F), ('v', 0x5B52), ('w', 0x5B7D), ('x', 0x5AAD), ('y', 0x5BD2), ('z', 0x72A7),
    ('-', 0x01C0), (' ', 0x0000),
];

/// Unknown characters render as a centre dot.
fn glyph(c: char) -> u16 {
    let c = c.to_ascii_lowercase();
    FONT.iter().find(|(k, _)| *k == c).map_or(0x0080, |&(_, bits)| bits)
}
