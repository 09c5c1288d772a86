/// ASCII line rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wf3d_core::{projection::to_screen, Edge2, Vec2};

/// ASCII renderer that draws projected wireframe edges into a character grid
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Rasterize edges given in normalized device coordinates.
    pub fn render_edges(&mut self, edges: &[Edge2]) {
        let (w, h) = (self.width as u32, self.height as u32);
        for edge in edges {
            let from = to_screen(edge.from, w, h);
            let to = to_screen(edge.to, w, h);
            self.draw_line(from, to);
        }
    }

    /// Bresenham line between two cell-space points; cells off the grid are skipped.
    pub fn draw_line(&mut self, from: Vec2, to: Vec2) {
        let (mut x0, mut y0) = (from[0].floor() as i64, from[1].floor() as i64);
        let (x1, y1) = (to[0].floor() as i64, to[1].floor() as i64);
        let character = line_char(x1 - x0, y1 - y0);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, character);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, character: char) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.char_buffer[y as usize * self.width + x as usize] = character;
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetForegroundColor(Color::Cyan))?;
        for (y, row) in self.char_buffer.chunks(self.width.max(1)).enumerate() {
            let line: String = row.iter().collect();
            writer.queue(cursor::MoveTo(0, y as u16))?;
            writer.queue(Print(line))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Character that best follows a line with the given cell-space slope.
/// Screen `y` grows downwards.
fn line_char(dx: i64, dy: i64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay * 2 <= ax {
        '-'
    } else if ax * 2 < ay {
        '|'
    } else if (dx > 0) == (dy > 0) {
        '\\'
    } else {
        '/'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_char() {
        assert_eq!(line_char(10, 0), '-');
        assert_eq!(line_char(0, -5), '|');
        assert_eq!(line_char(4, 4), '\\');
        assert_eq!(line_char(-4, -4), '\\');
        assert_eq!(line_char(4, -4), '/');
        assert_eq!(line_char(0, 0), '-');
    }

    #[test]
    fn test_horizontal_line() {
        let mut r = AsciiRenderer::new(10, 3);
        r.draw_line(Vec2::new([1.0, 1.0]), Vec2::new([5.0, 1.0]));
        for x in 1..=5 {
            assert_eq!(r.char_at(x, 1), Some('-'));
        }
        assert_eq!(r.char_at(0, 1), Some(' '));
        assert_eq!(r.char_at(6, 1), Some(' '));
    }

    #[test]
    fn test_line_is_clipped_to_grid() {
        let mut r = AsciiRenderer::new(4, 4);
        r.draw_line(Vec2::new([-3.0, -3.0]), Vec2::new([7.0, 7.0]));
        for i in 0..4 {
            assert_eq!(r.char_at(i, i), Some('\\'));
        }
        assert_eq!(r.char_at(4, 4), None);
    }

    #[test]
    fn test_render_edges_maps_ndc() {
        let mut r = AsciiRenderer::new(21, 11);
        let edge = Edge2 {
            from: Vec2::new([0.0, 1.0]),
            to: Vec2::new([0.0, -0.8]),
        };
        r.render_edges(&[edge]);
        // NDC x = 0 is the middle column; NDC y = 1 is the top row.
        assert_eq!(r.char_at(10, 0), Some('|'));
        assert_eq!(r.char_at(10, 9), Some('|'));
        assert_eq!(r.char_at(10, 10), Some(' '));

        r.clear();
        assert_eq!(r.char_at(10, 0), Some(' '));
    }

    #[test]
    fn test_draw_writes_every_row() {
        let mut r = AsciiRenderer::new(3, 2);
        r.draw_line(Vec2::new([0.0, 0.0]), Vec2::new([2.0, 0.0]));
        let mut out = Vec::new();
        r.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("---"));
        assert!(text.contains("   "));
    }
}
