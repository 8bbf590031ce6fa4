//! Drawable 2-D surface for the matrix rain.
//!
//! A real canvas keeps its pixels between frames, and the rain relies on it:
//! every frame darkens what is already there with a translucent fill before
//! new glyphs land. [`GlyphCanvas`] models exactly that on a grid of glyph
//! cells, so the native host can repaint it every frame.

/// Straight-alpha color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// What the matrix animator needs from a canvas.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    /// Composite `color` over the whole surface.
    fn fill_overlay(&mut self, color: Rgba);
    /// Draw a glyph with its baseline at `(x, y)`.
    fn fill_glyph(&mut self, glyph: char, x: f32, y: f32, color: Rgba);
}

/// One glyph cell; `color.a` is the remaining intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Rgba,
}

const EMPTY: Cell = Cell {
    glyph: ' ',
    color: Rgba::new(0, 0, 0, 0.0),
};

/// Below this intensity a cell is treated as fully faded.
const FADE_CUTOFF: f32 = 0.02;

#[derive(Debug, Clone)]
pub struct GlyphCanvas {
    width: f32,
    height: f32,
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl GlyphCanvas {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let mut canvas = Self {
            width: 0.0,
            height: 0.0,
            cell_size: cell_size.max(1.0),
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        canvas.resize(width, height);
        canvas
    }

    /// Resizing clears the surface, like assigning `canvas.width`.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.cols = (self.width / self.cell_size).ceil() as usize;
        self.rows = (self.height / self.cell_size).ceil() as usize;
        self.cells = vec![EMPTY; self.cols * self.rows];
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Visible cells as `(col, row, cell)`.
    pub fn lit_cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.color.a > 0.0)
            .map(move |(i, c)| (i % self.cols.max(1), i / self.cols.max(1), c))
    }
}

impl Surface for GlyphCanvas {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn fill_overlay(&mut self, color: Rgba) {
        let keep = 1.0 - color.a.clamp(0.0, 1.0);
        for cell in &mut self.cells {
            if cell.color.a <= 0.0 {
                continue;
            }
            cell.color.a *= keep;
            if cell.color.a < FADE_CUTOFF {
                *cell = EMPTY;
            }
        }
    }

    fn fill_glyph(&mut self, glyph: char, x: f32, y: f32, color: Rgba) {
        if x < 0.0 || y <= 0.0 {
            return;
        }
        let col = (x / self.cell_size) as usize;
        let row = ((y / self.cell_size).ceil() as usize).saturating_sub(1);
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.cells[row * self.cols + col] = Cell { glyph, color };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Rgba = Rgba::new(0, 255, 0, 1.0);

    #[test]
    fn glyph_lands_above_baseline() {
        let mut c = GlyphCanvas::new(140.0, 140.0, 14.0);
        c.fill_glyph('A', 28.0, 14.0, GREEN);
        assert_eq!(c.cell(2, 0).unwrap().glyph, 'A');
        c.fill_glyph('B', 0.0, 28.0, GREEN);
        assert_eq!(c.cell(0, 1).unwrap().glyph, 'B');
    }

    #[test]
    fn overlay_fades_trail() {
        let mut c = GlyphCanvas::new(14.0, 14.0, 14.0);
        c.fill_glyph('Z', 0.0, 14.0, GREEN);
        c.fill_overlay(Rgba::new(0, 0, 0, 0.04));
        let a = c.cell(0, 0).unwrap().color.a;
        assert!((a - 0.96).abs() < 1e-4);
        for _ in 0..200 {
            c.fill_overlay(Rgba::new(0, 0, 0, 0.04));
        }
        assert_eq!(c.lit_cells().count(), 0);
    }

    #[test]
    fn off_surface_draws_are_clipped() {
        let mut c = GlyphCanvas::new(28.0, 28.0, 14.0);
        c.fill_glyph('X', 0.0, 420.0, GREEN);
        c.fill_glyph('X', 56.0, 14.0, GREEN);
        assert_eq!(c.lit_cells().count(), 0);
    }
}
