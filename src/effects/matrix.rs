//! Matrix rain animator.
//!
//! One drop per glyph column. Each frame darkens the surface with a
//! translucent fill (the trail), draws a random glyph at every drop, and
//! moves every drop one cell down. Drops that fell past the bottom restart
//! at the top only occasionally, which staggers the columns.

use rand::Rng;

use crate::config::MatrixConfig;
use crate::render::canvas::{Rgba, Surface};

#[derive(Debug, Clone)]
pub struct MatrixRain {
    glyphs: Vec<char>,
    cell_size: f32,
    trail: Rgba,
    color: Rgba,
    reset_chance: f64,
    drops: Vec<u32>,
}

/// Column count for a surface of `width` pixels.
pub fn column_count(width: f32, cell_size: f32) -> usize {
    if width <= 0.0 || cell_size <= 0.0 {
        return 0;
    }
    (width / cell_size).floor() as usize
}

impl MatrixRain {
    pub fn new(config: &MatrixConfig, width: f32) -> Self {
        let mut glyphs: Vec<char> = config.glyphs.chars().collect();
        if glyphs.is_empty() {
            glyphs.push('0');
        }
        let mut rain = Self {
            glyphs,
            cell_size: config.cell_size,
            trail: config.trail,
            color: config.color,
            reset_chance: config.reset_chance.clamp(0.0, 1.0),
            drops: Vec::new(),
        };
        rain.resize(width);
        rain
    }

    /// Recompute the column count and re-seed every drop at the top row.
    pub fn resize(&mut self, width: f32) {
        self.drops = vec![1; column_count(width, self.cell_size)];
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    /// Fall position (in cells) of each column.
    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    /// Draw one frame.
    pub fn step<R: Rng + ?Sized>(&mut self, surface: &mut dyn Surface, rng: &mut R) {
        surface.fill_overlay(self.trail);

        let height = surface.height();
        let keep_threshold = 1.0 - self.reset_chance;
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let glyph = self.glyphs[rng.gen_range(0..self.glyphs.len())];
            let y = *drop as f32 * self.cell_size;
            surface.fill_glyph(glyph, i as f32 * self.cell_size, y, self.color);

            if y > height && rng.gen::<f64>() > keep_threshold {
                *drop = 0;
            }
            *drop += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::GlyphCanvas;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn grid_length_matches_width() {
        let config = MatrixConfig::default();
        for width in [0.0, 13.9, 14.0, 100.0, 1280.0, 1919.5] {
            let rain = MatrixRain::new(&config, width);
            assert_eq!(rain.columns(), (width / 14.0_f32).floor() as usize);
        }
    }

    #[test]
    fn resize_reseeds_drops() {
        let config = MatrixConfig::default();
        let mut rain = MatrixRain::new(&config, 140.0);
        let mut canvas = GlyphCanvas::new(140.0, 140.0, 14.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            rain.step(&mut canvas, &mut rng);
        }
        assert!(rain.drops().iter().all(|&d| d == 6));
        rain.resize(280.0);
        assert_eq!(rain.columns(), 20);
        assert!(rain.drops().iter().all(|&d| d == 1));
    }

    #[test]
    fn drops_past_bottom_eventually_restart() {
        let config = MatrixConfig::default();
        let mut rain = MatrixRain::new(&config, 140.0);
        let mut canvas = GlyphCanvas::new(140.0, 70.0, 14.0);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..400 {
            rain.step(&mut canvas, &mut rng);
        }
        // 2.5% per tick over hundreds of ticks: every column restarted.
        assert!(rain.drops().iter().all(|&d| d < 400));
        // Some columns are out of phase with each other.
        let first = rain.drops()[0];
        assert!(rain.drops().iter().any(|&d| d != first));
    }

    #[test]
    fn frame_draws_one_glyph_per_column() {
        let config = MatrixConfig::default();
        let mut rain = MatrixRain::new(&config, 70.0);
        let mut canvas = GlyphCanvas::new(70.0, 140.0, 14.0);
        let mut rng = StdRng::seed_from_u64(1);
        rain.step(&mut canvas, &mut rng);
        assert_eq!(canvas.lit_cells().count(), 5);
        assert!(canvas.lit_cells().all(|(_, row, _)| row == 0));
    }
}
