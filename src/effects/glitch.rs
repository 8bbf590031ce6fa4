//! Glitch-text reveal: scrambled characters settle left to right.

use rand::Rng;

use crate::config::GlitchConfig;

#[derive(Debug, Clone)]
pub struct GlitchText {
    original: Vec<char>,
    glyphs: Vec<char>,
    /// Progress in thirds of a character.
    thirds: usize,
}

impl GlitchText {
    pub fn new(original: &str, config: &GlitchConfig) -> Self {
        let mut glyphs: Vec<char> = config.glyphs.chars().collect();
        if glyphs.is_empty() {
            glyphs.push('_');
        }
        Self {
            original: original.chars().collect(),
            glyphs,
            thirds: 0,
        }
    }

    pub fn original(&self) -> String {
        self.original.iter().collect()
    }

    /// Render the next frame. Returns the text and whether the effect is
    /// finished (the finished frame shows the original).
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (String, bool) {
        let text: String = self
            .original
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if i * 3 < self.thirds {
                    c
                } else {
                    self.glyphs[rng.gen_range(0..self.glyphs.len())]
                }
            })
            .collect();
        let done = self.thirds >= self.original.len() * 3;
        self.thirds += 1;
        (text, done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn settles_on_original() {
        let mut g = GlitchText::new("HACK", &GlitchConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let mut frames = 0;
        loop {
            let (text, done) = g.step(&mut rng);
            assert_eq!(text.chars().count(), 4);
            frames += 1;
            if done {
                assert_eq!(text, "HACK");
                break;
            }
        }
        // 1/3 of a character per frame, plus the final frame.
        assert_eq!(frames, 13);
    }

    #[test]
    fn prefix_is_revealed_progressively() {
        let mut g = GlitchText::new("ABCDEF", &GlitchConfig::default());
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..7 {
            g.step(&mut rng);
        }
        // thirds == 7 → indices 0, 1, 2 are revealed
        let (text, done) = g.step(&mut rng);
        assert!(text.starts_with("ABC"));
        assert!(!done);
    }
}
