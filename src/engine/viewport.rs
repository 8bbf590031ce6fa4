//! Viewport metrics and scrolling.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

#[derive(Debug, Clone, Copy)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    start_ms: u64,
    duration_ms: u64,
}

/// Visible window onto the document.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    scroll_y: f32,
    document_height: f32,
    smooth_ms: u64,
    animation: Option<ScrollAnimation>,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
            document_height: 0.0,
            smooth_ms: 400,
            animation: None,
        }
    }

    pub fn with_smooth_duration(mut self, ms: u64) -> Self {
        self.smooth_ms = ms;
        self
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.height).max(0.0)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn set_document_height(&mut self, h: f32) {
        self.document_height = h.max(0.0);
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    /// User-driven scroll: jumps immediately and cancels any animation.
    /// Returns whether the position changed.
    pub fn set_scroll(&mut self, y: f32) -> bool {
        self.animation = None;
        let y = y.clamp(0.0, self.max_scroll());
        let moved = (y - self.scroll_y).abs() > f32::EPSILON;
        self.scroll_y = y;
        moved
    }

    /// Programmatic scroll, like `window.scrollTo`. Smooth scrolls only start
    /// an animation; [`Viewport::tick`] moves them.
    pub fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior, now_ms: u64) -> bool {
        let to = top.clamp(0.0, self.max_scroll());
        match behavior {
            ScrollBehavior::Instant => self.set_scroll(to),
            ScrollBehavior::Smooth => {
                if (to - self.scroll_y).abs() <= f32::EPSILON || self.smooth_ms == 0 {
                    return self.set_scroll(to);
                }
                self.animation = Some(ScrollAnimation {
                    from: self.scroll_y,
                    to,
                    start_ms: now_ms,
                    duration_ms: self.smooth_ms,
                });
                false
            }
        }
    }

    /// Advance a running smooth scroll to `now_ms`. Returns whether the
    /// position changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let elapsed = now_ms.saturating_sub(anim.start_ms) as f32;
        let t = (elapsed / anim.duration_ms as f32).clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        let y = anim.from + (anim.to - anim.from) * eased;
        let moved = (y - self.scroll_y).abs() > f32::EPSILON;
        self.scroll_y = y.clamp(0.0, self.max_scroll());
        if t >= 1.0 {
            self.scroll_y = anim.to.clamp(0.0, self.max_scroll());
            self.animation = None;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_is_clamped() {
        let mut v = Viewport::new(800.0, 600.0);
        v.set_document_height(1000.0);
        v.set_scroll(5000.0);
        assert_eq!(v.scroll_y(), 400.0);
        v.scroll_to(-80.0, ScrollBehavior::Instant, 0);
        assert_eq!(v.scroll_y(), 0.0);
    }

    #[test]
    fn smooth_scroll_eases_to_target() {
        let mut v = Viewport::new(800.0, 600.0);
        v.set_document_height(3000.0);
        v.scroll_to(1000.0, ScrollBehavior::Smooth, 0);
        assert!(v.is_animating());
        assert!(v.tick(100));
        let mid = v.scroll_y();
        assert!(mid > 0.0 && mid < 1000.0);
        v.tick(400);
        assert_eq!(v.scroll_y(), 1000.0);
        assert!(!v.is_animating());
        assert!(!v.tick(500));
    }

    #[test]
    fn user_scroll_cancels_animation() {
        let mut v = Viewport::new(800.0, 600.0);
        v.set_document_height(3000.0);
        v.scroll_to(1000.0, ScrollBehavior::Smooth, 0);
        v.set_scroll(42.0);
        assert!(!v.is_animating());
        assert_eq!(v.scroll_y(), 42.0);
    }
}
