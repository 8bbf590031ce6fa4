//! Viewport intersection tracking.
//!
//! Mirrors the IntersectionObserver contract the page relies on: an entry is
//! reported for a target on the first evaluation after `observe`, then only
//! when its intersecting state flips.

use crate::dom::ElementId;
use crate::engine::viewport::Viewport;
use crate::render::layout::{Layout, LayoutBox};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Fraction of the element's height that must be inside the root.
    pub threshold: f32,
    /// Added to the bottom edge of the root; negative shrinks it.
    pub bottom_margin: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    pub target: ElementId,
    pub ratio: f32,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone)]
pub struct VisibilityWatcher {
    options: WatchOptions,
    targets: Vec<(ElementId, Option<bool>)>,
}

impl VisibilityWatcher {
    pub fn new(options: WatchOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    pub fn options(&self) -> WatchOptions {
        self.options
    }

    pub fn observe(&mut self, target: ElementId) {
        if !self.is_observing(target) {
            self.targets.push((target, None));
        }
    }

    pub fn unobserve(&mut self, target: ElementId) {
        self.targets.retain(|(t, _)| *t != target);
    }

    pub fn is_observing(&self, target: ElementId) -> bool {
        self.targets.iter().any(|(t, _)| *t == target)
    }

    pub fn observed(&self) -> usize {
        self.targets.len()
    }

    /// Compare every target against the viewport and return the entries
    /// whose state is new.
    pub fn evaluate(&mut self, layout: &Layout, viewport: &Viewport) -> Vec<VisibilityEntry> {
        let root_top = viewport.scroll_y();
        let root_bottom = root_top + viewport.height + self.options.bottom_margin;
        let threshold = self.options.threshold;

        let mut entries = Vec::new();
        for (target, last) in &mut self.targets {
            let Some(bounds) = layout.bounds(*target) else {
                continue;
            };
            let ratio = intersection_ratio(bounds, root_top, root_bottom);
            let is_intersecting = ratio > 0.0 && ratio >= threshold;
            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                entries.push(VisibilityEntry {
                    target: *target,
                    ratio,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

/// Fraction of `b`'s height inside `[root_top, root_bottom)`. A zero-height
/// box counts as fully visible when its edge lies inside the root.
pub fn intersection_ratio(b: LayoutBox, root_top: f32, root_bottom: f32) -> f32 {
    if root_bottom <= root_top {
        return 0.0;
    }
    if b.height <= 0.0 {
        return if b.y >= root_top && b.y < root_bottom { 1.0 } else { 0.0 };
    }
    let overlap = (b.bottom().min(root_bottom) - b.y.max(root_top)).max(0.0);
    (overlap / b.height).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(y: f32, h: f32) -> LayoutBox {
        LayoutBox {
            x: 0.0,
            y,
            width: 100.0,
            height: h,
        }
    }

    #[test]
    fn ratio_partial_overlap() {
        assert_eq!(intersection_ratio(bx(0.0, 100.0), 0.0, 600.0), 1.0);
        assert_eq!(intersection_ratio(bx(550.0, 100.0), 0.0, 600.0), 0.5);
        assert_eq!(intersection_ratio(bx(700.0, 100.0), 0.0, 600.0), 0.0);
    }

    #[test]
    fn bottom_margin_shrinks_root() {
        // 40px of a 100px box peeks into a 600px viewport; the -50 margin
        // hides it entirely.
        let b = bx(560.0, 100.0);
        assert!(intersection_ratio(b, 0.0, 600.0) > 0.1);
        assert_eq!(intersection_ratio(b, 0.0, 550.0), 0.0);
    }
}
