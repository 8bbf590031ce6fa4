//! Scroll-triggered reveal and skill-bar animation.
//!
//! Two watchers with different policies: reveal targets stay observed
//! forever (adding `animate` again is a no-op), while the skills section is
//! unobserved as soon as its bars have been animated once.

use rand::Rng;

use crate::config::RevealConfig;
use crate::dom::{ElementId, Page};
use crate::engine::runtime::Task;
use crate::engine::timers::TimerQueue;
use crate::engine::visibility::{VisibilityEntry, VisibilityWatcher, WatchOptions};

#[derive(Debug, Clone)]
pub struct Revealer {
    watcher: VisibilityWatcher,
    animate_class: String,
}

impl Revealer {
    /// Mark every reveal target with the prepare class and start watching it.
    pub fn setup(page: &mut Page, config: &RevealConfig) -> Self {
        let mut watcher = VisibilityWatcher::new(WatchOptions {
            threshold: config.threshold,
            bottom_margin: config.bottom_margin,
        });
        for el in page.query_selector_all(&config.selector) {
            page.add_class(el, &config.prepare_class);
            watcher.observe(el);
        }
        log::debug!("reveal: watching {} elements", watcher.observed());
        Self {
            watcher,
            animate_class: config.animate_class.clone(),
        }
    }

    pub fn watcher(&self) -> &VisibilityWatcher {
        &self.watcher
    }

    pub fn watcher_mut(&mut self) -> &mut VisibilityWatcher {
        &mut self.watcher
    }

    pub fn apply(&mut self, page: &mut Page, entries: &[VisibilityEntry]) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            page.add_class(entry.target, &self.animate_class);
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkillBars {
    section: ElementId,
    bar_selector: String,
    delay_max_ms: u64,
    watcher: VisibilityWatcher,
    fired: usize,
}

impl SkillBars {
    /// `None` when the page has no skills section.
    pub fn setup(page: &Page, config: &RevealConfig) -> Option<Self> {
        let section = page.get_element_by_id(&config.skills_section_id)?;
        let mut watcher = VisibilityWatcher::new(WatchOptions {
            threshold: config.skills_threshold,
            bottom_margin: 0.0,
        });
        watcher.observe(section);
        Some(Self {
            section,
            bar_selector: config.skill_bar_selector.clone(),
            delay_max_ms: config.skill_delay_max_ms,
            watcher,
            fired: 0,
        })
    }

    pub fn section(&self) -> ElementId {
        self.section
    }

    pub fn watcher(&self) -> &VisibilityWatcher {
        &self.watcher
    }

    pub fn watcher_mut(&mut self) -> &mut VisibilityWatcher {
        &mut self.watcher
    }

    /// How many times the bars were animated.
    pub fn fired(&self) -> usize {
        self.fired
    }

    /// Animate every bar once the section is visible, then stop watching.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        page: &mut Page,
        timers: &mut TimerQueue<Task>,
        rng: &mut R,
        entries: &[VisibilityEntry],
    ) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            for bar in page.query_selector_all(&self.bar_selector) {
                let Some(width) = page.attr(bar, "data-width").map(str::to_string) else {
                    continue;
                };
                page.set_style(bar, "--target-width", &format!("{}%", width));
                let delay = if self.delay_max_ms == 0 {
                    0
                } else {
                    rng.gen_range(0..self.delay_max_ms)
                };
                timers.set_timeout(delay, Task::SkillBarGrow { bar });
            }
            self.watcher.unobserve(entry.target);
            self.fired += 1;
            log::debug!("skill bars animated");
        }
    }

    /// Final step for one bar: grow it to its target width.
    pub fn grow(page: &mut Page, bar: ElementId) {
        if let Some(width) = page.attr(bar, "data-width").map(str::to_string) {
            page.set_style(bar, "width", &format!("{}%", width));
        }
    }
}
