//! Smooth-scroll navigation and active-link tracking.

use crate::config::NavigationConfig;
use crate::dom::{ElementId, Page};
use crate::engine::events::{EventKind, Handler, Listeners, Target};
use crate::render::layout::Layout;

/// Vertical extent of a section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionExtent {
    pub top: f32,
    pub height: f32,
}

impl SectionExtent {
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Index of the first section containing `scroll_y + lookahead`.
pub fn active_section(extents: &[SectionExtent], scroll_y: f32, lookahead: f32) -> Option<usize> {
    let pos = scroll_y + lookahead;
    extents.iter().position(|e| e.contains(pos))
}

/// `"#about"` → `"about"`.
fn fragment(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|f| !f.is_empty())
}

#[derive(Debug, Clone)]
pub struct Navigation {
    links: Vec<ElementId>,
    header_offset: f32,
    lookahead: f32,
    section_selector: String,
    active_class: String,
}

impl Navigation {
    pub fn setup(page: &Page, listeners: &mut Listeners, config: &NavigationConfig) -> Self {
        let links = page.query_selector_all(&config.link_selector);
        for &link in &links {
            listeners.add(Target::Element(link), EventKind::Click, Handler::NavLink);
        }
        // Plain in-page anchors scroll without the header offset.
        for anchor in page.query_selector_all(&config.anchor_selector) {
            if !links.contains(&anchor) {
                listeners.add(Target::Element(anchor), EventKind::Click, Handler::AnchorLink);
            }
        }
        listeners.add(Target::Window, EventKind::Scroll, Handler::ActiveSection);

        log::debug!("navigation: {} links", links.len());
        Self {
            links,
            header_offset: config.header_offset,
            lookahead: config.lookahead,
            section_selector: config.section_selector.clone(),
            active_class: config.active_class.clone(),
        }
    }

    pub fn links(&self) -> &[ElementId] {
        &self.links
    }

    fn resolve(page: &Page, link: ElementId) -> Option<ElementId> {
        let href = page.attr(link, "href")?;
        page.get_element_by_id(fragment(href)?)
    }

    /// Scroll destination for a nav link: the target's top minus the header.
    pub fn link_destination(&self, page: &Page, layout: &Layout, link: ElementId) -> Option<f32> {
        let target = Self::resolve(page, link)?;
        Some(layout.offset_top(target)? - self.header_offset)
    }

    /// Scroll destination for a plain anchor: the target's top.
    pub fn anchor_destination(page: &Page, layout: &Layout, anchor: ElementId) -> Option<f32> {
        layout.offset_top(Self::resolve(page, anchor)?)
    }

    /// Recompute the active entry for `scroll_y`. Returns the active section.
    pub fn update_active(&self, page: &mut Page, layout: &Layout, scroll_y: f32) -> Option<ElementId> {
        let sections: Vec<(ElementId, SectionExtent)> = page
            .query_selector_all(&self.section_selector)
            .into_iter()
            .filter_map(|s| {
                let b = layout.bounds(s)?;
                Some((s, SectionExtent { top: b.y, height: b.height }))
            })
            .collect();
        let extents: Vec<SectionExtent> = sections.iter().map(|(_, e)| *e).collect();

        let active = active_section(&extents, scroll_y, self.lookahead).map(|i| sections[i].0);
        let wanted = active
            .and_then(|s| page.attr(s, "id"))
            .map(|id| format!("#{}", id));

        for &link in &self.links {
            let is_match = wanted.is_some() && page.attr(link, "href") == wanted.as_deref();
            if is_match {
                page.add_class(link, &self.active_class);
            } else {
                page.remove_class(link, &self.active_class);
            }
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;
    use crate::render::layout::compute_layout;

    #[test]
    fn lookahead_selects_second_section() {
        let extents = [
            SectionExtent { top: 0.0, height: 100.0 },
            SectionExtent { top: 100.0, height: 200.0 },
        ];
        assert_eq!(active_section(&extents, 150.0, 100.0), Some(1));
        assert_eq!(active_section(&extents, 0.0, 0.0), Some(0));
        assert_eq!(active_section(&extents, 250.0, 100.0), None);
    }

    #[test]
    fn first_containing_section_wins() {
        let extents = [
            SectionExtent { top: 0.0, height: 500.0 },
            SectionExtent { top: 100.0, height: 200.0 },
        ];
        assert_eq!(active_section(&extents, 100.0, 100.0), Some(0));
    }

    #[test]
    fn nothing_active_above_first_section() {
        let extents = [SectionExtent { top: 400.0, height: 100.0 }];
        assert_eq!(active_section(&extents, 0.0, 100.0), None);
    }

    #[test]
    fn destination_reserves_header_space() {
        let html = r##"<body>
            <nav><a class="nav-link" href="#about">About</a><a class="nav-link" href="#nowhere">X</a></nav>
            <section id="home"><p>hello</p></section>
            <section id="about"><p>me</p></section>
        </body>"##;
        let page = parse_html(html, "file:///index.html");
        let layout = compute_layout(&page, 800.0);
        let mut listeners = Listeners::new();
        let nav = Navigation::setup(&page, &mut listeners, &NavigationConfig::default());

        let about = page.get_element_by_id("about").unwrap();
        let top = layout.offset_top(about).unwrap();
        assert_eq!(nav.link_destination(&page, &layout, nav.links()[0]), Some(top - 80.0));
        assert_eq!(nav.link_destination(&page, &layout, nav.links()[1]), None);
        assert_eq!(
            Navigation::anchor_destination(&page, &layout, nav.links()[0]),
            Some(top)
        );
        assert_eq!(listeners.count(Target::Window, EventKind::Scroll), 1);
    }
}
