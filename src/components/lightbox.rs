//! Full-screen image lightbox for the gallery.

use crate::dom::{ElementId, Page};
use crate::engine::events::{EventKind, Handler, ListenerId, Listeners, Target};

const OVERLAY_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("background", "rgba(0, 0, 0, 0.9)"),
    ("z-index", "9999"),
    ("cursor", "pointer"),
];

#[derive(Debug, Clone, Copy)]
struct OpenOverlay {
    overlay: ElementId,
    escape: ListenerId,
}

#[derive(Debug, Clone, Default)]
pub struct Lightbox {
    open: Vec<OpenOverlay>,
}

impl Lightbox {
    pub fn setup(page: &Page, listeners: &mut Listeners, item_selector: &str) -> Self {
        for item in page.query_selector_all(item_selector) {
            listeners.add(Target::Element(item), EventKind::Click, Handler::GalleryOpen);
        }
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        !self.open.is_empty()
    }

    pub fn overlays(&self) -> Vec<ElementId> {
        self.open.iter().map(|o| o.overlay).collect()
    }

    /// Show the image inside `item`. Items without an image are ignored.
    pub fn open(&mut self, page: &mut Page, listeners: &mut Listeners, item: ElementId) -> Option<ElementId> {
        let img = page.query_within(item, "img").into_iter().next()?;
        let src = page.attr(img, "src").unwrap_or_default().to_string();
        let alt = page.attr(img, "alt").unwrap_or_default().to_string();

        let overlay = page.create_element("div");
        page.add_class(overlay, "lightbox-overlay");
        for (prop, value) in OVERLAY_STYLE {
            page.set_style(overlay, prop, value);
        }
        let copy = page.create_element("img");
        page.set_attr(copy, "src", &src);
        page.set_attr(copy, "alt", &alt);
        page.append_child(overlay, copy);
        let body = page.body();
        page.append_child(body, overlay);

        listeners.add(
            Target::Element(overlay),
            EventKind::Click,
            Handler::LightboxDismiss(overlay),
        );
        let escape = listeners.add(
            Target::Document,
            EventKind::KeyDown,
            Handler::LightboxEscape(overlay),
        );
        self.open.push(OpenOverlay { overlay, escape });
        log::debug!("lightbox open: {}", src);
        Some(overlay)
    }

    /// Close `overlay`, dropping its Escape listener on every path.
    pub fn dismiss(&mut self, page: &mut Page, listeners: &mut Listeners, overlay: ElementId) -> bool {
        let Some(idx) = self.open.iter().position(|o| o.overlay == overlay) else {
            return false;
        };
        let entry = self.open.remove(idx);
        listeners.remove(entry.escape);
        listeners.remove_target(overlay);
        page.remove(overlay);
        true
    }

    pub fn on_key(&mut self, page: &mut Page, listeners: &mut Listeners, overlay: ElementId, key: &str) -> bool {
        key == "Escape" && self.dismiss(page, listeners, overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;

    const HTML: &str = r#"<body>
        <div class="gallery-item"><img src="img/shot.jpg" alt="Shot"></div>
        <div class="gallery-item"><p>no image</p></div>
    </body>"#;

    #[test]
    fn escape_removes_overlay_and_listener() {
        let mut page = parse_html(HTML, "file:///index.html");
        let mut listeners = Listeners::new();
        let mut lb = Lightbox::setup(&page, &mut listeners, ".gallery-item");
        let item = page.query_selector(".gallery-item").unwrap();

        let overlay = lb.open(&mut page, &mut listeners, item).unwrap();
        assert!(page.is_connected(overlay));
        assert_eq!(listeners.count(Target::Document, EventKind::KeyDown), 1);

        assert!(!lb.on_key(&mut page, &mut listeners, overlay, "Enter"));
        assert!(lb.on_key(&mut page, &mut listeners, overlay, "Escape"));
        assert!(page.get(overlay).is_none());
        assert_eq!(listeners.count(Target::Document, EventKind::KeyDown), 0);
        assert!(!lb.on_key(&mut page, &mut listeners, overlay, "Escape"));
    }

    #[test]
    fn click_dismissal_also_drops_listener() {
        let mut page = parse_html(HTML, "file:///index.html");
        let mut listeners = Listeners::new();
        let mut lb = Lightbox::setup(&page, &mut listeners, ".gallery-item");
        let item = page.query_selector(".gallery-item").unwrap();
        let overlay = lb.open(&mut page, &mut listeners, item).unwrap();

        assert!(lb.dismiss(&mut page, &mut listeners, overlay));
        assert_eq!(listeners.count(Target::Document, EventKind::KeyDown), 0);
        assert_eq!(listeners.count(Target::Element(overlay), EventKind::Click), 0);
        assert!(!lb.is_open());
    }

    #[test]
    fn item_without_image_is_ignored() {
        let mut page = parse_html(HTML, "file:///index.html");
        let mut listeners = Listeners::new();
        let mut lb = Lightbox::setup(&page, &mut listeners, ".gallery-item");
        let bare = page.query_selector_all(".gallery-item")[1];
        assert!(lb.open(&mut page, &mut listeners, bare).is_none());
        assert!(page.query_selector(".lightbox-overlay").is_none());
    }
}
