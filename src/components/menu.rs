use crate::config::NavigationConfig;
use crate::dom::{ElementId, Page};
use crate::engine::events::{EventKind, Handler, Listeners, Target};

/// Mobile menu: a button that slides the nav list in and out.
#[derive(Debug, Clone)]
pub struct MobileMenu {
    button: ElementId,
    menu: ElementId,
    active_class: String,
}

impl MobileMenu {
    /// Needs both the button and the nav list; `None` otherwise.
    pub fn setup(page: &Page, listeners: &mut Listeners, config: &NavigationConfig) -> Option<Self> {
        let button = page.query_selector(&config.menu_button_selector)?;
        let menu = page.query_selector(&config.menu_selector)?;

        listeners.add(Target::Element(button), EventKind::Click, Handler::MenuToggle);
        for link in page.query_selector_all(&config.link_selector) {
            listeners.add(Target::Element(link), EventKind::Click, Handler::MenuClose);
        }
        Some(Self {
            button,
            menu,
            active_class: config.active_class.clone(),
        })
    }

    pub fn is_open(&self, page: &Page) -> bool {
        page.has_class(self.menu, &self.active_class)
    }

    pub fn toggle(&self, page: &mut Page) -> bool {
        let open = page.toggle_class(self.menu, &self.active_class);
        page.toggle_class(self.button, &self.active_class);
        open
    }

    pub fn close(&self, page: &mut Page) {
        page.remove_class(self.menu, &self.active_class);
        page.remove_class(self.button, &self.active_class);
    }
}
