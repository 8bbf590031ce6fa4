use crate::config::GalleryConfig;
use crate::dom::{ElementId, Page};
use crate::engine::events::{EventKind, Handler, Listeners, Target};

/// Project cards announce the project they open in the log.
#[derive(Debug, Clone)]
pub struct ProjectCards {
    title_selector: String,
    opened: usize,
    last: Option<String>,
}

impl ProjectCards {
    pub fn setup(page: &Page, listeners: &mut Listeners, config: &GalleryConfig) -> Self {
        for card in page.query_selector_all(&config.project_selector) {
            listeners.add(Target::Element(card), EventKind::Click, Handler::ProjectOpen);
        }
        Self {
            title_selector: config.project_title_selector.clone(),
            opened: 0,
            last: None,
        }
    }

    /// Number of project opens so far.
    pub fn opened(&self) -> usize {
        self.opened
    }

    pub fn last_opened(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn open(&mut self, page: &Page, card: ElementId) -> Option<&str> {
        let title_el = page.query_within(card, &self.title_selector).into_iter().next()?;
        let title = page.text_content(title_el).trim().to_string();
        log::info!("> Opening project: {}", title);
        self.opened += 1;
        self.last = Some(title);
        self.last.as_deref()
    }
}
