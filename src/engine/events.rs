//! Host events and the listener registry.
//!
//! Handlers are plain values naming a component action rather than closures,
//! so the registry can be inspected (and counted) from tests, and removing a
//! listener is just dropping its entry.

use std::collections::VecDeque;

use crate::dom::ElementId;

/// Something the host reports to the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer activation on an element.
    Click { target: ElementId },
    /// A form was submitted.
    Submit { form: ElementId },
    /// Key pressed. `code` is the physical key (`KeyB`), `key` the logical
    /// value (`Escape`).
    KeyDown { code: String, key: String },
    /// The user scrolled the document to `y`.
    Scroll { y: f32 },
    /// The viewport changed size.
    Resize { width: f32, height: f32 },
}

impl Event {
    pub fn key(code: &str) -> Self {
        Event::KeyDown {
            code: code.to_string(),
            key: code.to_string(),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click { .. } => EventKind::Click,
            Event::Submit { .. } => EventKind::Submit,
            Event::KeyDown { .. } => EventKind::KeyDown,
            Event::Scroll { .. } => EventKind::Scroll,
            Event::Resize { .. } => EventKind::Resize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    KeyDown,
    Scroll,
    Resize,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Element(ElementId),
    Document,
    Window,
}

/// Component action bound to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    CanvasResize,
    NavLink,
    AnchorLink,
    ActiveSection,
    MenuToggle,
    MenuClose,
    GalleryOpen,
    ProjectOpen,
    LightboxDismiss(ElementId),
    LightboxEscape(ElementId),
    ContactSubmit,
    EasterEgg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    target: Target,
    kind: EventKind,
    handler: Handler,
}

/// Registered listeners in registration order.
#[derive(Debug, Clone, Default)]
pub struct Listeners {
    next: u64,
    entries: Vec<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: Target, kind: EventKind, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.entries.push(Listener {
            id,
            target,
            kind,
            handler,
        });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|l| l.id != id);
        self.entries.len() != before
    }

    /// Drop every listener attached to `element` (used when it is removed).
    pub fn remove_target(&mut self, element: ElementId) {
        self.entries
            .retain(|l| l.target != Target::Element(element));
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of listeners of `kind` on `target`.
    pub fn count(&self, target: Target, kind: EventKind) -> usize {
        self.entries
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .count()
    }

    /// Snapshot of the listeners an event of `kind` reaches when it travels
    /// along `path` (target first, bubbling outwards).
    pub fn route(&self, kind: EventKind, path: &[Target]) -> Vec<(ListenerId, Target, Handler)> {
        let mut out = Vec::new();
        for &t in path {
            for l in self.entries.iter().filter(|l| l.kind == kind && l.target == t) {
                out.push((l.id, l.target, l.handler));
            }
        }
        out
    }
}

/// Anything that can feed host events to the runtime.
pub trait EventSource {
    fn next_event(&mut self) -> Option<Event>;
}

impl EventSource for VecDeque<Event> {
    fn next_event(&mut self) -> Option<Event> {
        self.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Page;

    #[test]
    fn route_bubbles_target_first() {
        let mut ls = Listeners::new();
        let el = Page::new("about:blank").create_element("a");
        ls.add(Target::Document, EventKind::Click, Handler::MenuClose);
        ls.add(Target::Element(el), EventKind::Click, Handler::NavLink);
        ls.add(Target::Element(el), EventKind::KeyDown, Handler::EasterEgg);

        let routed = ls.route(EventKind::Click, &[Target::Element(el), Target::Document]);
        let handlers: Vec<Handler> = routed.iter().map(|r| r.2).collect();
        assert_eq!(handlers, vec![Handler::NavLink, Handler::MenuClose]);
    }

    #[test]
    fn remove_and_count() {
        let mut ls = Listeners::new();
        let id = ls.add(Target::Document, EventKind::KeyDown, Handler::EasterEgg);
        assert_eq!(ls.count(Target::Document, EventKind::KeyDown), 1);
        assert!(ls.remove(id));
        assert!(!ls.remove(id));
        assert_eq!(ls.count(Target::Document, EventKind::KeyDown), 0);
    }

    #[test]
    fn queue_is_an_event_source() {
        let mut q: VecDeque<Event> = VecDeque::new();
        q.push_back(Event::key("KeyA"));
        assert_eq!(q.next_event().map(|e| e.kind()), Some(EventKind::KeyDown));
        assert!(q.next_event().is_none());
    }
}
