pub mod css;
pub mod parser;
pub mod selector;

use std::collections::HashMap;

use self::css::StyleMap;
use self::selector::Selector;

/// Handle into a [`Page`] arena: slot index plus the slot's generation.
/// Vacated slots are reused, but under a new generation, so a handle to a
/// removed element stops resolving instead of aliasing its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize, u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
}

/// One node of the page model.
///
/// Form controls keep their live `value` next to the `default_value` they
/// were parsed with, so a form reset can restore them.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub node_type: NodeType,
    pub attributes: HashMap<String, String>,
    pub classes: Vec<String>,
    pub style: StyleMap,
    pub text: String,
    pub value: String,
    pub default_value: String,
    pub children: Vec<ElementId>,
    pub parent: Option<ElementId>,
}

impl Element {
    fn new(tag: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            tag: tag.into(),
            node_type,
            attributes: HashMap::new(),
            classes: Vec::new(),
            style: StyleMap::default(),
            text: String::new(),
            value: String::new(),
            default_value: String::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea" | "select")
    }
}

/// Mutable page model: an arena of elements rooted at a document node.
#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<Slot>,
    free: Vec<usize>,
    root: ElementId,
    revision: u64,
    pub url: String,
    pub title: String,
}

impl Page {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            nodes: vec![Slot {
                generation: 0,
                node: Some(Element::new("#document", NodeType::Document)),
            }],
            free: Vec::new(),
            root: ElementId(0, 0),
            revision: 0,
            url: url.into(),
            title: String::new(),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Bumped on every change that can move layout (structure, text).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The `<body>` element, or the document itself for fragments.
    pub fn body(&self) -> ElementId {
        self.descendants(self.root)
            .into_iter()
            .find(|&id| self.get(id).is_some_and(|e| e.tag == "body"))
            .unwrap_or(self.root)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes
            .get(id.0)
            .filter(|s| s.generation == id.1)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes
            .get_mut(id.0)
            .filter(|s| s.generation == id.1)
            .and_then(|s| s.node.as_mut())
    }

    /// Whether the element exists and is attached under the document root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == self.root {
                return true;
            }
            cur = self.get(c).and_then(|e| e.parent);
        }
        false
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|s| s.node.is_some()).count()
    }

    /// Arena size including vacated slots waiting for reuse.
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    // ── Construction ────────────────────────────────────────────────────────

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.alloc(Element::new(tag.to_lowercase(), NodeType::Element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: &str) -> ElementId {
        let mut node = Element::new("", NodeType::Text);
        node.text = content.to_string();
        self.alloc(node)
    }

    fn alloc(&mut self, node: Element) -> ElementId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.nodes[index];
                slot.node = Some(node);
                ElementId(index, slot.generation)
            }
            None => {
                self.nodes.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                ElementId(self.nodes.len() - 1, 0)
            }
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if self.get(parent).is_none() || self.get(child).is_none() || parent == child {
            return;
        }
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        self.revision += 1;
    }

    fn detach(&mut self, id: ElementId) {
        let parent = self.get(id).and_then(|e| e.parent);
        if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
            p.children.retain(|&c| c != id);
        }
        if let Some(e) = self.get_mut(id) {
            e.parent = None;
        }
    }

    /// Remove an element and its whole subtree. Returns false if it was
    /// already gone.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root || self.get(id).is_none() {
            return false;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if self.get(cur).is_none() {
                continue;
            }
            let slot = &mut self.nodes[cur.0];
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(cur.0);
                stack.extend(node.children);
            }
        }
        self.revision += 1;
        true
    }

    // ── Traversal & queries ─────────────────────────────────────────────────

    /// Pre-order list of `id` and everything below it.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.get(cur) {
                out.push(cur);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut cur = self.get(id).map(|_| id);
        while let Some(c) = cur {
            out.push(c);
            cur = self.get(c).and_then(|e| e.parent);
        }
        out
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&e| self.get(e).and_then(|n| n.attr("id")) == Some(id))
    }

    /// All connected elements matching `selector`, in document order.
    /// An unsupported selector matches nothing.
    pub fn query_selector_all(&self, selector: &str) -> Vec<ElementId> {
        self.query_within(self.root, selector)
    }

    pub fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// Matching descendants of `scope` (excluding `scope` itself).
    pub fn query_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(sel) = Selector::parse(selector) else {
            log::warn!("unsupported selector: {}", selector);
            return Vec::new();
        };
        self.descendants(scope)
            .into_iter()
            .skip(1)
            .filter(|&id| self.get(id).is_some_and(|e| sel.matches(e)))
            .collect()
    }

    /// Nearest element (starting at `id`) that matches `selector`.
    pub fn closest(&self, id: ElementId, selector: &str) -> Option<ElementId> {
        let sel = Selector::parse(selector)?;
        self.ancestors(id)
            .into_iter()
            .find(|&a| self.get(a).is_some_and(|e| sel.matches(e)))
    }

    // ── Attributes & classes ────────────────────────────────────────────────

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.attr(name))
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(e) = self.get_mut(id) {
            e.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.get_mut(id) {
            if !e.has_class(class) {
                e.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.get_mut(id) {
            e.classes.retain(|c| c != class);
        }
    }

    /// Toggle a class; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.has_class(id, class)
        }
    }

    // ── Style ───────────────────────────────────────────────────────────────

    pub fn style(&self, id: ElementId, prop: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.style.get(prop))
    }

    pub fn set_style(&mut self, id: ElementId, prop: &str, value: &str) {
        if let Some(e) = self.get_mut(id) {
            e.style.set(prop, value);
        }
    }

    pub fn remove_style(&mut self, id: ElementId, prop: &str) {
        if let Some(e) = self.get_mut(id) {
            e.style.remove(prop);
        }
    }

    // ── Text ────────────────────────────────────────────────────────────────

    /// Concatenated text of the subtree, like `textContent`.
    pub fn text_content(&self, id: ElementId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.get(n))
            .filter(|n| n.node_type == NodeType::Text)
            .map(|n| n.text.as_str())
            .collect()
    }

    /// Replace all children with a single text node, like assigning
    /// `textContent`.
    pub fn set_text_content(&mut self, id: ElementId, text: &str) {
        let (is_text, children) = match self.get(id) {
            Some(e) => (e.node_type == NodeType::Text, e.children.clone()),
            None => return,
        };
        if is_text {
            if let Some(e) = self.get_mut(id) {
                e.text = text.to_string();
            }
            self.revision += 1;
            return;
        }
        // A lone text child is rewritten in place.
        if let [only] = children[..] {
            if !text.is_empty() && self.get(only).is_some_and(|c| c.node_type == NodeType::Text) {
                if let Some(c) = self.get_mut(only) {
                    c.text = text.to_string();
                }
                self.revision += 1;
                return;
            }
        }
        for c in children {
            self.remove(c);
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
        self.revision += 1;
    }

    // ── Forms ───────────────────────────────────────────────────────────────

    pub fn value(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|e| e.value.as_str())
    }

    pub fn set_value(&mut self, id: ElementId, value: &str) {
        if let Some(e) = self.get_mut(id) {
            e.value = value.to_string();
        }
    }

    /// Value of the form control named `name` inside `form`.
    pub fn form_field(&self, form: ElementId, name: &str) -> Option<String> {
        self.descendants(form)
            .into_iter()
            .filter_map(|id| self.get(id))
            .find(|e| e.is_form_control() && e.attr("name") == Some(name))
            .map(|e| e.value.clone())
    }

    /// Restore every control inside `form` to its initial value.
    pub fn reset_form(&mut self, form: ElementId) {
        for id in self.descendants(form) {
            if let Some(e) = self.get_mut(id) {
                if e.is_form_control() {
                    e.value = e.default_value.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Page, ElementId, ElementId) {
        let mut page = Page::new("about:blank");
        let body = page.create_element("body");
        page.append_child(page.root(), body);
        let nav = page.create_element("a");
        page.set_attr(nav, "href", "#about");
        page.add_class(nav, "nav-link");
        page.append_child(body, nav);
        (page, body, nav)
    }

    #[test]
    fn query_by_class_and_attr() {
        let (page, body, nav) = sample();
        assert_eq!(page.body(), body);
        assert_eq!(page.query_selector_all(".nav-link"), vec![nav]);
        assert_eq!(page.query_selector("a[href^=\"#\"]"), Some(nav));
        assert!(page.query_selector(".missing").is_none());
    }

    #[test]
    fn remove_frees_subtree() {
        let (mut page, body, nav) = sample();
        let label = page.create_text("About");
        page.append_child(nav, label);
        assert!(page.remove(nav));
        assert!(page.get(nav).is_none());
        assert!(page.get(label).is_none());
        assert!(page.get(body).unwrap().children.is_empty());
        assert!(!page.remove(nav));
    }

    #[test]
    fn removed_slots_are_reused_under_new_ids() {
        let (mut page, body, nav) = sample();
        let slots = page.slot_count();
        assert!(page.remove(nav));
        let div = page.create_element("div");
        page.append_child(body, div);
        assert_eq!(page.slot_count(), slots);
        assert_eq!(div.index(), nav.index());
        assert_ne!(div, nav);
        assert!(page.get(nav).is_none());
        assert!(!page.is_connected(nav));
        assert_eq!(page.get(div).map(|e| e.tag.as_str()), Some("div"));
    }

    #[test]
    fn toggle_class_round_trip() {
        let (mut page, _, nav) = sample();
        assert!(page.toggle_class(nav, "active"));
        assert!(page.has_class(nav, "active"));
        assert!(!page.toggle_class(nav, "active"));
        assert!(!page.has_class(nav, "active"));
    }

    #[test]
    fn text_content_replaces_children() {
        let (mut page, body, _) = sample();
        let span = page.create_element("span");
        page.append_child(body, span);
        page.set_text_content(span, "Full");
        page.set_text_content(span, "Full Stack");
        assert_eq!(page.text_content(span), "Full Stack");
        assert_eq!(page.get(span).unwrap().children.len(), 1);
        let slots = page.slot_count();
        for i in 0..100 {
            page.set_text_content(span, &"x".repeat(i % 7 + 1));
        }
        assert_eq!(page.slot_count(), slots);
        page.set_text_content(span, "");
        assert!(page.get(span).unwrap().children.is_empty());
    }

    #[test]
    fn reset_form_restores_defaults() {
        let (mut page, body, _) = sample();
        let form = page.create_element("form");
        page.append_child(body, form);
        let input = page.create_element("input");
        page.set_attr(input, "name", "email");
        page.append_child(form, input);
        page.set_value(input, "neo@matrix.io");
        assert_eq!(page.form_field(form, "email").as_deref(), Some("neo@matrix.io"));
        page.reset_form(form);
        assert_eq!(page.form_field(form, "email").as_deref(), Some(""));
    }

    #[test]
    fn closest_walks_up() {
        let (mut page, body, nav) = sample();
        let item = page.create_element("div");
        page.add_class(item, "gallery-item");
        page.append_child(body, item);
        let img = page.create_element("img");
        page.append_child(item, img);
        assert_eq!(page.closest(img, ".gallery-item"), Some(item));
        assert_eq!(page.closest(nav, ".gallery-item"), None);
    }
}
