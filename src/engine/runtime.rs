//! The headless page runtime.
//!
//! Owns the page model, layout, viewport, timer queue and listener registry
//! together with every component. The host feeds it events and advances its
//! virtual clock; everything else happens inside [`Runtime::dispatch`] and
//! [`Runtime::advance`], one handler at a time.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::contact::ContactForm;
use crate::components::easter_egg::EasterEgg;
use crate::components::lightbox::Lightbox;
use crate::components::menu::MobileMenu;
use crate::components::navigation::Navigation;
use crate::components::projects::ProjectCards;
use crate::components::reveal::{Revealer, SkillBars};
use crate::components::status::{fade_loader, mount_loader};
use crate::config::EffectConfig;
use crate::dom::{ElementId, Page};
use crate::effects::glitch::GlitchText;
use crate::effects::matrix::MatrixRain;
use crate::effects::typewriter::Typewriter;
use crate::engine::events::{Event, EventKind, EventSource, Handler, Listeners, Target};
use crate::engine::timers::{TimerId, TimerQueue};
use crate::engine::viewport::{ScrollBehavior, Viewport};
use crate::render::canvas::GlyphCanvas;
use crate::render::layout::{compute_layout, Layout};

/// Deferred work scheduled on the timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    MatrixFrame,
    TypewriterStep,
    GlitchStep(ElementId),
    SkillBarGrow { bar: ElementId },
    ContactSent { form: ElementId },
    RemoveElement(ElementId),
    ClearFilter(ElementId),
    LoaderFade(ElementId),
}

pub struct Runtime {
    config: EffectConfig,
    page: Page,
    layout: Layout,
    layout_key: (u64, f32),
    viewport: Viewport,
    timers: TimerQueue<Task>,
    listeners: Listeners,
    rng: StdRng,

    canvas: Option<GlyphCanvas>,
    matrix: Option<MatrixRain>,
    typewriter: Option<(ElementId, Typewriter)>,
    revealer: Revealer,
    skills: Option<SkillBars>,
    navigation: Navigation,
    menu: Option<MobileMenu>,
    lightbox: Lightbox,
    projects: ProjectCards,
    contact: Option<ContactForm>,
    easter_egg: EasterEgg,
    loader: Option<ElementId>,
    glitches: HashMap<ElementId, (GlitchText, TimerId)>,
}

impl Runtime {
    /// Bind every component to `page` and start the timers. This is the
    /// page-ready step; components whose markup is missing stay inert.
    pub fn new(page: Page, config: EffectConfig, width: f32, height: f32) -> Self {
        let mut page = page;
        let mut listeners = Listeners::new();
        let mut timers = TimerQueue::new();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (canvas, matrix) = if page.get_element_by_id(&config.matrix.canvas_id).is_some() {
            listeners.add(Target::Window, EventKind::Resize, Handler::CanvasResize);
            timers.set_interval(config.matrix.interval_ms, Task::MatrixFrame);
            (
                Some(GlyphCanvas::new(width, height, config.matrix.cell_size)),
                Some(MatrixRain::new(&config.matrix, width)),
            )
        } else {
            (None, None)
        };

        let typewriter = page
            .get_element_by_id(&config.typewriter.element_id)
            .and_then(|el| Some((el, Typewriter::new(&config.typewriter)?)));

        let revealer = Revealer::setup(&mut page, &config.reveal);
        let navigation = Navigation::setup(&page, &mut listeners, &config.navigation);
        let skills = SkillBars::setup(&page, &config.reveal);
        let contact = ContactForm::setup(&page, &mut listeners, &config.form);
        let menu = MobileMenu::setup(&page, &mut listeners, &config.navigation);
        let lightbox = Lightbox::setup(&page, &mut listeners, &config.gallery.item_selector);
        let projects = ProjectCards::setup(&page, &mut listeners, &config.gallery);
        let easter_egg = EasterEgg::setup(&mut listeners, &config.easter_egg);
        let loader = config
            .loader
            .enabled
            .then(|| mount_loader(&mut page, &mut timers, &config.loader));

        let layout = compute_layout(&page, width);
        let mut viewport =
            Viewport::new(width, height).with_smooth_duration(config.navigation.smooth_scroll_ms);
        viewport.set_document_height(layout.document_height);

        log::debug!(
            "runtime ready: {} nodes, {} listeners, matrix={}, typewriter={}",
            page.node_count(),
            listeners.len(),
            matrix.is_some(),
            typewriter.is_some()
        );

        let mut rt = Self {
            layout_key: (page.revision(), width),
            config,
            page,
            layout,
            viewport,
            timers,
            listeners,
            rng,
            canvas,
            matrix,
            typewriter,
            revealer,
            skills,
            navigation,
            menu,
            lightbox,
            projects,
            contact,
            easter_egg,
            loader,
            glitches: HashMap::new(),
        };
        // The typewriter's first step runs immediately.
        if rt.typewriter.is_some() {
            rt.run_task(Task::TypewriterStep);
        }
        rt.observe_visibility();
        rt
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Mutable page access for the host (form input).
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn canvas(&self) -> Option<&GlyphCanvas> {
        self.canvas.as_ref()
    }

    pub fn matrix(&self) -> Option<&MatrixRain> {
        self.matrix.as_ref()
    }

    pub fn skills(&self) -> Option<&SkillBars> {
        self.skills.as_ref()
    }

    pub fn revealer(&self) -> &Revealer {
        &self.revealer
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn projects(&self) -> &ProjectCards {
        &self.projects
    }

    pub fn contact(&self) -> Option<&ContactForm> {
        self.contact.as_ref()
    }

    pub fn easter_egg(&self) -> &EasterEgg {
        &self.easter_egg
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }

    /// The boot loader element while it is still mounted.
    pub fn loader(&self) -> Option<ElementId> {
        self.loader.filter(|&l| self.page.is_connected(l))
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    /// When the next timer fires, if any. Hosts use this to schedule repaints.
    pub fn next_timer_due(&self) -> Option<u64> {
        self.timers.next_due()
    }

    pub fn is_scrolling(&self) -> bool {
        self.viewport.is_animating()
    }

    // ── Events ──────────────────────────────────────────────────────────────

    /// Deliver one host event. Returns whether a handler suppressed the
    /// default action (hosts use this to decide whether to follow links).
    pub fn dispatch(&mut self, event: Event) -> bool {
        match event {
            Event::Scroll { y } => {
                self.refresh_layout();
                self.viewport.set_scroll(y);
            }
            Event::Resize { width, height } => {
                self.viewport.resize(width, height);
                self.refresh_layout();
            }
            _ => {}
        }

        let prevented = self.deliver(&event);
        if !prevented {
            self.default_action(&event);
        }
        self.observe_visibility();
        prevented
    }

    /// Drain every pending event from `source`.
    pub fn pump<S: EventSource + ?Sized>(&mut self, source: &mut S) -> usize {
        let mut n = 0;
        while let Some(event) = source.next_event() {
            self.dispatch(event);
            n += 1;
        }
        n
    }

    fn event_path(&self, event: &Event) -> Vec<Target> {
        let mut path: Vec<Target> = match event {
            Event::Click { target } => self.page.ancestors(*target).into_iter().map(Target::Element).collect(),
            Event::Submit { form } => self.page.ancestors(*form).into_iter().map(Target::Element).collect(),
            Event::KeyDown { .. } => vec![Target::Document],
            Event::Scroll { .. } | Event::Resize { .. } => Vec::new(),
        };
        if matches!(event, Event::Click { .. } | Event::Submit { .. }) {
            path.push(Target::Document);
        }
        path.push(Target::Window);
        path
    }

    fn deliver(&mut self, event: &Event) -> bool {
        let path = self.event_path(event);
        let mut prevented = false;
        for (id, target, handler) in self.listeners.route(event.kind(), &path) {
            // A handler earlier in this dispatch may have removed it.
            if !self.listeners.contains(id) {
                continue;
            }
            prevented |= self.run_handler(handler, target, event);
        }
        prevented
    }

    fn run_handler(&mut self, handler: Handler, target: Target, event: &Event) -> bool {
        let element = match target {
            Target::Element(el) => Some(el),
            _ => None,
        };
        match handler {
            Handler::CanvasResize => {
                if let (Some(canvas), Some(matrix)) = (self.canvas.as_mut(), self.matrix.as_mut()) {
                    canvas.resize(self.viewport.width, self.viewport.height);
                    matrix.resize(self.viewport.width);
                }
                false
            }
            Handler::NavLink => {
                if let Some(link) = element {
                    self.refresh_layout();
                    if let Some(top) = self.navigation.link_destination(&self.page, &self.layout, link) {
                        self.scroll_smooth(top);
                    }
                }
                true
            }
            Handler::AnchorLink => {
                if let Some(anchor) = element {
                    self.refresh_layout();
                    if let Some(top) = Navigation::anchor_destination(&self.page, &self.layout, anchor) {
                        self.scroll_smooth(top);
                    }
                }
                true
            }
            Handler::ActiveSection => {
                self.refresh_layout();
                self.navigation
                    .update_active(&mut self.page, &self.layout, self.viewport.scroll_y());
                false
            }
            Handler::MenuToggle => {
                if let Some(menu) = &self.menu {
                    menu.toggle(&mut self.page);
                }
                false
            }
            Handler::MenuClose => {
                if let Some(menu) = &self.menu {
                    menu.close(&mut self.page);
                }
                false
            }
            Handler::GalleryOpen => {
                if let Some(item) = element {
                    self.lightbox.open(&mut self.page, &mut self.listeners, item);
                }
                false
            }
            Handler::ProjectOpen => {
                if let Some(card) = element {
                    self.projects.open(&self.page, card);
                }
                false
            }
            Handler::LightboxDismiss(overlay) => {
                self.lightbox.dismiss(&mut self.page, &mut self.listeners, overlay);
                false
            }
            Handler::LightboxEscape(overlay) => {
                if let Event::KeyDown { key, .. } = event {
                    self.lightbox
                        .on_key(&mut self.page, &mut self.listeners, overlay, key);
                }
                false
            }
            Handler::ContactSubmit => {
                if let Some(contact) = self.contact.as_mut() {
                    contact.submit(&mut self.page, &mut self.timers, &self.config.form);
                }
                true
            }
            Handler::EasterEgg => {
                if let Event::KeyDown { code, .. } = event {
                    let activated = self.easter_egg.on_key(
                        &mut self.page,
                        &mut self.timers,
                        &self.config.easter_egg,
                        &self.config.form,
                        code,
                    );
                    if activated {
                        log::info!("matrix mode on for {} ms", self.config.easter_egg.duration_ms);
                    }
                }
                false
            }
        }
    }

    /// Built-in behavior when no handler suppressed it: submit buttons
    /// submit their form.
    fn default_action(&mut self, event: &Event) {
        let Event::Click { target } = event else {
            return;
        };
        let Some(button) = self.page.closest(*target, "button, input") else {
            return;
        };
        let kind = self.page.attr(button, "type").unwrap_or("");
        let submits = match self.page.get(button).map(|e| e.tag.as_str()) {
            Some("button") => !matches!(kind, "button" | "reset"),
            Some("input") => kind == "submit",
            _ => false,
        };
        if !submits {
            return;
        }
        if let Some(form) = self.page.closest(button, "form") {
            self.dispatch(Event::Submit { form });
        }
    }

    fn scroll_smooth(&mut self, top: f32) {
        let now = self.timers.now();
        if self.viewport.scroll_to(top, ScrollBehavior::Smooth, now) {
            self.deliver(&Event::Scroll { y: self.viewport.scroll_y() });
        }
    }

    // ── Clock ───────────────────────────────────────────────────────────────

    /// Advance the virtual clock by `dt_ms`, firing every timer that falls
    /// due on the way, then step any running smooth scroll.
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.timers.now() + dt_ms;
        self.advance_to(until);
    }

    pub fn advance_to(&mut self, until_ms: u64) {
        while let Some((_, task)) = self.timers.pop_due(until_ms) {
            self.run_task(task);
        }
        self.timers.settle(until_ms);
        self.refresh_layout();
        if self.viewport.tick(until_ms) {
            self.deliver(&Event::Scroll { y: self.viewport.scroll_y() });
        }
        self.observe_visibility();
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::MatrixFrame => {
                if let (Some(canvas), Some(matrix)) = (self.canvas.as_mut(), self.matrix.as_mut()) {
                    matrix.step(canvas, &mut self.rng);
                }
            }
            Task::TypewriterStep => {
                if let Some((el, writer)) = self.typewriter.as_mut() {
                    let step = writer.step();
                    if let Some(text) = step.text {
                        self.page.set_text_content(*el, &text);
                    }
                    self.timers.set_timeout(step.next_delay_ms, Task::TypewriterStep);
                }
            }
            Task::GlitchStep(el) => self.glitch_step(el),
            Task::SkillBarGrow { bar } => SkillBars::grow(&mut self.page, bar),
            Task::ContactSent { form } => {
                if let Some(contact) = self.contact.as_ref().filter(|c| c.form() == form) {
                    contact.complete(&mut self.page, &mut self.timers, &self.config.form);
                }
            }
            Task::RemoveElement(el) => {
                for node in self.page.descendants(el) {
                    self.listeners.remove_target(node);
                }
                self.page.remove(el);
            }
            Task::ClearFilter(el) => self.page.remove_style(el, "filter"),
            Task::LoaderFade(el) => fade_loader(&mut self.page, &mut self.timers, el, &self.config.loader),
        }
    }

    // ── Glitch text ─────────────────────────────────────────────────────────

    /// Scramble `el`'s text and let it settle back. Restarting on an element
    /// that is already glitching keeps its original text.
    pub fn glitch_text(&mut self, el: ElementId) -> bool {
        if self.page.get(el).is_none() {
            return false;
        }
        let original = match self.glitches.remove(&el) {
            Some((glitch, timer)) => {
                self.timers.clear(timer);
                glitch.original()
            }
            None => self.page.text_content(el),
        };
        let timer = self
            .timers
            .set_interval(self.config.glitch.interval_ms, Task::GlitchStep(el));
        self.glitches
            .insert(el, (GlitchText::new(&original, &self.config.glitch), timer));
        true
    }

    pub fn is_glitching(&self, el: ElementId) -> bool {
        self.glitches.contains_key(&el)
    }

    fn glitch_step(&mut self, el: ElementId) {
        let Some((glitch, timer)) = self.glitches.get_mut(&el) else {
            return;
        };
        let (text, done) = glitch.step(&mut self.rng);
        let timer = *timer;
        self.page.set_text_content(el, &text);
        if done || self.page.get(el).is_none() {
            self.timers.clear(timer);
            self.glitches.remove(&el);
        }
    }

    // ── Layout & visibility ─────────────────────────────────────────────────

    fn refresh_layout(&mut self) {
        let key = (self.page.revision(), self.viewport.width);
        if key == self.layout_key {
            return;
        }
        self.layout = compute_layout(&self.page, self.viewport.width);
        self.layout_key = key;
        self.viewport.set_document_height(self.layout.document_height);
    }

    fn observe_visibility(&mut self) {
        self.refresh_layout();
        let entries = self
            .revealer
            .watcher_mut()
            .evaluate(&self.layout, &self.viewport);
        self.revealer.apply(&mut self.page, &entries);

        if let Some(skills) = self.skills.as_mut() {
            let entries = skills.watcher_mut().evaluate(&self.layout, &self.viewport);
            skills.apply(&mut self.page, &mut self.timers, &mut self.rng, &entries);
        }
    }
}
