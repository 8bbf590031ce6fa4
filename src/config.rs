//! Effect tuning knobs.
//!
//! Every constant the page behavior depends on lives here with the page's
//! values as `Default`. The runtime takes an [`EffectConfig`]; components
//! only see their own section.

use crate::render::canvas::Rgba;

#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub canvas_id: String,
    pub glyphs: String,
    /// Glyph cell size in pixels (also the font size).
    pub cell_size: f32,
    pub interval_ms: u64,
    pub trail: Rgba,
    pub color: Rgba,
    /// Per-tick chance that a drop past the bottom restarts.
    pub reset_chance: f64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            canvas_id: "matrix-canvas".into(),
            glyphs: "ABCDEFGHIJKLMNOPQRSTUVWXYZ123456789@#$%^&*()*&^%+-/~{[|`]}".into(),
            cell_size: 14.0,
            interval_ms: 35,
            trail: Rgba::new(0, 0, 0, 0.04),
            color: Rgba::new(0, 255, 0, 1.0),
            reset_chance: 0.025,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypewriterConfig {
    pub element_id: String,
    pub phrases: Vec<String>,
    pub typing_ms: u64,
    pub deleting_ms: u64,
    /// Hold after a phrase is complete.
    pub hold_ms: u64,
    /// Skipped tick between the hold and the first deletion.
    pub pause_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            element_id: "typed-text".into(),
            phrases: [
                "Full Stack Developer",
                "AI-ML Enthusiast",
                "Community Builder",
                "Tech Entrepreneur",
                "Photographer",
                "Innovation Leader",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            typing_ms: 100,
            deleting_ms: 50,
            hold_ms: 2000,
            pause_ms: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RevealConfig {
    pub selector: String,
    pub prepare_class: String,
    pub animate_class: String,
    pub threshold: f32,
    /// Negative values shrink the trigger zone at the bottom.
    pub bottom_margin: f32,
    pub skills_section_id: String,
    pub skill_bar_selector: String,
    pub skills_threshold: f32,
    pub skill_delay_max_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".terminal-window, .project-card, .gallery-item, .skill-category".into(),
            prepare_class: "fade-in".into(),
            animate_class: "animate".into(),
            threshold: 0.1,
            bottom_margin: -50.0,
            skills_section_id: "skills".into(),
            skill_bar_selector: ".skill-progress".into(),
            skills_threshold: 0.5,
            skill_delay_max_ms: 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavigationConfig {
    pub link_selector: String,
    pub anchor_selector: String,
    pub section_selector: String,
    pub active_class: String,
    /// Space reserved for the fixed header.
    pub header_offset: f32,
    pub lookahead: f32,
    pub smooth_scroll_ms: u64,
    pub menu_button_selector: String,
    pub menu_selector: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            link_selector: ".nav-link".into(),
            anchor_selector: "a[href^=\"#\"]".into(),
            section_selector: "section".into(),
            active_class: "active".into(),
            header_offset: 80.0,
            lookahead: 100.0,
            smooth_scroll_ms: 400,
            menu_button_selector: ".mobile-menu-btn".into(),
            menu_selector: ".nav-links".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormConfig {
    pub form_id: String,
    pub fields: Vec<String>,
    pub sending_message: String,
    pub sent_message: String,
    pub send_delay_ms: u64,
    pub message_host_selector: String,
    pub message_lifetime_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: "contact-form".into(),
            fields: vec!["name".into(), "email".into(), "message".into()],
            sending_message: "> Sending message...".into(),
            sent_message: "> Message sent successfully!".into(),
            send_delay_ms: 2000,
            message_host_selector: ".contact-form".into(),
            message_lifetime_ms: 3000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EasterEggConfig {
    pub sequence: Vec<String>,
    pub filter: String,
    pub duration_ms: u64,
    pub message: String,
}

impl Default for EasterEggConfig {
    fn default() -> Self {
        Self {
            sequence: [
                "ArrowUp",
                "ArrowUp",
                "ArrowDown",
                "ArrowDown",
                "ArrowLeft",
                "ArrowRight",
                "ArrowLeft",
                "ArrowRight",
                "KeyB",
                "KeyA",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            filter: "hue-rotate(120deg)".into(),
            duration_ms: 5000,
            message: "> MATRIX MODE ACTIVATED".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub item_selector: String,
    pub project_selector: String,
    pub project_title_selector: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            item_selector: ".gallery-item".into(),
            project_selector: ".project-card".into(),
            project_title_selector: ".project-title".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub enabled: bool,
    pub text: String,
    pub visible_ms: u64,
    pub fade_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "> Initializing Portfolio...".into(),
            visible_ms: 1500,
            fade_ms: 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GlitchConfig {
    pub glyphs: String,
    pub interval_ms: u64,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            glyphs: "!<>-_\\/[]{}—=+*^?#________".into(),
            interval_ms: 30,
        }
    }
}

/// Full runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct EffectConfig {
    pub matrix: MatrixConfig,
    pub typewriter: TypewriterConfig,
    pub reveal: RevealConfig,
    pub navigation: NavigationConfig,
    pub form: FormConfig,
    pub easter_egg: EasterEggConfig,
    pub gallery: GalleryConfig,
    pub loader: LoaderConfig,
    pub glitch: GlitchConfig,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl EffectConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.typewriter.phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Enable/disable the boot loader overlay
    pub fn with_loader(mut self, enabled: bool) -> Self {
        self.loader.enabled = enabled;
        self
    }
}
