//! `PortfolioApp`, the top-level egui application state.
//!
//! The struct lives here; its methods are split across the sibling modules:
//!
//! - `navigation`: background page loading
//! - `toolbar`:    page source bar and controls
//! - `content`:    page painting and event forwarding

pub mod content;
pub mod navigation;
pub mod toolbar;

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use cyber_portfolio::config::EffectConfig;
use cyber_portfolio::engine::pipeline::PageError;
use cyber_portfolio::engine::runtime::Runtime;
use cyber_portfolio::net::image::ImageLoader;

use crate::Args;

pub struct PortfolioApp {
    pub source_input: String,
    pub runtime: Option<Runtime>,
    pub error: Option<String>,
    pub loading: bool,
    pub load_rx: Option<mpsc::Receiver<Result<Runtime, PageError>>>,
    /// Wall-clock instant matching the runtime's virtual time zero.
    pub loaded_at: Instant,
    pub seed: Option<u64>,
    pub config: EffectConfig,
    pub initial_size: egui::Vec2,
    pub image_loader: ImageLoader,
    pub image_textures: HashMap<String, egui::TextureHandle>,
    /// Scroll offset last pushed to or read from the scroll area.
    pub last_scroll: f32,
}

impl PortfolioApp {
    pub fn new(args: &Args) -> Self {
        Self {
            source_input: args.page.clone(),
            runtime: None,
            error: None,
            loading: false,
            load_rx: None,
            loaded_at: Instant::now(),
            seed: args.seed,
            config: effect_config(args),
            initial_size: egui::vec2(args.width, args.height),
            image_loader: ImageLoader::new(),
            image_textures: HashMap::new(),
            last_scroll: 0.0,
        }
    }
}

fn effect_config(args: &Args) -> EffectConfig {
    let mut config = EffectConfig::default().with_loader(!args.no_loader);
    if !args.phrases.is_empty() {
        config = config.with_phrases(args.phrases.iter().cloned());
    }
    config
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load();
        self.image_loader.poll();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, ctx);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(crate::ui::BACKGROUND))
            .show(ctx, |ui| {
                self.draw_content(ui, ctx);
            });
    }
}
