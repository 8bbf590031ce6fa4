use clap::Parser;
use eframe::egui;

mod app;
mod ui;

use app::PortfolioApp;

/// Cyberpunk portfolio viewer: renders a portfolio page and runs its effects.
#[derive(Parser, Debug, Clone)]
#[command(name = "cyber-portfolio", version, about)]
pub struct Args {
    /// Portfolio page: a local path, a file:// URL or an http(s) URL
    #[arg(default_value = "index.html")]
    pub page: String,

    /// Initial window width in points
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Initial window height in points
    #[arg(long, default_value_t = 800.0)]
    pub height: f32,

    /// Fix the random seed (reproducible rain)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Typewriter phrase; repeat to replace the default list
    #[arg(long = "phrase")]
    pub phrases: Vec<String>,

    /// Skip the boot loader overlay
    #[arg(long)]
    pub no_loader: bool,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("opening {} at {}x{}", args.page, args.width, args.height);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_title("> cyber-portfolio"),
        ..Default::default()
    };

    eframe::run_native(
        "cyber-portfolio",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            let mut app = PortfolioApp::new(&args);
            app.load(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
}
