use anyhow::{anyhow, Context as _};
use shipspot::{
    assets::{fetcher_for_root, AssetLoader, CacheStorage, CachingFetcher},
    prelude::{Arc, Duration, Instant},
    ui::{ImageTextures, ImageViewer, Sidebar},
    AppConfig, FileStore, QuizSession,
};
use std::path::PathBuf;

/// Desktop deck-plan marker quiz
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shipspot::init_logging();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())
        .map_err(|e| anyhow!(e))
        .context("failed to load configuration")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_title("Ship Equipment Marker"),
        ..Default::default()
    };

    eframe::run_native(
        "shipspot-app",
        options,
        Box::new(|cc| Box::new(ShipSpotApp::new(cc, config))),
    )
    .map_err(|e| anyhow!("viewer exited with an error: {}", e))?;

    Ok(())
}

/// Everything the app needs once the session is up
struct Loaded {
    session: QuizSession,
    loader: AssetLoader,
    textures: ImageTextures,
}

enum AppState {
    /// Shown for one frame before the session is built
    Starting(AppConfig),
    Ready(Box<Loaded>),
    Failed(String),
    /// Transient while moving between states
    Empty,
}

struct ShipSpotApp {
    state: AppState,
    frames: u64,
}

impl ShipSpotApp {
    fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self {
            state: AppState::Starting(config),
            frames: 0,
        }
    }

    fn start(config: AppConfig) -> shipspot::Result<Loaded> {
        let store = FileStore::open(&config.storage_path);
        let fetcher = Arc::new(CachingFetcher::new(
            fetcher_for_root(&config.asset_root),
            CacheStorage::new(config.cache.capacity),
            config.cache.clone(),
        ));
        let session = QuizSession::from_config(config, Box::new(store))?;

        let loader = AssetLoader::new(fetcher);
        loader.prepare_cache();

        Ok(Loaded {
            session,
            loader,
            textures: ImageTextures::new(),
        })
    }

    fn loading_screen(ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.spinner();
                    ui.label(message);
                });
            });
        });
    }
}

impl Loaded {
    fn pump_assets(&mut self) -> bool {
        for url in self.session.take_pending_loads() {
            self.loader.request(&url);
        }

        let mut changed = false;
        for result in self.loader.poll() {
            if let Err(e) = &result.result {
                log::warn!("could not load {}: {}", result.url, e);
            }
            changed |= self.session.complete_load(&result.url, result.result);
        }
        changed
    }

    fn update(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.session.tick(now);
        self.pump_assets();

        egui::SidePanel::left("navigator")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    Sidebar::new(&mut self.session).show(ui, now);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add(ImageViewer::new(&mut self.session, &mut self.textures));
        });

        // Keep polling while something is in flight or scheduled
        if let Some(wait) = self.session.navigator().time_until_due(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
        if !self.loader.is_idle() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

impl eframe::App for ShipSpotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frames += 1;

        match std::mem::replace(&mut self.state, AppState::Empty) {
            AppState::Starting(config) if self.frames > 1 => {
                self.state = match Self::start(config) {
                    Ok(loaded) => AppState::Ready(Box::new(loaded)),
                    Err(e) => {
                        log::error!("failed to start session: {}", e);
                        AppState::Failed(e.to_string())
                    }
                };
                Self::loading_screen(ctx, "Loading scenarios\u{2026}");
                ctx.request_repaint();
            }
            AppState::Starting(config) => {
                self.state = AppState::Starting(config);
                Self::loading_screen(ctx, "Loading scenarios\u{2026}");
                ctx.request_repaint();
            }
            AppState::Ready(mut loaded) => {
                loaded.update(ctx);
                self.state = AppState::Ready(loaded);
            }
            AppState::Failed(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.colored_label(egui::Color32::RED, format!("Could not start: {}", message));
                });
                self.state = AppState::Failed(message);
            }
            AppState::Empty => {}
        }
    }
}
