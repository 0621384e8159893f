//! Pixel Arcade entry point
//!
//! Browser: wires DOM input and WebGPU to a [`Session`] and runs the frame
//! loop. Native: headless runner that plays a seeded run on autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use glam::Vec2;
    use pixel_arcade::catalog;
    use pixel_arcade::persistence::LocalStorage;
    use pixel_arcade::platform::Intent;
    use pixel_arcade::renderer::{RenderState, VertexBatch, fit_viewport, render_frame};
    use pixel_arcade::sim::{GamePhase, WorldMode};
    use pixel_arcade::{HighScores, Session, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session<HighScores<LocalStorage>>,
        settings: Settings,
        render_state: Option<RenderState>,
        batch: VertexBatch,
        last_time: f64,
        canvas_size: Vec2,
        is_touch_device: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for the recently-played shelf
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let mut storage = LocalStorage::new();
            let settings = Settings::load(&storage);
            // Persist defaults so the settings page has something to edit
            settings.save(&mut storage);
            Self {
                session: Session::new(HighScores::new(storage), Tuning::default(), seed),
                settings,
                render_state: None,
                batch: VertexBatch::new(),
                last_time: 0.0,
                canvas_size: Vec2::ZERO,
                is_touch_device: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Menu,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            self.session.advance(dt);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            let phase = self.session.phase();
            if phase != self.last_phase {
                if phase == GamePhase::Playing {
                    catalog::add_recently_played(&mut LocalStorage::new(), "pixel-jumper");
                }
                self.last_phase = phase;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let viewport = {
                let tuning = &self.session.state().tuning;
                Vec2::new(tuning.viewport_width, tuning.viewport_height)
            };
            let screen = fit_viewport(self.canvas_size, viewport);
            render_frame(&mut self.batch, &self.session.snapshot(), &self.settings, screen);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.batch) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let snapshot = self.session.snapshot();

            set_text(document, "#hud-score .hud-value", &snapshot.score().to_string());
            set_text(document, "#hud-high .hud-value", &snapshot.high_score.to_string());
            set_text(document, "#hud-fps .hud-value", &self.fps.to_string());
            set_visible(document, "hud-fps", self.settings.show_fps);
            set_visible(
                document,
                "touch-controls",
                self.settings.touch_enabled(self.is_touch_device),
            );

            let phase = snapshot.phase();
            set_visible(document, "hud", phase != GamePhase::Menu);
            set_visible(document, "menu", phase == GamePhase::Menu);

            match phase {
                GamePhase::GameOver(cause) => {
                    set_visible(document, "game-over", true);
                    set_text(document, "#end-message", cause.message());
                    set_text(document, "#final-score", &snapshot.score().to_string());
                    let new_record = snapshot.last_run.is_some_and(|r| r.new_record);
                    set_visible(document, "new-record", new_record);
                }
                _ => set_visible(document, "game-over", false),
            }

            if let Some(el) = document.get_element_by_id("demo-badge") {
                let class = if self.session.input.idle_mode { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }

        fn resize(&mut self, css_w: f64, css_h: f64, dpr: f64) {
            let width = (css_w * dpr) as u32;
            let height = (css_h * dpr) as u32;
            self.canvas_size = Vec2::new(width as f32, height as f32);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }

        /// Keys outside the game intents: demo toggle and level picker
        fn handle_meta_key(&mut self, key: &str) -> bool {
            match key {
                "i" | "I" => {
                    let input = &mut self.session.input;
                    input.idle_mode = !input.idle_mode;
                    log::info!("Demo mode: {}", input.idle_mode);
                    true
                }
                "t" | "T" => {
                    self.settings.touch_controls = self.settings.touch_controls.next();
                    self.settings.save(&mut LocalStorage::new());
                    log::info!("Touch controls: {}", self.settings.touch_controls.as_str());
                    true
                }
                "0" => {
                    self.session.select_mode(WorldMode::Endless);
                    true
                }
                _ => match key.parse::<u32>().ok().and_then(|id| catalog::level(id.wrapping_sub(1))) {
                    Some(level) => {
                        self.session.select_mode(level.mode());
                        log::info!("Selected level {} ({})", level.id, level.name);
                        true
                    }
                    None => false,
                },
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pixel Arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width() as f64;
        let client_h = canvas.client_height() as f64;
        let width = (client_w * dpr) as u32;
        let height = (client_h * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut().resize(client_w, client_h, dpr);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        game.borrow_mut().is_touch_device = window.navigator().max_touch_points() > 0;

        setup_keyboard(game.clone());
        setup_touch_buttons(&document, game.clone());
        setup_focus_handlers(game.clone());
        setup_resize(canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Pixel Arcade running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                let handled = g.session.input.key_down(&key) || g.handle_meta_key(&key);
                if handled {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().session.input.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen buttons carry their intent in `data-intent`
    fn setup_touch_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let Ok(buttons) = document.query_selector_all("[data-intent]") else {
            return;
        };

        for i in 0..buttons.length() {
            let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(intent) = button
                .get_attribute("data-intent")
                .and_then(|name| Intent::from_button(&name))
            else {
                continue;
            };

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                    event.prevent_default();
                    game.borrow_mut().session.input.press(intent);
                });
                let _ = button
                    .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            for release in ["pointerup", "pointerleave", "pointercancel"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                    game.borrow_mut().session.input.release(intent);
                });
                let _ = button.add_event_listener_with_callback(release, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Drop held keys when the page loses focus so the player doesn't run off
    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.session.input.release_all();
                    log::info!("Input released (tab hidden)");
                }
                // Don't count the hidden time as one giant frame
                g.last_time = 0.0;
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let (w, h) = (canvas.client_width() as f64, canvas.client_height() as f64);
            canvas.set_width((w * dpr) as u32);
            canvas.set_height((h * dpr) as u32);
            game.borrow_mut().resize(w, h, dpr);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                pixel_arcade::consts::SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process;

    use clap::Parser;
    use serde::Serialize;

    use pixel_arcade::catalog;
    use pixel_arcade::persistence::JsonFileStore;
    use pixel_arcade::sim::{TickInput, WorldMode};
    use pixel_arcade::{HighScores, Session, Tuning};

    /// Headless Pixel Jumper runner
    #[derive(Parser, Debug)]
    #[command(name = "pixel-arcade")]
    #[command(about = "Play a seeded Pixel Jumper run on autopilot and report the result")]
    struct Args {
        /// Random seed for deterministic runs
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Maximum ticks before stopping (60 per second)
        #[arg(long, default_value_t = 3600)]
        ticks: u64,

        /// Play catalog level 1-5 instead of endless mode
        #[arg(long)]
        level: Option<u32>,

        /// Tuning sheet (JSON); missing fields take defaults
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// High-score file (JSON object)
        #[arg(long, default_value = "pixel_arcade_scores.json")]
        scores: PathBuf,

        /// Forget the stored high score for the chosen mode first
        #[arg(long)]
        reset_score: bool,
    }

    /// JSON output structure
    #[derive(Serialize)]
    struct RunReport {
        mode: String,
        seed: u64,
        ticks: u64,
        outcome: String,
        score: u64,
        high_score: u64,
        new_record: bool,
        jumps: u32,
        pickups: u32,
        scores_file: String,
        distance: f32,
        chunks: u32,
    }

    fn fail(message: String) -> ! {
        eprintln!("Error: {}", message);
        process::exit(2);
    }

    pub fn run() {
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .unwrap_or_else(|e| fail(format!("cannot read {}: {}", path.display(), e)));
                Tuning::from_json(&json).unwrap_or_else(|e| fail(format!("bad tuning: {}", e)))
            }
            None => Tuning::default(),
        };

        let mode = match args.level {
            Some(id) => catalog::LEVELS
                .iter()
                .find(|l| l.id == id)
                .map(|l| l.mode())
                .unwrap_or_else(|| fail(format!("no level {} (expected 1-{})", id, catalog::LEVELS.len()))),
            None => WorldMode::Endless,
        };

        let store = JsonFileStore::open(&args.scores)
            .unwrap_or_else(|e| fail(format!("cannot open {}: {}", args.scores.display(), e)));

        let mut scores = HighScores::new(store);
        if args.reset_score {
            scores.clear(&mode.score_key());
        }

        let mut session = Session::new(scores, tuning, args.seed);
        session.select_mode(mode);
        session.start(args.seed);

        let autopilot = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut ticks = 0;
        while ticks < args.ticks && session.scheduler().is_running() {
            session.step(&autopilot);
            ticks += 1;
        }

        let state = session.state();
        let last_run = session.last_run();
        let report = RunReport {
            mode: format!("{:?}", mode),
            seed: args.seed,
            ticks,
            outcome: last_run
                .map(|r| r.cause.message().to_string())
                .unwrap_or_else(|| "Out of ticks".to_string()),
            score: state.score,
            high_score: session.high_score(),
            new_record: last_run.is_some_and(|r| r.new_record),
            jumps: last_run.map_or(0, |r| r.jumps),
            pickups: last_run.map_or(0, |r| r.pickups),
            scores_file: session.scores().store().path().display().to_string(),
            distance: state.player.rect.left(),
            chunks: state.generator.chunks_generated(),
        };

        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(format!("cannot encode report: {}", e)),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pixel Arcade (native) starting...");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
