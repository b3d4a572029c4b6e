//! Hoop Shot entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use hoop_shot::platform::FrameClock;
    use hoop_shot::platform::web::{self, CanvasSize};
    use hoop_shot::renderer::SdfRenderState;
    use hoop_shot::sim::{GameEvent, GamePhase, GameState, PlayArea, PointerEvent, TickInput, tick};
    use hoop_shot::{GameConfig, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        clock: FrameClock,
        input: TickInput,
        canvas: HtmlCanvasElement,
        // HUD values last written to the DOM
        shown_score: Option<u32>,
        shown_secs: Option<u32>,
        shown_phase: Option<GamePhase>,
    }

    impl Game {
        fn new(state: GameState, settings: Settings, canvas: HtmlCanvasElement) -> Self {
            Self {
                state,
                settings,
                render_state: None,
                clock: FrameClock::new(),
                input: TickInput::default(),
                canvas,
                shown_score: None,
                shown_secs: None,
                shown_phase: None,
            }
        }

        /// Run simulation ticks for this frame
        fn update(&mut self, time: f64) {
            let ticks = self.clock.advance(time);
            for _ in 0..ticks {
                // One-shot inputs are consumed by the first tick
                let input = std::mem::take(&mut self.input);
                tick(&mut self.state, &input);
            }

            for event in self.state.drain_events() {
                match event {
                    GameEvent::RoundStarted { round_secs } => {
                        log::info!("Round started ({round_secs}s)");
                    }
                    GameEvent::Scored { hoop, total, .. } => {
                        log::info!("Basket in hoop {hoop}, score {total}");
                    }
                    GameEvent::RoundOver { final_score } => {
                        log::info!("Round over, final score {final_score}");
                    }
                    other => log::debug!("{other:?}"),
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.settings, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let scale = web_sys::window()
                            .map(|w| w.device_pixel_ratio() as f32)
                            .unwrap_or(1.0);
                        render_state.resize(render_state.size.0, render_state.size.1, scale);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM (only when values change)
        fn update_hud(&mut self) {
            if self.shown_score != Some(self.state.score) {
                web::set_text("score", &self.state.score.to_string());
                self.shown_score = Some(self.state.score);
            }

            let secs = self.state.seconds_remaining();
            if self.shown_secs != Some(secs) {
                web::set_text("timer", &secs.to_string());
                self.shown_secs = Some(secs);
            }

            if self.shown_phase != Some(self.state.phase) {
                let phase = self.state.phase;
                web::set_hidden("start-screen", phase != GamePhase::Start);
                web::set_hidden("game-over-screen", phase != GamePhase::GameOver);
                if phase == GamePhase::GameOver {
                    web::set_text("final-score", &self.state.score.to_string());
                }
                self.shown_phase = Some(phase);
            }
        }

        /// Container changed size
        fn resize(&mut self) {
            let size = web::fit_canvas(&self.canvas);
            self.apply_size(size);
        }

        fn apply_size(&mut self, size: CanvasSize) {
            self.state.resize(size.css_width, size.css_height);
            if let Some(ref mut render_state) = self.render_state {
                let (w, h) = size.physical();
                render_state.resize(w, h, size.dpr as f32);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Hoop Shot starting...");

        let Some(document) = web::document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let size = web::fit_canvas(&canvas);
        let (width, height) = size.physical();

        let config = web::embedded_config()
            .map(|json| GameConfig::from_json_or_default(&json))
            .unwrap_or_default();
        let settings = Settings::load();

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(config, PlayArea::new(size.css_width, size.css_height), seed);
        let game = Rc::new(RefCell::new(Game::new(state, settings, canvas.clone())));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match SdfRenderState::new(surface, &adapter, width, height, size.dpr as f32).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to initialize renderer: {e}");
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Hoop Shot running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(document) = web::document() else {
            return;
        };

        // Mouse down on the canvas grabs the ball
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = web::mouse_point(&event, &canvas_clone);
                game.borrow_mut().input.push_pointer(PointerEvent::Down(point));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Move and release are tracked on the document so drags can leave the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = web::mouse_point(&event, &canvas_clone);
                game.borrow_mut().input.push_pointer(PointerEvent::Move(point));
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = web::mouse_point(&event, &canvas_clone);
                game.borrow_mut()
                    .input
                    .push_pointer(PointerEvent::Up(Some(point)));
            });
            let _ = document
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(point) = web::touch_point(&event, &canvas_clone) {
                    game.borrow_mut().input.push_pointer(PointerEvent::Down(point));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(point) = web::touch_point(&event, &canvas_clone) {
                    game.borrow_mut().input.push_pointer(PointerEvent::Move(point));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end releases at the last move
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.push_pointer(PointerEvent::Up(None));
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web::document() else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.start = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.restart = true;
                g.clock.reset();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
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
            g.update(time);
            g.render(time);
            g.update_hud();
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
fn main() {
    env_logger::init();
    log::info!("Hoop Shot (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => hoop_shot::GameConfig::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {path}: {e}; using defaults");
                hoop_shot::GameConfig::default()
            }
        },
        None => hoop_shot::GameConfig::default(),
    };

    headless_round(config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one round without a window: keep taking the same straight-up shot
/// and report the final score.
#[cfg(not(target_arch = "wasm32"))]
fn headless_round(config: hoop_shot::GameConfig) {
    use glam::DVec2;
    use hoop_shot::sim::{GameEvent, GamePhase, GameState, PlayArea, PointerEvent, TickInput, tick};

    let mut state = GameState::new(config, PlayArea::new(400.0, 1200.0), 0x5EED);
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );

    let (mut baskets, mut misses) = (0u32, 0u32);
    while state.phase == GamePhase::Playing {
        let mut input = TickInput::default();
        if !state.ball.is_moving {
            let ball = state.ball.pos;
            input.push_pointer(PointerEvent::Down(ball));
            input.push_pointer(PointerEvent::Up(Some(ball + DVec2::new(0.0, 110.0))));
        }
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::Scored { .. } => baskets += 1,
                GameEvent::Missed => misses += 1,
                _ => {}
            }
        }
    }

    log::info!(
        "Round over after {} ticks: {} baskets, {} misses",
        state.time_ticks,
        baskets,
        misses
    );
    println!("Final score: {}", state.score);
}
