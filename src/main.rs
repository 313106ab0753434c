//! Helix Drop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use helix_drop::Settings;
    use helix_drop::audio::{AudioManager, SoundEffect};
    use helix_drop::consts::*;
    use helix_drop::renderer::SceneRenderState;
    use helix_drop::sim::{GameEvent, GamePhase, GameState, LevelId, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<SceneRenderState>,
        audio: AudioManager,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::new(seed),
                render_state: None,
                audio,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.start = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            // Turn sim events into sound effects
            for event in self.state.drain_events() {
                self.play_event(event);
            }
        }

        fn play_event(&self, event: GameEvent) {
            let effect = match event {
                GameEvent::Started => SoundEffect::Start,
                GameEvent::LevelLoaded(_) => SoundEffect::UiClick,
                GameEvent::BounceLanded { .. } => SoundEffect::Landing,
                GameEvent::FellThrough { .. } => SoundEffect::FellThrough,
                GameEvent::KillFieldHit { .. } => SoundEffect::KillField,
                GameEvent::GameOver { score } => {
                    log::info!("Game over with score {}", score);
                    SoundEffect::GameOver
                }
            };
            self.audio.play(effect);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, time) {
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
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            // Update score
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            // Update level name
            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(self.state.level.id.as_str()));
            }

            // Update FPS (hidden unless enabled in settings)
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten()
                    {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            // Level buttons only act while idle; reflect that plus selection
            for id in [LevelId::One, LevelId::Two, LevelId::Three] {
                if let Some(el) = document.get_element_by_id(&format!("level-{}", id.number())) {
                    let selected = id == self.state.level.id;
                    let class = match (selected, self.state.phase) {
                        (true, _) => "level-btn selected",
                        (false, GamePhase::NotPlaying) => "level-btn",
                        (false, _) => "level-btn disabled",
                    };
                    let _ = el.set_attribute("class", class);
                }
            }

            // Show/hide title overlay
            if let Some(el) = document.get_element_by_id("title-overlay") {
                if self.state.phase == GamePhase::NotPlaying {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Reset to a fresh session on the currently selected level
        fn restart(&mut self, seed: u64) {
            let level = self.state.level.id;
            self.state = GameState::with_level(seed, level);
            self.accumulator = 0.0;
            self.input = TickInput::default();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Helix Drop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {:?}", e);
                show_load_failure(&document);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {:?}", e);
                show_load_failure(&document);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = SceneRenderState::new(surface, &adapter, width, height).await;
        render_state.set_start_time(js_sys::Date::now());
        game.borrow_mut().render_state = Some(render_state);

        // GPU load phase done; reveal the game
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        // Set up input handlers
        setup_keyboard(game.clone());
        setup_buttons(game.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Helix Drop running!");
    }

    /// Swap the loading indicator's text for a failure message
    fn show_load_failure(document: &web_sys::Document) {
        if let Some(loading) = document.get_element_by_id("loading") {
            loading.set_text_content(Some(
                "WebGPU unavailable - this game needs a WebGPU-capable browser",
            ));
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key holds drive rotation; code() keeps it layout-independent
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "KeyA" | "ArrowLeft" => g.input.rotate_left = true,
                    "KeyD" | "ArrowRight" => g.input.rotate_right = true,
                    "Space" | "Enter" => {
                        g.input.start = true;
                        // First gesture unlocks audio under autoplay policy
                        g.audio.resume();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "KeyA" | "ArrowLeft" => g.input.rotate_left = false,
                    "KeyD" | "ArrowRight" => g.input.rotate_right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Held keys would stick if focus left mid-hold
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input = TickInput::default();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Play button
        if let Some(btn) = document.get_element_by_id("play-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.start = true;
                g.audio.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset button
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                g.restart(seed);
                g.audio.play(SoundEffect::UiClick);
                log::info!("Session reset with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Level select buttons; the sim ignores these mid-run
        for number in 1..=3u32 {
            if let Some(btn) = document.get_element_by_id(&format!("level-{}", number)) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    if let Some(id) = LevelId::from_number(number) {
                        game.borrow_mut().state.load_level(id);
                    }
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Music toggle
        if let Some(btn) = document.get_element_by_id("music-toggle") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let g = &mut *game.borrow_mut();
                g.settings.music = !g.settings.music;
                g.settings.save();
                g.audio.resume();
                g.audio.apply_settings(&g.settings);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Sound effects toggle
        if let Some(btn) = document.get_element_by_id("sfx-toggle") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let g = &mut *game.borrow_mut();
                g.settings.sound_effects = !g.settings.sound_effects;
                g.settings.save();
                g.audio.resume();
                g.audio.apply_settings(&g.settings);
                g.audio.play(SoundEffect::UiClick);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
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
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
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
    log::info!("Helix Drop (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    println!("\nRunning a headless session...");
    headless_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_session() {
    use helix_drop::consts::SIM_DT;
    use helix_drop::sim::{GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new(7);
    let mut input = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &input, SIM_DT);
    input.start = false;

    for step in 0..6000u32 {
        // Sweep the tower back and forth until something under a probe ends the run
        let sweep_left = (step / 300) % 2 == 0;
        input.rotate_left = sweep_left;
        input.rotate_right = !sweep_left;
        tick(&mut state, &input, SIM_DT);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    assert!(state.score > 0 || state.phase == GamePhase::GameOver);
    println!(
        "✓ Headless session finished: score {}, {} ticks, phase {:?}",
        state.score, state.time_ticks, state.phase
    );
}
