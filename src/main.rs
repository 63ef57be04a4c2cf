//! Chancla entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent};

    use glam::Vec2;

    use chancla::Settings;
    use chancla::audio::{AudioManager, SoundEffect};
    use chancla::consts::*;
    use chancla::renderer::SdfRenderState;
    use chancla::sim::{GameEvent, GameRng, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        rng: GameRng,
        audio: AudioManager,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        canvas_size: (f32, f32),
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_sfx_volume(settings.sfx_volume);
            Self {
                state: GameState::new(),
                rng: GameRng::new(seed),
                audio,
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                canvas_size: (0.0, 0.0),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn set_canvas_size(&mut self, w: f32, h: f32) {
            self.canvas_size = (w, h);
        }

        /// Convert canvas CSS coordinates to logical space
        /// (inverse of the shader's letterbox mapping)
        fn canvas_to_logical(&self, x: f32, y: f32) -> Vec2 {
            let (cw, ch) = self.canvas_size;
            let scale = (cw / LOGICAL_WIDTH).min(ch / LOGICAL_HEIGHT);
            let ox = (cw - LOGICAL_WIDTH * scale) / 2.0;
            let oy = (ch - LOGICAL_HEIGHT * scale) / 2.0;
            Vec2::new((x - ox) / scale, (y - oy) / scale)
        }

        /// Route a pointer press: a press on the son counts directly,
        /// anywhere else throws the sandal
        fn pointer_down(&mut self, x: f32, y: f32) {
            let p = self.canvas_to_logical(x, y);
            if self.state.point_on_target(p) {
                self.input.tap_target = true;
            } else {
                self.input.throw = true;
            }
            self.audio.resume();
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input, &mut self.rng, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input = TickInput::default();
            }

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

            self.dispatch_events();
        }

        /// Drain sim events into audio and logging
        fn dispatch_events(&mut self) {
            for event in self.state.take_events() {
                match event {
                    GameEvent::ThrowStarted => {
                        if self.state.sound_enabled {
                            self.audio.play(SoundEffect::Throw);
                        }
                    }
                    GameEvent::SandalHit { distance } => {
                        log::info!(
                            "Hit! Landed {:.1} from the son, score {}",
                            distance,
                            self.state.score
                        );
                        if self.state.sound_enabled {
                            self.audio.play(SoundEffect::Slap);
                        }
                    }
                    GameEvent::SandalMissed { distance } => {
                        log::debug!("Missed by {:.1}", distance);
                    }
                    GameEvent::TargetTapped => {
                        if self.state.sound_enabled {
                            self.audio.play(SoundEffect::Tap);
                        }
                    }
                }
            }
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
            if let Some(el) = document
                .query_selector("#hud-score .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            // Update FPS
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

            // Keep the switches in sync (keyboard shortcuts flip the flags too)
            if let Some(el) = document.get_element_by_id("sound-toggle") {
                if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
                    input.set_checked(self.state.sound_enabled);
                }
            }
            if let Some(el) = document.get_element_by_id("pause-toggle") {
                if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
                    input.set_checked(self.state.paused);
                }
            }

            // Paused banner
            if let Some(el) = document.get_element_by_id("paused-banner") {
                if self.state.paused {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Chancla starting...");

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
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut()
            .set_canvas_size(client_w as f32, client_h as f32);

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

        let mut render_state = SdfRenderState::new(surface, &adapter, width, height).await;
        render_state.set_start_time(js_sys::Date::now());
        game.borrow_mut().render_state = Some(render_state);

        // Set up input handlers
        setup_input_handlers(&canvas, game.clone());

        // Set up HUD controls (throw button, switches)
        setup_controls(game.clone());

        // Set up auto-pause on visibility change
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Chancla running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse press
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let w = canvas_clone.client_width() as f32;
                let h = canvas_clone.client_height() as f32;
                g.set_canvas_size(w, h);
                g.pointer_down(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch press
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let w = canvas_clone.client_width() as f32;
                    let h = canvas_clone.client_height() as f32;
                    g.set_canvas_size(w, h);
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    g.pointer_down(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => g.input.throw = true,
                    "m" | "M" => g.input.toggle_sound = true,
                    "p" | "P" | "Escape" => g.input.toggle_pause = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Throw button
        if let Some(btn) = document.get_element_by_id("throw-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.throw = true;
                g.audio.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Sound switch
        if let Some(el) = document.get_element_by_id("sound-toggle") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.toggle_sound = true;
            });
            let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pause switch
        if let Some(el) = document.get_element_by_id("pause-toggle") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.toggle_pause = true;
            });
            let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if !g.state.paused {
                        g.input.toggle_pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
                if !g.state.paused {
                    g.input.toggle_pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus - restore audio
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ = web_sys::window()
                .unwrap()
                .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
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
    log::info!("Chancla (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    demo_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: thirty seconds of play, one throw per second
#[cfg(not(target_arch = "wasm32"))]
fn demo_round() {
    use chancla::consts::SIM_DT;
    use chancla::sim::{GameEvent, GameRng, GameState, TickInput, tick};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Demo round with seed: {}", seed);

    let mut state = GameState::new();
    let mut rng = GameRng::new(seed);
    let mut throws = 0u32;

    for i in 0..(30 * 60) {
        let input = TickInput {
            throw: i % 60 == 0,
            ..Default::default()
        };
        if input.throw {
            throws += 1;
        }
        tick(&mut state, &input, &mut rng, SIM_DT);

        for event in state.take_events() {
            match event {
                GameEvent::SandalHit { distance } => {
                    println!("WHACK! landed {distance:.1} away - score {}", state.score);
                }
                GameEvent::SandalMissed { distance } => {
                    println!("missed by {distance:.1}");
                }
                _ => {}
            }
        }
    }

    println!("\nFinal score after {throws} throws: {}", state.score);
}
