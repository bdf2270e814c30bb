//! Stick Bridge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use stick_bridge::Settings;
    use stick_bridge::audio::AudioManager;
    use stick_bridge::consts::MAX_FRAME_MS;
    use stick_bridge::sim::{Autopilot, GameEvent, GameState, TickInput, tick};

    // Painting is done by the page; it receives one JSON snapshot per frame
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(catch, js_namespace = window, js_name = stickBridgeRender)]
        fn render_frame(snapshot_json: &str) -> Result<(), JsValue>;
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        audio: AudioManager,
        settings: Settings,
        input: TickInput,
        last_time: f64,
        last_score: u32,
        autopilot: Option<Autopilot>,
        renderer_missing: bool,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                state: GameState::with_tuning(seed, settings.tuning.clone()),
                audio: AudioManager::from_settings(&settings),
                settings,
                input: TickInput::default(),
                last_time: 0.0,
                last_score: 0,
                autopilot: None,
                renderer_missing: false,
            }
        }

        /// Advance the simulation by one frame
        fn update(&mut self, dt_ms: f32) {
            let input = match self.autopilot.as_mut() {
                Some(pilot) => pilot.input(&self.state),
                None => self.input,
            };
            tick(&mut self.state, &input, dt_ms.min(MAX_FRAME_MS));

            // Clear one-shot inputs after processing
            self.input.restart = false;

            let events = self.state.drain_events();
            self.audio.handle_events(&events);
            for event in &events {
                if let GameEvent::GameOver { score } = event {
                    log::info!("Run over with score {}", score);
                }
            }
        }

        /// Hand the frame to the page
        fn render(&mut self) {
            let mut snapshot = self.state.snapshot();
            if !self.settings.effective_success_flash() {
                snapshot.success_cue = false;
            }
            let json = match snapshot.to_json() {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("Snapshot not serializable: {}", e);
                    return;
                }
            };
            if render_frame(&json).is_err() && !self.renderer_missing {
                log::warn!("window.stickBridgeRender is not available - nothing will be drawn");
                self.renderer_missing = true;
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if self.state.score() != self.last_score {
                self.last_score = self.state.score();
                if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.state.score().to_string()));
                }
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                let class = if self.state.is_game_over() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Stick Bridge starting...");

        let settings = Settings::load();
        let seed = settings.run_seed(js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());
        setup_auto_mute(game.clone());
        request_animation_frame(game);

        log::info!("Stick Bridge running!");
    }

    fn set_holding(game: &Rc<RefCell<Game>>, holding: bool) {
        let mut g = game.borrow_mut();
        g.audio.resume();
        g.input.holding = holding;
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Pointer covers mouse, pen and touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                set_holding(&game, true);
            });
            let _ = window
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for name in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                set_holding(&game, false);
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space bar as an alternative hold
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                match event.key().as_str() {
                    " " => set_holding(&game, true),
                    "i" | "I" if !event.repeat() => {
                        let mut g = game.borrow_mut();
                        g.autopilot = match g.autopilot.take() {
                            Some(_) => None,
                            None => {
                                let mut pilot = Autopilot::new(js_sys::Date::now() as u64, 20.0);
                                pilot.auto_restart = true;
                                Some(pilot)
                            }
                        };
                        log::info!("Idle mode: {}", g.autopilot.is_some());
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == " " {
                    set_holding(&game, false);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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
            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt_ms);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            // Holds are read from window; a press on the button must not reach it
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
                event.stop_propagation();
            });
            let _ = btn
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();

            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.restart = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_mute(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                // A blur mid-hold would otherwise leave the stick growing
                g.input.holding = false;
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                    log::info!("Muted (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use stick_bridge::Settings;
    use stick_bridge::audio::AudioManager;
    use stick_bridge::sim::{Autopilot, GameEvent, GameState, tick};

    /// Simulated frame length (60 Hz)
    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Stop after this much simulated time even if the autopilot never misses
    const MAX_SIM_MS: f64 = 10.0 * 60.0 * 1000.0;

    /// Play one run with the autopilot and report the score
    pub fn run() -> anyhow::Result<()> {
        let settings = Settings::load_from(&Settings::path())?;
        let clock_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let seed = settings.run_seed(clock_seed);

        let wobble = std::env::args()
            .nth(1)
            .map(|arg| arg.parse::<f32>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("aim wobble must be a number: {e}"))?
            .unwrap_or(15.0);

        log::info!("Headless run: seed {}, aim wobble {}px", seed, wobble);
        let mut state = GameState::with_tuning(seed, settings.tuning.clone());
        let mut audio = AudioManager::from_settings(&settings);
        let mut pilot = Autopilot::new(seed.wrapping_add(1), wobble);

        while !state.is_game_over() && state.clock_ms() < MAX_SIM_MS {
            let input = pilot.input(&state);
            tick(&mut state, &input, FRAME_MS);

            let events = state.drain_events();
            audio.handle_events(&events);
            for event in events {
                if let GameEvent::Scored { score } = event {
                    log::debug!("Score {}", score);
                }
            }
        }

        let snapshot = state.snapshot();
        println!(
            "Final score {} after {} rounds ({:.1}s simulated, {} platforms, {} sound cues)",
            snapshot.score,
            state.rounds(),
            state.clock_ms() / 1000.0,
            snapshot.platforms.len(),
            audio.cues_requested()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Stick Bridge (native) starting...");
    log::info!("Native mode runs headless with the autopilot - run with `trunk serve` to play");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
