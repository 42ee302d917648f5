//! Flag Rush entry point
//!
//! Handles browser initialization and wires the DOM, input, audio and UI
//! collaborators to the simulation core.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlInputElement, MouseEvent, TouchEvent};

    use flag_rush::Settings;
    use flag_rush::audio::{AudioManager, SoundEffect};
    use flag_rush::consts::*;
    use flag_rush::sim::{
        GameEvent, GamePhase, GameState, TickInput, resize_arena, tick, timer_tick,
    };
    use glam::Vec2;

    /// Ticks the avatar stays flashed after an obstacle hit
    const HIT_FLASH_TICKS: u32 = 18;
    /// Lifetime of a capture effect element
    const CAPTURE_EFFECT_TICKS: u32 = 36;

    /// Game instance holding simulation state and frontend bookkeeping
    struct Game {
        state: GameState,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        audio: AudioManager,
        settings: Settings,
        /// Interval handle for the 1 Hz countdown; cleared on game over
        /// and restart
        timer_handle: Option<i32>,
        /// Whether the rAF loop is scheduled (it stops itself on game over)
        loop_running: bool,
        /// Entity ids currently mirrored into the DOM
        rendered_flags: Vec<u32>,
        rendered_obstacles: Vec<u32>,
        /// Transient capture-effect elements with ticks left to live
        effects: Vec<(Element, u32)>,
        /// Ticks left on the avatar's collision flash
        hit_flash: u32,
    }

    impl Game {
        fn new(seed: u64, arena: Vec2) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);

            Self {
                state: GameState::new(seed, arena),
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                audio,
                settings,
                timer_handle: None,
                loop_running: false,
                rendered_flags: Vec::new(),
                rendered_obstacles: Vec::new(),
                effects: Vec::new(),
                hit_flash: 0,
            }
        }

        /// Run simulation ticks for this frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.target = None;
                self.input.halt = false;

                self.process_events();
            }

            self.hit_flash = self.hit_flash.saturating_sub(substeps);
        }

        /// Map drained simulation events to audio and visual feedback
        fn process_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::FlagCaptured { points, center } => {
                        self.audio.play(SoundEffect::Capture);
                        if let Some(el) = spawn_capture_effect(center, points) {
                            self.effects.push((el, CAPTURE_EFFECT_TICKS));
                        }
                    }
                    GameEvent::LevelComplete { next_level } => {
                        self.audio.play(SoundEffect::LevelUp);
                        set_text("next-level", &next_level.to_string());
                        show_overlay("level-complete", true);
                    }
                    GameEvent::LevelStarted { level } => {
                        show_overlay("level-complete", false);
                        log::info!("level {} started", level);
                    }
                    GameEvent::ObstacleHit { .. } => {
                        self.audio.play(SoundEffect::Collision);
                        self.hit_flash = HIT_FLASH_TICKS;
                    }
                    GameEvent::GameOver { .. } => {
                        self.audio.play(SoundEffect::GameOver);
                        self.stop_timer();
                        set_text("final-score", &self.state.final_score_text());
                        show_overlay("game-over", true);
                    }
                }
            }
        }

        fn stop_timer(&mut self) {
            if let Some(handle) = self.timer_handle.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
            }
        }

        /// Reset for a fresh run, keeping audio and settings
        fn restart(&mut self, seed: u64, arena: Vec2) {
            self.stop_timer();
            self.state = GameState::new(seed, arena);
            self.input = TickInput::default();
            self.accumulator = 0.0;
            self.last_time = 0.0;
            self.hit_flash = 0;
            for (el, _) in self.effects.drain(..) {
                el.remove();
            }
            show_overlay("game-over", false);
            show_overlay("level-complete", false);
        }

        /// Age out transient capture effects
        fn update_effects(&mut self) {
            self.effects.retain_mut(|(el, ticks)| {
                *ticks = ticks.saturating_sub(1);
                if *ticks == 0 {
                    el.remove();
                    false
                } else {
                    true
                }
            });
        }
    }

    // === DOM helpers ===

    fn document() -> web_sys::Document {
        web_sys::window()
            .expect("no window")
            .document()
            .expect("no document")
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show_overlay(id: &str, visible: bool) {
        if let Some(el) = document().get_element_by_id(id) {
            let display = if visible { "flex" } else { "none" };
            let _ = el.set_attribute("style", &format!("display: {display}"));
        }
    }

    fn position_style(pos: Vec2, size: Vec2, extra: &str) -> String {
        format!(
            "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px;{}",
            pos.x, pos.y, size.x, size.y, extra
        )
    }

    /// Floating "+50" marker at the captured flag's center
    fn spawn_capture_effect(center: Vec2, points: u32) -> Option<Element> {
        let document = document();
        let arena = document.get_element_by_id("game-area")?;
        let el = document.create_element("div").ok()?;
        el.set_attribute("class", "capture-effect").ok()?;
        el.set_attribute(
            "style",
            &format!("position: absolute; left: {}px; top: {}px;", center.x, center.y),
        )
        .ok()?;
        el.set_text_content(Some(&format!("+{points}")));
        arena.append_child(&el).ok()?;
        Some(el)
    }

    /// Mirror simulation entities into the DOM, one element per entity id.
    /// Elements for removed entities are deleted; new entities get elements.
    fn sync_entities(game: &mut Game) {
        let document = document();
        let Some(arena_el) = document.get_element_by_id("game-area") else {
            return;
        };

        // Remove stale flag elements
        game.rendered_flags.retain(|id| {
            let live = game.state.flags.iter().any(|f| f.id == *id);
            if !live {
                if let Some(el) = document.get_element_by_id(&format!("flag-{id}")) {
                    el.remove();
                }
            }
            live
        });

        for flag in &game.state.flags {
            let dom_id = format!("flag-{}", flag.id);
            let el = match document.get_element_by_id(&dom_id) {
                Some(el) => el,
                None => {
                    let Ok(el) = document.create_element("div") else {
                        continue;
                    };
                    el.set_id(&dom_id);
                    let _ = el.set_attribute("class", "flag");
                    let _ = arena_el.append_child(&el);
                    game.rendered_flags.push(flag.id);
                    el
                }
            };
            let color = FLAG_COLORS[flag.id as usize % FLAG_COLORS.len()];
            let _ = el.set_attribute(
                "style",
                &position_style(flag.pos, flag.size, &format!(" background: {color};")),
            );
        }

        // Remove stale obstacle elements
        game.rendered_obstacles.retain(|id| {
            let live = game.state.obstacles.iter().any(|o| o.id == *id);
            if !live {
                if let Some(el) = document.get_element_by_id(&format!("obstacle-{id}")) {
                    el.remove();
                }
            }
            live
        });

        for obstacle in &game.state.obstacles {
            let dom_id = format!("obstacle-{}", obstacle.id);
            let el = match document.get_element_by_id(&dom_id) {
                Some(el) => el,
                None => {
                    let Ok(el) = document.create_element("div") else {
                        continue;
                    };
                    el.set_id(&dom_id);
                    let _ = el.set_attribute("class", "obstacle");
                    let _ = arena_el.append_child(&el);
                    game.rendered_obstacles.push(obstacle.id);
                    el
                }
            };
            let _ = el.set_attribute("style", &position_style(obstacle.pos, obstacle.size, ""));
        }

        // Avatar position and collision flash
        if let Some(el) = document.get_element_by_id("player") {
            let class = if game.hit_flash > 0 { "player hit" } else { "player" };
            let _ = el.set_attribute("class", class);
            let _ = el.set_attribute(
                "style",
                &position_style(game.state.avatar_pos, Vec2::splat(AVATAR_SIZE), ""),
            );
        }
    }

    /// Update HUD text from plain state values
    fn update_hud(state: &GameState) {
        set_text("score", &state.score.to_string());
        set_text("timer", &state.time_remaining.to_string());
        set_text("current-level", &state.level.to_string());
    }

    fn arena_size() -> Vec2 {
        document()
            .get_element_by_id("game-area")
            .map(|el| Vec2::new(el.client_width() as f32, el.client_height() as f32))
            .unwrap_or(Vec2::new(800.0, 600.0))
    }

    /// Translate client coordinates into arena-local coordinates
    fn arena_local(client_x: f32, client_y: f32) -> Option<Vec2> {
        let arena = document().get_element_by_id("game-area")?;
        let rect = arena.get_bounding_client_rect();
        Some(Vec2::new(
            client_x - rect.left() as f32,
            client_y - rect.top() as f32,
        ))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flag Rush starting...");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, arena_size())));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());
        setup_resize_handler(game.clone());
        setup_blur_handlers(game.clone());
        setup_settings_controls(game.clone());

        start_timer(game.clone());
        game.borrow_mut().loop_running = true;
        request_animation_frame(game);

        log::info!("Flag Rush running!");
    }

    /// Independent 1 Hz countdown task; handle stored for explicit
    /// cancellation on game over and restart
    fn start_timer(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let cb_game = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = cb_game.borrow_mut();
            timer_tick(&mut g.state);
            g.process_events();
            update_hud(&g.state);
        });
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                1000,
            )
            .expect("failed to start timer");
        closure.forget();
        game.borrow_mut().timer_handle = Some(handle);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
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

            g.update(dt);
            g.update_effects();
            sync_entities(&mut g);
            update_hud(&g.state);

            // The frame loop self-terminates once the run has ended;
            // the restart button starts a fresh one
            if g.state.phase == GamePhase::GameOver {
                g.loop_running = false;
                return;
            }
        }

        request_animation_frame(game);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(arena) = document().get_element_by_id("game-area") else {
            log::error!("No #game-area element - input disabled");
            return;
        };

        // Mouse movement sets the chase target
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if let Some(pos) = arena_local(event.client_x() as f32, event.client_y() as f32) {
                    game.borrow_mut().input.target = Some(pos);
                }
            });
            let _ = arena
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch movement for mobile
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    if let Some(pos) =
                        arena_local(touch.client_x() as f32, touch.client_y() as f32)
                    {
                        game.borrow_mut().input.target = Some(pos);
                    }
                }
            });
            let _ = arena
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer leaving the arena stops the chase
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.halt = true;
            });
            let _ = arena
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(btn) = document().get_element_by_id("restart-button") else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let seed = js_sys::Date::now() as u64;
            game.borrow_mut().restart(seed, arena_size());
            start_timer(game.clone());

            let resume_loop = !game.borrow().loop_running;
            if resume_loop {
                game.borrow_mut().loop_running = true;
                request_animation_frame(game.clone());
            }

            log::info!("Game restarted with seed: {}", seed);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Resize reclamps entity positions synchronously to the new bounds
    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            resize_arena(&mut g.state, arena_size());
        });
        let _ =
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Volume sliders and the blur-mute checkbox. Controls are initialized
    /// from the loaded settings; every change goes straight to LocalStorage.
    fn setup_settings_controls(game: Rc<RefCell<Game>>) {
        let document = document();

        if let Some(slider) = document
            .get_element_by_id("master-volume")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            slider.set_value_as_number(game.borrow().settings.master_volume as f64 * 100.0);
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let vol = (input.value_as_number() as f32 / 100.0).clamp(0.0, 1.0);
                let mut g = game.borrow_mut();
                g.settings.master_volume = vol;
                g.audio.set_master_volume(vol);
                g.settings.save();
            });
            let _ = slider
                .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(slider) = document
            .get_element_by_id("sfx-volume")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            slider.set_value_as_number(game.borrow().settings.sfx_volume as f64 * 100.0);
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let vol = (input.value_as_number() as f32 / 100.0).clamp(0.0, 1.0);
                let mut g = game.borrow_mut();
                g.settings.sfx_volume = vol;
                g.audio.set_sfx_volume(vol);
                g.settings.save();
            });
            let _ = slider
                .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(toggle) = document
            .get_element_by_id("mute-on-blur")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            toggle.set_checked(game.borrow().settings.mute_on_blur);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let mut g = game.borrow_mut();
                g.settings.mute_on_blur = input.checked();
                g.settings.save();
            });
            let _ = toggle
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Window blur stops the chase and optionally mutes audio
    fn setup_blur_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.halt = true;
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
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
fn main() {
    env_logger::init();
    log::info!("Flag Rush (native) starting...");
    log::info!("The game targets the browser - build with `trunk serve` for the web version");

    // Smoke-run a short headless session
    use flag_rush::sim::{GameState, TickInput, tick, timer_tick};
    use glam::Vec2;

    let mut state = GameState::new(42, Vec2::new(800.0, 600.0));
    for i in 0..600 {
        tick(&mut state, &TickInput::default());
        if i % 60 == 0 {
            timer_tick(&mut state);
        }
    }
    println!(
        "Headless run: level {}, score {}, {}s remaining",
        state.level, state.score, state.time_remaining
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
