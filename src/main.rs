//! Neon Glider entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{AddEventListenerOptions, Document, Element, Event, HtmlElement};

    use neon_glider::Game;
    use neon_glider::audio::{AudioManager, SoundEffect};
    use neon_glider::input::RawInput;
    use neon_glider::persistence::LocalStore;
    use neon_glider::platform::{BrowserScheduler, viewport_size};
    use neon_glider::renderer::CanvasSurface;
    use neon_glider::sim::{GamePhase, Scheduler};
    use neon_glider::ui::{HudModel, Screen};

    type WebGame = Game<BrowserScheduler, LocalStore>;

    /// Everything the browser callbacks share
    struct App {
        game: WebGame,
        surface: CanvasSurface,
        audio: Rc<RefCell<AudioManager>>,
        document: Document,
        /// A requestAnimationFrame callback is outstanding
        frame_scheduled: bool,
    }

    impl App {
        /// Mirror the HUD model into the DOM overlay
        fn update_hud(&self) {
            let hud = self.game.hud();
            let doc = &self.document;

            let (start, game_over, playing) = match hud.screen {
                Screen::Start => (true, false, false),
                Screen::Playing => (false, false, true),
                Screen::GameOver => (false, true, false),
            };
            set_visible(doc, "startScreen", start);
            set_visible(doc, "gameOverScreen", game_over);
            set_visible(doc, "hud", playing);

            if let Some(el) = doc.get_element_by_id("scoreDisplay") {
                el.set_text_content(Some(&hud.score_text()));
                set_style(&el, "transform", &format!("scale({})", hud.score_scale()));
            }
            if let Some(el) = doc.get_element_by_id("levelDisplay") {
                el.set_text_content(Some(&hud.level_label));
                set_style(&el, "color", &hud.level_color.css(1.0));
            }

            self.update_notification(hud);

            if let Some(el) = doc.get_element_by_id("screenFlash") {
                set_style(&el, "opacity", &format!("{:.3}", hud.flash));
            }

            if hud.screen == Screen::GameOver {
                if let Some(el) = doc.get_element_by_id("finalScore") {
                    el.set_text_content(Some(&hud.final_score.to_string()));
                }
                if let Some(el) = doc.get_element_by_id("bestScore") {
                    el.set_text_content(Some(&hud.best_score.to_string()));
                }
                set_visible(doc, "newBest", hud.new_best);
            }
        }

        fn update_notification(&self, hud: &HudModel) {
            let doc = &self.document;
            let Some(notif) = doc.get_element_by_id("levelNotif") else {
                return;
            };
            match &hud.notification {
                Some(n) => {
                    if let Some(title) = doc.get_element_by_id("levelTitle") {
                        title.set_text_content(Some(n.title));
                        let color = n.color.css(1.0);
                        set_style(&title, "color", &color);
                        set_style(&title, "text-shadow", &format!("0 0 25px {}", color));
                    }
                    set_style(&notif, "opacity", "1");
                    set_style(&notif, "transform", "scale(1.1)");
                }
                None => {
                    set_style(&notif, "opacity", "0");
                    set_style(&notif, "transform", "scale(1)");
                }
            }
        }
    }

    fn set_visible(doc: &Document, id: &str, visible: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn set_style(el: &Element, property: &str, value: &str) {
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property(property, value);
        }
    }

    /// True when the event was aimed at (or inside) a button
    fn targets_control(event: &Event) -> bool {
        event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("button").ok().flatten())
            .is_some()
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Neon Glider starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let viewport = viewport_size();
        let mut surface = CanvasSurface::from_element_id("gameCanvas")?;
        surface.resize(viewport);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, viewport, BrowserScheduler::new(), LocalStore::open());
        let audio = Rc::new(RefCell::new(AudioManager::new(game.settings())));
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            surface,
            audio: audio.clone(),
            document: document.clone(),
            frame_scheduled: false,
        }));

        // Sound effects follow game notifications
        {
            let audio = audio.clone();
            app.borrow_mut().game.subscribe(move |event| {
                if let Some(effect) = SoundEffect::for_event(event) {
                    audio.borrow().play(effect);
                }
            });
        }

        setup_input_handlers(&window, app.clone())?;
        setup_retry_button(&document, app.clone());
        setup_audio_toggle(&document, app.clone());
        setup_resize(&window, app.clone());

        {
            let mut a = app.borrow_mut();
            let App { game, surface, .. } = &mut *a;
            game.render_idle(surface);
            a.update_hud();
            let muted = a.audio.borrow().is_muted();
            if let Some(btn) = document.get_element_by_id("audioToggle") {
                let _ = btn.class_list().toggle_with_force("paused", muted);
            }
        }

        log::info!("Neon Glider ready");
        Ok(())
    }

    /// Turn a pending frame request into a requestAnimationFrame callback
    fn schedule(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        if !a.game.scheduler_mut().take_frame_request() || a.frame_scheduled {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        a.frame_scheduled = true;
        drop(a);

        let app = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(&app, time);
        });
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed");
        }
        closure.forget();
    }

    fn game_loop(app: &Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frame_scheduled = false;
            let App { game, surface, .. } = &mut *a;
            game.frame(time, surface);
            if game.take_new_best() {
                a.audio.borrow().play(SoundEffect::NewBest);
            }
            a.update_hud();
        }
        schedule(app);
    }

    /// Shared path for keyboard, mouse and touch
    fn on_raw_input(app: &Rc<RefCell<App>>, event: &Event, raw: RawInput) {
        {
            let mut a = app.borrow_mut();
            a.audio.borrow_mut().on_gesture();
            if a.game.handle_input(&raw).is_some_and(|n| n.prevent_default) {
                event.prevent_default();
            }
            a.update_hud();
        }
        schedule(app);
    }

    fn setup_input_handlers(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut raw = RawInput::key(&event.code());
                raw.target_is_control = targets_control(&event);
                on_raw_input(&app, &event, raw);
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let mut raw = RawInput::pointer();
                raw.target_is_control = targets_control(&event);
                on_raw_input(&app, &event, raw);
            });
            window.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch (non-passive so the default scroll/zoom can be suppressed)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                let mut raw = RawInput::touch();
                raw.target_is_control = targets_control(&event);
                on_raw_input(&app, &event, raw);
            });
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            window.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            )?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_retry_button(document: &Document, app: Rc<RefCell<App>>) {
        let Some(btn) = document.get_element_by_id("retryBtn") else {
            log::warn!("No retry button found");
            return;
        };
        for event_name in ["click", "touchstart"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                event.stop_propagation();
                {
                    let mut a = app.borrow_mut();
                    a.audio.borrow_mut().on_gesture();
                    a.game.restart();
                    a.update_hud();
                }
                schedule(&app);
            });
            let _ = btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_audio_toggle(document: &Document, app: Rc<RefCell<App>>) {
        let Some(btn) = document.get_element_by_id("audioToggle") else {
            return;
        };
        let btn_clone = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
            event.stop_propagation();
            let mut a = app.borrow_mut();
            let muted = {
                let mut audio = a.audio.borrow_mut();
                audio.on_gesture();
                audio.toggle_mute()
            };
            let _ = btn_clone.class_list().toggle_with_force("paused", muted);

            let mut settings = a.game.settings().clone();
            settings.muted = muted;
            a.audio.borrow_mut().apply_settings(&settings);
            a.game.set_settings(settings);
            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
            let viewport = viewport_size();
            let mut a = app.borrow_mut();
            let App { game, surface, .. } = &mut *a;
            surface.resize(viewport);
            game.resize(viewport);
            if game.phase() == GamePhase::Idle {
                game.render_idle(surface);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Glider (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use `trunk serve` for the web version");

    let (score, best) = autopilot_session(0x5eed, 60 * 120);
    println!("Autopilot finished with score {} (best {})", score, best);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Fly one run with a simple controller: climb whenever the craft sinks
/// below the middle of the next gap.
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_session(seed: u64, max_frames: usize) -> (u32, u32) {
    use neon_glider::input::Action;
    use neon_glider::persistence::MemoryStore;
    use neon_glider::renderer::RecordingSurface;
    use neon_glider::sim::{FixedStepScheduler, Scheduler};
    use neon_glider::{DEFAULT_VIEWPORT, Game};

    let mut game = Game::new(
        seed,
        DEFAULT_VIEWPORT,
        FixedStepScheduler::default(),
        MemoryStore::new(),
    );
    let mut surface = RecordingSurface::new();

    game.handle_action(Action::Primary);
    let mut frames = 0;
    while frames < max_frames && game.scheduler_mut().take_frame_request() {
        let state = game.state();
        let craft = &state.craft;
        let target = state
            .obstacles
            .obstacles
            .iter()
            .find(|o| o.right() > craft.pos.x)
            .map(|o| o.gap_top + o.gap_size / 2.0)
            .unwrap_or(state.viewport.height / 2.0);
        if craft.pos.y > target + 10.0 && craft.velocity > 0.0 {
            game.handle_action(Action::Primary);
        }

        let t = game.scheduler_mut().advance();
        surface.clear();
        game.frame(t, &mut surface);
        frames += 1;
    }

    log::info!(
        "Autopilot: {} frames, tier {}, phase {:?}",
        frames,
        game.tier().name,
        game.phase()
    );
    (game.score(), game.best())
}
