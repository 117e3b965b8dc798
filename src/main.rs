//! Zombie Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use zombie_arena::consts::*;
    use zombie_arena::hud::{HudSnapshot, ReviveView};
    use zombie_arena::platform::net;
    use zombie_arena::sim::{
        Action, GameEvent, GameMode, GameState, MoveKeys, TickInput, apply_action, tick,
    };
    use zombie_arena::{BestScore, QuestionPool, Settings, telemetry};

    // Hands the frame snapshot to the page's renderer, if it registered one
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (typeof window.zombieArenaPresent === 'function') {
                window.zombieArenaPresent(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        /// Lower-cased names of keys currently held
        held: HashSet<String>,
        last_time: f64,
        /// Revive panel as last drawn, to avoid rebuilding it every frame
        shown_revive: Option<ReviveView>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let mut state = GameState::new(seed);
            state.best = BestScore::load();
            Self {
                state,
                settings,
                held: HashSet::new(),
                last_time: 0.0,
                shown_revive: None,
            }
        }

        fn move_keys(&self) -> MoveKeys {
            let any = |names: [&str; 2]| names.iter().any(|k| self.held.contains(*k));
            MoveKeys {
                forward: any(["w", "arrowup"]),
                back: any(["s", "arrowdown"]),
                left: any(["a", "arrowleft"]),
                right: any(["d", "arrowright"]),
            }
        }

        fn act(&mut self, action: Action) {
            apply_action(&mut self.state, action);
        }

        /// Advance the simulation by the frame delta
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let input = TickInput::with_keys(self.move_keys());
            tick(&mut self.state, &input, dt.min(MAX_FRAME_DT));
        }

        /// React to everything the simulation reported since last frame
        fn handle_events(&mut self, document: &Document) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::ModeChanged { to, .. } => {
                        if matches!(to, GameMode::Paused | GameMode::GameOver | GameMode::Nuking) {
                            self.held.clear();
                        }
                        if to == GameMode::GameOver {
                            focus_answer(document);
                        }
                    }
                    GameEvent::HurtFlash => restart_animation(document, "hurtFlash", "flash"),
                    GameEvent::WaveStarted { .. } => {
                        restart_animation(document, "waveLine", "wave-pop")
                    }
                    GameEvent::ReviveAttempt {
                        question_id,
                        correct,
                    } => {
                        telemetry::report_revive_attempt(
                            &self.settings,
                            question_id.as_ref(),
                            correct,
                        );
                        if let Some(input) = get_input(document, "reviveAnswer") {
                            input.set_value("");
                        }
                    }
                    GameEvent::BestScoreImproved(best) => best.save(),
                }
            }
        }

        /// Update HUD elements in DOM and hand the frame to the renderer
        fn update_hud(&mut self, document: &Document, game: &Rc<RefCell<Game>>) {
            let mut hud = HudSnapshot::new(&self.state);
            if !self.settings.effective_screen_shake() {
                hud = hud.without_shake();
            }

            set_text(document, "waveValue", &hud.wave.to_string());
            set_text(document, "timerValue", &hud.time);
            set_text(document, "healthValue", &hud.health.to_string());
            set_text(document, "bestWave", &hud.best_wave);
            set_text(document, "bestTime", &hud.best_time);
            set_text(document, "powerValue", &hud.effects.adrenaline);
            set_text(document, "shieldValue", &hud.effects.shield);
            set_text(document, "stunValue", &hud.effects.stun);

            if let Some(card) = document.get_element_by_id("hudCard") {
                let classes = card.class_list();
                let _ = classes.toggle_with_force("health-danger", hud.health_danger);
                let _ = classes.toggle_with_force("power-active", hud.effects.adrenaline_active);
                let _ = classes.toggle_with_force("shield-active", hud.effects.shield_active);
                let _ = classes.toggle_with_force("stun-active", hud.effects.stun_active);
            }
            if let Some(ui) = get_html(document, "ui") {
                let _ = ui.style().set_property("--wave-color", hud.wave_color);
            }

            let mode = hud.mode;
            show(document, "menu", mode == GameMode::Menu);
            show(document, "pause", mode == GameMode::Paused);
            show(document, "restart", mode == GameMode::GameOver);
            show(document, "ui", mode != GameMode::Menu);

            if let Some(whiteout) = get_html(document, "whiteout") {
                let style = whiteout.style();
                let visible = hud.whiteout > 0.0;
                let _ = style.set_property("display", if visible { "block" } else { "none" });
                let _ = style.set_property("opacity", &hud.whiteout.to_string());
            }

            if let Some(headline) = hud.death_headline {
                set_text(document, "deathHeadline", headline);
            }
            if hud.revive != self.shown_revive {
                render_revive(document, hud.revive.as_ref(), game);
                self.shown_revive = hud.revive.clone();
            }

            match serde_json::to_string(&hud) {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Failed to encode frame: {}", e),
            }
        }
    }

    fn get_html(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn get_input(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = get_html(document, id) {
            let _ = el
                .style()
                .set_property("display", if visible { "flex" } else { "none" });
        }
    }

    fn focus_answer(document: &Document) {
        if let Some(input) = get_input(document, "reviveAnswer") {
            let _ = input.focus();
        }
    }

    /// Retrigger the CSS flash animation even mid-animation
    /// Replay a one-shot CSS animation on an element
    fn restart_animation(document: &Document, id: &str, class: &str) {
        let Some(element) = get_html(document, id) else {
            return;
        };
        let classes = element.class_list();
        let _ = classes.remove_1(class);
        // Reading layout forces the browser to notice the removal
        let _ = element.offset_width();
        let _ = classes.add_1(class);
    }

    /// Rebuild the revive panel: prompt, answer box or choice buttons, tip
    fn render_revive(document: &Document, view: Option<&ReviveView>, game: &Rc<RefCell<Game>>) {
        let Some(view) = view else {
            set_text(document, "reviveSolution", "");
            return;
        };

        set_text(document, "revivePrompt", &view.prompt);
        set_text(document, "reviveTip", view.tip);
        show(document, "reviveForm", view.free_text);
        show(document, "continueBtn", view.locked);

        if let Some(input) = get_input(document, "reviveAnswer") {
            let mode = if view.numeric { "numeric" } else { "text" };
            let _ = input.set_attribute("inputmode", mode);
            let _ = input.set_attribute("placeholder", "Type answer");
        }

        if let Some(solution) = get_html(document, "reviveSolution") {
            let text = view.solution.as_deref().unwrap_or_default();
            solution.set_text_content(Some(text));
            let _ = solution
                .style()
                .set_property("display", if text.is_empty() { "none" } else { "block" });
        }

        if let Some(container) = get_html(document, "reviveChoices") {
            container.set_inner_html("");
            for choice in &view.choices {
                if let Err(e) = add_choice_button(document, &container, choice, game) {
                    log::warn!("Failed to add choice button: {:?}", e);
                }
            }
            let _ = container.style().set_property(
                "display",
                if view.choices.is_empty() { "none" } else { "flex" },
            );
        }
    }

    fn add_choice_button(
        document: &Document,
        container: &Element,
        choice: &str,
        game: &Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let button = document.create_element("button")?;
        button.set_attribute("type", "button")?;
        button.set_attribute("class", "choice-btn")?;
        button.set_text_content(Some(choice));

        let game = game.clone();
        let answer = choice.to_string();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().act(Action::Revive(answer.clone()));
        });
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();

        container.append_child(&button)?;
        Ok(())
    }

    /// Typed answer from the revive box
    fn typed_answer(document: &Document) -> String {
        get_input(document, "reviveAnswer")
            .map(|input| input.value())
            .unwrap_or_default()
    }

    /// Enter on the game over screen: revive, or restart once locked
    fn submit_or_continue(game: &mut Game, document: &Document) {
        if game.state.mode != GameMode::GameOver {
            return;
        }
        if game.state.revive.locked {
            game.act(Action::Continue);
        } else {
            game.act(Action::Revive(typed_answer(document)));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Zombie Arena starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let questions_url = settings.questions_url.clone();

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        load_questions(game.clone(), questions_url);

        setup_keyboard(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Zombie Arena running!");
    }

    /// Fetch the question pool in the background; revives use the built-in
    /// question until (or unless) it arrives
    fn load_questions(game: Rc<RefCell<Game>>, url: String) {
        wasm_bindgen_futures::spawn_local(async move {
            let text = match net::fetch_text(&url).await {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Failed to load questions from {}: {:?}", url, e);
                    return;
                }
            };
            match QuestionPool::from_json(&text) {
                Ok(pool) => game.borrow_mut().state.set_question_pool(pool),
                Err(e) => log::warn!("Ignoring question pool: {}", e),
            }
        });
    }

    fn setup_keyboard(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key().to_lowercase();
                let mut g = game.borrow_mut();
                let mode = g.state.mode;

                // Typing into the answer box must not steer or hit shortcuts
                let typing = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                if typing && key != "enter" {
                    return;
                }

                match key.as_str() {
                    "escape" => match mode {
                        GameMode::Playing => g.act(Action::Pause),
                        GameMode::Paused => g.act(Action::Resume),
                        _ => {}
                    },
                    "r" if matches!(mode, GameMode::GameOver | GameMode::Paused) => {
                        g.act(Action::Restart);
                    }
                    "m" if mode == GameMode::Paused => g.act(Action::Menu),
                    "enter" => {
                        event.prevent_default();
                        submit_or_continue(&mut g, &document);
                    }
                    _ => {}
                }

                if mode == GameMode::Playing && g.state.mode == GameMode::Playing {
                    g.held.insert(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().held.remove(&event.key().to_lowercase());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, game: &Rc<RefCell<Game>>, action: Action) {
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().act(action.clone());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "startBtn", &game, Action::Start);
        on_click(document, "resumeBtn", &game, Action::Resume);
        on_click(document, "restartBtn", &game, Action::Restart);
        on_click(document, "menuBtn", &game, Action::Menu);
        on_click(document, "restartFromDeathBtn", &game, Action::Restart);
        on_click(document, "continueBtn", &game, Action::Continue);
        on_click(document, "continueRestartBtn", &game, Action::Restart);

        if let Some(btn) = document.get_element_by_id("reviveBtn") {
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let answer = typed_answer(&document);
                g.act(Action::Revive(answer));
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside, tab switch)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            g.held.clear();
            if g.settings.pause_on_blur && g.state.mode == GameMode::Playing {
                g.act(Action::FocusLost);
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let mut g = game.borrow_mut();
            g.update(time);
            g.handle_events(&document);
            g.update_hud(&document, &game);
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
    log::info!("Zombie Arena (native) starting...");
    log::info!("Native mode runs a headless demo - serve the web build to play");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Circle the arena for a while, then answer the revive question
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use zombie_arena::hud::HudSnapshot;
    use zombie_arena::sim::{
        Action, GameEvent, GameMode, GameState, MoveKeys, TickInput, apply_action, tick,
    };
    use zombie_arena::{Settings, telemetry};

    const DT: f32 = 1.0 / 60.0;
    const MAX_SECONDS: f32 = 120.0;

    let settings = Settings::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1);
    let mut state = GameState::new(seed);
    apply_action(&mut state, Action::Start);

    let mut t = 0.0;
    let mut revived = false;
    while t < MAX_SECONDS {
        // Strafe in a slow circle, switching direction every few seconds
        let phase = (t / 3.0) as u32 % 4;
        let keys = MoveKeys {
            forward: phase == 0 || phase == 1,
            right: phase == 1 || phase == 2,
            back: phase == 2 || phase == 3,
            left: phase == 3 || phase == 0,
        };
        tick(&mut state, &TickInput::with_keys(keys), DT);
        t += DT;

        for event in state.drain_events() {
            match event {
                GameEvent::ReviveAttempt {
                    question_id,
                    correct,
                } => telemetry::report_revive_attempt(&settings, question_id.as_ref(), correct),
                GameEvent::BestScoreImproved(best) => best.save(),
                _ => {}
            }
        }

        if state.mode == GameMode::GameOver {
            let hud = HudSnapshot::new(&state);
            println!(
                "{} Wave {}, {}",
                hud.death_headline.unwrap_or_default(),
                hud.wave,
                hud.time
            );
            if revived {
                break;
            }
            apply_action(&mut state, Action::Revive("1".to_string()));
            revived = true;
        }
    }

    let hud = HudSnapshot::new(&state);
    println!(
        "Finished in {} mode: wave {}, time {}, health {}, best wave {} ({})",
        hud.mode.as_str(),
        hud.wave,
        hud.time,
        hud.health,
        hud.best_wave,
        hud.best_time
    );
}
