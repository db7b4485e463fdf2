//! Scavenger Hunt entry point
//!
//! On the web: fetches the clue catalog, renders the clue list and wires the
//! page's buttons to the hunt controller. Natively: a small terminal harness
//! over the same core.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

    use scavenger_hunt::audio::{AudioManager, SoundEffect};
    use scavenger_hunt::catalog::cache_busted_url;
    use scavenger_hunt::consts::*;
    use scavenger_hunt::events::UNLOCK_VIBRATION;
    use scavenger_hunt::persistence::LocalStorageStore;
    use scavenger_hunt::{
        Catalog, Countdown, FeedbackStyle, Hunt, HuntEvent, HuntSettings, RevealOutcome, platform,
    };

    /// Page instance holding all state
    struct App {
        hunt: Hunt<LocalStorageStore>,
        settings: HuntSettings,
        audio: AudioManager,
        toast_timer: Option<i32>,
    }

    impl App {
        /// Play cues and show notices for queued events. Returns true if the
        /// page needs a redraw.
        fn dispatch_events(&mut self) -> bool {
            let mut dirty = false;
            for event in self.hunt.drain_events() {
                dirty |= event.needs_render();
                match &event {
                    HuntEvent::PlayFeedback => {
                        if self.settings.haptics {
                            platform::vibrate(&UNLOCK_VIBRATION);
                        }
                        self.audio.play(SoundEffect::Unlock);
                    }
                    HuntEvent::CodeRejected { .. } => self.audio.play(SoundEffect::Reject),
                    HuntEvent::AnswerRevealed { .. } => self.audio.play(SoundEffect::Reveal),
                    _ => {}
                }
                if let Some(msg) = event.message() {
                    if event.is_failure() && self.settings.failure_feedback == FeedbackStyle::Dialog
                    {
                        alert(msg);
                    } else {
                        self.show_toast(msg);
                    }
                }
            }
            dirty
        }

        fn show_toast(&mut self, msg: &str) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Some(toast) = document().and_then(|d| d.get_element_by_id("toast")) else {
                return;
            };
            toast.set_text_content(Some(msg));
            let _ = toast.class_list().add_1("show");

            if let Some(handle) = self.toast_timer.take() {
                window.clear_timeout_with_handle(handle);
            }
            let hide = Closure::once_into_js(move || {
                let _ = toast.class_list().remove_1("show");
            });
            self.toast_timer = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    hide.unchecked_ref(),
                    TOAST_MS,
                )
                .ok();
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn alert(msg: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(msg);
        }
    }

    /// Ask for a line of text; None if cancelled
    fn prompt(msg: &str, default: &str) -> Option<String> {
        web_sys::window()?
            .prompt_with_message_and_default(msg, default)
            .ok()
            .flatten()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Scavenger hunt starting...");

        let settings = HuntSettings::load();
        let url = cache_busted_url(&settings.catalog_url, js_sys::Date::now() as i64);

        // Nothing touches saved progress until the catalog is in hand
        let catalog = match platform::fetch_text(&url).await {
            Ok(text) => Catalog::from_json(&text),
            Err(e) => Err(e),
        };
        let catalog = match catalog {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Could not load clues: {e}");
                if let Some(list) = document().and_then(|d| d.get_element_by_id("list")) {
                    list.set_text_content(Some("Could not load clues. Please reload."));
                }
                return;
            }
        };

        let mut hunt = Hunt::new(catalog, LocalStorageStore::default());
        hunt.set_reveal_enabled(settings.reveal_answers);

        let app = Rc::new(RefCell::new(App {
            hunt,
            audio: AudioManager::new(&settings),
            settings,
            toast_timer: None,
        }));

        render(&app.borrow());
        setup_header_buttons(app.clone());
        setup_list_actions(app.clone());
        setup_countdown_timer(app);

        log::info!("Scavenger hunt running!");
    }

    /// Redraw header and clue cards from controller state
    fn render(app: &App) {
        let Some(document) = document() else {
            return;
        };
        render_header(&document, app);

        let Some(list) = document.get_element_by_id("list") else {
            return;
        };
        list.set_inner_html("");
        for clue in app.hunt.catalog().clues() {
            if let Some(card) = render_card(&document, app, &clue.id) {
                let _ = list.append_child(&card);
            }
        }
        update_countdowns(app);
    }

    fn render_header(document: &Document, app: &App) {
        let pct = app.hunt.percent();
        if let Some(el) = document.get_element_by_id("playerName") {
            el.set_text_content(Some(app.hunt.progress().display_name()));
        }
        if let Some(el) = document.get_element_by_id("pct") {
            el.set_text_content(Some(&format!("{pct}%")));
        }
        if let Some(bar) = document
            .get_element_by_id("bar")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = bar.style().set_property("width", &format!("{pct}%"));
        }
    }

    fn element(document: &Document, tag: &str, class: &str, text: Option<&str>) -> Option<Element> {
        let el = document.create_element(tag).ok()?;
        if !class.is_empty() {
            el.set_class_name(class);
        }
        if text.is_some() {
            el.set_text_content(text);
        }
        Some(el)
    }

    fn action_button(document: &Document, action: &str, clue_id: &str, label: &str) -> Option<Element> {
        let btn = element(document, "button", "btn", Some(label))?;
        btn.set_attribute("data-action", action).ok()?;
        btn.set_attribute("data-clue", clue_id).ok()?;
        Some(btn)
    }

    fn render_card(document: &Document, app: &App, clue_id: &str) -> Option<Element> {
        let clue = app.hunt.catalog().get(clue_id)?;
        let unlocked = app.hunt.is_unlocked(clue_id);

        let card = element(document, "div", if unlocked { "card" } else { "card locked" }, None)?;
        let badge = if unlocked { "🟢" } else { "🔒" };
        card.append_child(&element(document, "div", "title", Some(&format!("{} {badge}", clue.title)))?)
            .ok()?;
        let meta = if unlocked {
            "Unlocked"
        } else {
            "Locked • Enter passcode to unlock"
        };
        card.append_child(&element(document, "div", "meta", Some(meta))?)
            .ok()?;

        let body = element(document, "div", "", None)?;
        if unlocked {
            body.append_child(&element(document, "div", "small", Some("Clue:"))?)
                .ok()?;
            body.append_child(&element(document, "div", "code", Some(&clue.text))?)
                .ok()?;

            if let Some((answer, reveal_at)) = clue.gated_answer() {
                if app.hunt.is_revealed(clue_id) {
                    body.append_child(&element(document, "div", "code answer", Some(answer))?)
                        .ok()?;
                } else if app.settings.reveal_answers {
                    let btn = action_button(document, "reveal", clue_id, "Reveal Answer")?;
                    body.append_child(&btn).ok()?;
                    let caption = format!("Reveals at {}", local_time_caption(reveal_at.timestamp_millis()));
                    body.append_child(&element(document, "div", "reveal-caption", Some(&caption))?)
                        .ok()?;
                }
            }
        } else {
            body.append_child(&action_button(document, "unlock", clue_id, "Enter Passcode")?)
                .ok()?;
        }
        card.append_child(&body).ok()?;
        Some(card)
    }

    fn local_time_caption(millis: i64) -> String {
        let date = js_sys::Date::new(&JsValue::from_f64(millis as f64));
        date.to_locale_string("default", &JsValue::UNDEFINED).into()
    }

    /// Refresh every reveal button's label and enabled state
    fn update_countdowns(app: &App) {
        let Some(document) = document() else {
            return;
        };
        let countdowns: HashMap<String, Countdown> = app
            .hunt
            .countdowns(platform::now())
            .into_iter()
            .map(|c| (c.clue_id.clone(), c))
            .collect();

        let Ok(buttons) = document.query_selector_all("[data-action=reveal]") else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(btn) = buttons
                .item(i)
                .and_then(|node| node.dyn_into::<HtmlButtonElement>().ok())
            else {
                continue;
            };
            let Some(countdown) = btn.get_attribute("data-clue").and_then(|id| countdowns.get(&id))
            else {
                continue;
            };
            btn.set_disabled(!countdown.is_ready());
            btn.set_text_content(Some(&countdown.label));
        }
    }

    fn setup_header_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = document() else {
            return;
        };

        // Set player name
        if let Some(btn) = document.get_element_by_id("btnName") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let current = app.borrow().hunt.progress().name.clone();
                let Some(input) = prompt("Enter your player name:", &current) else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.hunt.set_name(&input);
                if a.dispatch_events() {
                    render(&a);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset progress
        if let Some(btn) = document.get_element_by_id("btnReset") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(input) = prompt("Type RESET to confirm:", "") else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.hunt.reset(&input);
                if a.dispatch_events() {
                    render(&a);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One delegated click handler for every card button
    fn setup_list_actions(app: Rc<RefCell<App>>) {
        let Some(list) = document().and_then(|d| d.get_element_by_id("list")) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some(btn) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
            else {
                return;
            };
            let (Some(action), Some(clue_id)) =
                (btn.get_attribute("data-action"), btn.get_attribute("data-clue"))
            else {
                return;
            };

            match action.as_str() {
                "unlock" => {
                    let title = match app.borrow().hunt.catalog().get(&clue_id) {
                        Some(clue) => clue.title.clone(),
                        None => return,
                    };
                    let Some(code) = prompt(&format!("Passcode for {title}:"), "") else {
                        return;
                    };
                    if code.is_empty() {
                        return;
                    }
                    let mut a = app.borrow_mut();
                    if let Err(e) = a.hunt.submit_code(&clue_id, &code) {
                        log::error!("{e}");
                        return;
                    }
                    if a.dispatch_events() {
                        render(&a);
                    }
                }
                "reveal" => {
                    let mut a = app.borrow_mut();
                    match a.hunt.reveal(&clue_id, platform::now()) {
                        Ok(RevealOutcome::Locked { .. }) => update_countdowns(&a),
                        Ok(_) => {
                            if a.dispatch_events() {
                                render(&a);
                            }
                        }
                        Err(e) => log::error!("{e}"),
                    }
                }
                other => log::warn!("Unknown action {other:?}"),
            }
        });
        let _ = list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_countdown_timer(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Ok(a) = app.try_borrow() {
                update_countdowns(&a);
            }
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            COUNTDOWN_TICK_MS,
        );
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::{Parser, Subcommand};

    use scavenger_hunt::persistence::FileStore;
    use scavenger_hunt::{
        Catalog, FeedbackStyle, Hunt, HuntSettings, RevealOutcome, UnlockResult, format_countdown,
        platform,
    };

    #[derive(Parser, Debug)]
    #[command(about = "Play a scavenger hunt from the terminal")]
    struct Cli {
        /// Clue catalog (JSON array)
        #[arg(long, default_value = "clues.json")]
        catalog: PathBuf,
        /// Where progress is saved
        #[arg(long, default_value = "hunt_progress_v1.json")]
        progress: PathBuf,
        /// How a wrong passcode is reported: toast (stdout) or dialog (stderr)
        #[arg(long, value_parser = parse_feedback)]
        feedback: Option<FeedbackStyle>,
        #[command(subcommand)]
        command: Option<Command>,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// Show progress and clues
        Status,
        /// Set the player name
        Name { name: String },
        /// Submit a passcode for a clue
        Unlock { clue_id: String, code: String },
        /// Reveal a clue's answer once its time has come
        Reveal { clue_id: String },
        /// Clear all unlocks (type RESET to confirm)
        Reset { confirm: String },
    }

    fn parse_feedback(s: &str) -> Result<FeedbackStyle, String> {
        FeedbackStyle::from_str(s).ok_or_else(|| format!("unknown feedback style {s:?}"))
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let settings = HuntSettings::load_with_feedback(cli.feedback);
        let json = fs::read_to_string(&cli.catalog)
            .with_context(|| format!("reading {}", cli.catalog.display()))?;
        let catalog = Catalog::from_json(&json)?;
        let mut hunt = Hunt::new(catalog, FileStore::new(&cli.progress));

        match cli.command.unwrap_or(Command::Status) {
            Command::Status => print_status(&hunt),
            Command::Name { name } => {
                if !hunt.set_name(&name) {
                    println!("Name unchanged (empty).");
                }
            }
            Command::Unlock { clue_id, code } => {
                if hunt.submit_code(&clue_id, &code)? == UnlockResult::Accepted {
                    let clue = hunt.catalog().get(&clue_id).map(|c| c.text.as_str());
                    println!("{}", clue.unwrap_or_default());
                }
            }
            Command::Reveal { clue_id } => match hunt.reveal(&clue_id, platform::now())? {
                RevealOutcome::Revealed(answer) => println!("{answer}"),
                RevealOutcome::Locked { remaining } => {
                    println!("Reveal in {}", format_countdown(remaining))
                }
                RevealOutcome::AlreadyRevealed => {}
                RevealOutcome::Unavailable => println!("No answer to reveal for {clue_id}."),
            },
            Command::Reset { confirm } => {
                if !hunt.reset(&confirm) {
                    println!("Type RESET to confirm.");
                }
            }
        }

        for event in hunt.drain_events() {
            if let Some(msg) = event.message() {
                if event.is_failure() && settings.failure_feedback == FeedbackStyle::Dialog {
                    eprintln!("{msg}");
                } else {
                    println!("{msg}");
                }
            }
        }
        Ok(())
    }

    fn print_status(hunt: &Hunt<FileStore>) {
        println!(
            "{}: {}% complete",
            hunt.progress().display_name(),
            hunt.percent()
        );
        let countdowns = hunt.countdowns(platform::now());
        for clue in hunt.catalog().clues() {
            if hunt.is_unlocked(&clue.id) {
                println!("  [x] {} ({}): {}", clue.title, clue.id, clue.text);
                if let Some(c) = countdowns.iter().find(|c| c.clue_id == clue.id) {
                    println!("      {}", c.label);
                }
            } else {
                println!("  [ ] {} ({})", clue.title, clue.id);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
