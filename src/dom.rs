//! Browser presentation surface.
//!
//! Binds the page's existing elements (start / game / result screens, the
//! answer input, the play area), renders [`SurfaceCommand`]s into them,
//! forwards clicks and the Enter key to the [`Game`], and drives the game's
//! scheduler from `requestAnimationFrame`.
//!
//! Preferences are read from and written to `window.localStorage`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Storage, window};

use crate::config::GameConfig;
use crate::game::{Game, Screen, SurfaceCommand};
use crate::physics::LetterId;
use crate::settings::{PreferenceStore, Preferences};
use crate::words::WordBank;

const SUCCESS_TEXT: &str = "정답!";
const FAILURE_TITLE: &str = "틀렸습니다";
const FAILURE_MESSAGE: &str = "다시 시도해보세요!";

const BANNER_KEYFRAMES_ID: &str = "success-animation-style";
const BANNER_KEYFRAMES: &str = "@keyframes fadeOut { \
    0% { opacity: 1; transform: translate(-50%, -50%) scale(1); } \
    100% { opacity: 0; transform: translate(-50%, -50%) scale(0.8); } }";
const BANNER_STYLE: &str = "position:fixed; top:50%; left:50%; transform:translate(-50%,-50%); \
    background-color:#52C41A; color:white; padding:1rem 2rem; border-radius:8px; \
    font-size:2rem; font-weight:700; z-index:1000; animation: fadeOut 0.5s ease-out forwards;";

/// `window.localStorage`. Reads and writes are best-effort: private browsing
/// modes may refuse storage, in which case defaults apply.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                console_warn!("could not persist {}", key);
            }
        }
    }
}

fn by_id(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))
}

fn html_by_id(doc: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    Ok(by_id(doc, id)?.dyn_into()?)
}

/// Handles to every element the game writes to.
struct DomSurface {
    doc: Document,
    start_screen: Element,
    game_screen: Element,
    result_screen: Element,
    input: HtmlInputElement,
    input_section: HtmlElement,
    submit_btn: HtmlElement,
    game_area: HtmlElement,
    timer: Element,
    game_score: Element,
    // Start-screen labels are optional on the page.
    current_score: Option<Element>,
    current_difficulty: Option<Element>,
    current_speed: Option<Element>,
    result_title: Element,
    result_message: Element,
    correct_answer: Element,
    user_answer: Element,
    glyphs: HashMap<LetterId, HtmlElement>,
    banner: Option<Element>,
}

impl DomSurface {
    fn bind(doc: Document) -> Result<Self, JsValue> {
        Ok(Self {
            start_screen: by_id(&doc, "start-screen")?,
            game_screen: by_id(&doc, "game-screen")?,
            result_screen: by_id(&doc, "result-screen")?,
            input: by_id(&doc, "word-input")?.dyn_into()?,
            input_section: html_by_id(&doc, "input-section")?,
            submit_btn: html_by_id(&doc, "submit-btn")?,
            game_area: html_by_id(&doc, "game-area")?,
            timer: by_id(&doc, "timer")?,
            game_score: by_id(&doc, "game-score")?,
            current_score: doc.get_element_by_id("current-score"),
            current_difficulty: doc.get_element_by_id("current-difficulty"),
            current_speed: doc.get_element_by_id("current-speed"),
            result_title: by_id(&doc, "result-title")?,
            result_message: by_id(&doc, "result-message")?,
            correct_answer: by_id(&doc, "correct-answer")?,
            user_answer: by_id(&doc, "user-answer")?,
            glyphs: HashMap::new(),
            banner: None,
            doc,
        })
    }

    fn play_area_size(&self) -> (f64, f64) {
        (
            self.game_area.offset_width() as f64,
            self.game_area.offset_height() as f64,
        )
    }

    /// Add the banner's `fadeOut` keyframes to the page once.
    fn install_banner_keyframes(&self) -> Result<(), JsValue> {
        if self.doc.get_element_by_id(BANNER_KEYFRAMES_ID).is_some() {
            return Ok(());
        }
        let style = self.doc.create_element("style")?;
        style.set_id(BANNER_KEYFRAMES_ID);
        style.set_text_content(Some(BANNER_KEYFRAMES));
        match self.doc.query_selector("head")? {
            Some(head) => head.append_child(&style)?,
            None => self.game_area.append_child(&style)?,
        };
        Ok(())
    }

    fn apply(&mut self, cmd: SurfaceCommand) -> Result<(), JsValue> {
        match cmd {
            SurfaceCommand::ShowScreen(screen) => {
                let screens = [
                    (Screen::Start, &self.start_screen),
                    (Screen::Game, &self.game_screen),
                    (Screen::Result, &self.result_screen),
                ];
                for (which, el) in screens {
                    if which == screen {
                        el.class_list().add_1("active")?;
                    } else {
                        el.class_list().remove_1("active")?;
                    }
                }
            }
            SurfaceCommand::SetInputVisible(visible) => {
                let (input, button, section) = if visible {
                    ("block", "inline-block", "flex")
                } else {
                    ("none", "none", "none")
                };
                self.input.style().set_property("display", input)?;
                self.submit_btn.style().set_property("display", button)?;
                self.input_section.style().set_property("display", section)?;
            }
            SurfaceCommand::ClearInput => self.input.set_value(""),
            SurfaceCommand::FocusInput => self.input.focus()?,
            SurfaceCommand::ClearPlayArea => {
                self.game_area.set_inner_html("");
                self.glyphs.clear();
            }
            SurfaceCommand::SpawnGlyph { id, glyph, x, y } => {
                let el: HtmlElement = self.doc.create_element("div")?.dyn_into()?;
                el.set_class_name("falling-letter");
                el.set_text_content(Some(&glyph.to_string()));
                let style = el.style();
                style.set_property("left", &format!("{}px", x))?;
                style.set_property("top", &format!("{}px", y))?;
                style.set_property("transform", "translate(-50%, -50%)")?;
                self.game_area.append_child(&el)?;
                self.glyphs.insert(id, el);
            }
            SurfaceCommand::MoveGlyph { id, x, y } => {
                if let Some(el) = self.glyphs.get(&id) {
                    let style = el.style();
                    style.set_property("left", &format!("{}px", x))?;
                    style.set_property("top", &format!("{}px", y))?;
                }
            }
            SurfaceCommand::RemoveGlyph { id } => {
                if let Some(el) = self.glyphs.remove(&id) {
                    el.remove();
                }
            }
            SurfaceCommand::SetScore(score) => {
                let text = score.to_string();
                self.game_score.set_text_content(Some(&text));
                if let Some(el) = &self.current_score {
                    el.set_text_content(Some(&text));
                }
            }
            SurfaceCommand::SetTimer(text) => self.timer.set_text_content(Some(&text)),
            SurfaceCommand::ShowSuccessBanner => {
                if self.banner.is_none() {
                    self.install_banner_keyframes()?;
                    let el = self.doc.create_element("div")?;
                    el.set_text_content(Some(SUCCESS_TEXT));
                    el.set_attribute("style", BANNER_STYLE)?;
                    if let Some(body) = self.doc.body() {
                        body.append_child(&el)?;
                    }
                    self.banner = Some(el);
                }
            }
            SurfaceCommand::HideSuccessBanner => {
                if let Some(el) = self.banner.take() {
                    el.remove();
                }
            }
            SurfaceCommand::ShowFailure { correct, given } => {
                self.result_title.set_text_content(Some(FAILURE_TITLE));
                self.result_title.set_class_name("failure");
                self.result_message.set_text_content(Some(FAILURE_MESSAGE));
                self.correct_answer.set_text_content(Some(&correct));
                self.user_answer.set_text_content(Some(&given));
            }
            SurfaceCommand::UpdateStartScreen {
                difficulty,
                speed,
                score,
            } => {
                if let Some(el) = &self.current_difficulty {
                    el.set_text_content(Some(difficulty.key()));
                }
                if let Some(el) = &self.current_speed {
                    el.set_text_content(Some(speed.key()));
                }
                if let Some(el) = &self.current_score {
                    el.set_text_content(Some(&score.to_string()));
                }
            }
        }
        Ok(())
    }
}

struct App {
    game: Game,
    surface: DomSurface,
}

impl App {
    /// Bring the game up to the current time and render what it queued.
    fn sync(&mut self) -> Result<(), JsValue> {
        let (w, h) = self.surface.play_area_size();
        if w > 0.0 && h > 0.0 {
            self.game.resize(w, h);
        }
        self.game.stage_input(&self.surface.input.value());
        self.game.advance_to(now_ms());
        self.flush()
    }

    fn flush(&mut self) -> Result<(), JsValue> {
        for cmd in self.game.drain_commands() {
            self.surface.apply(cmd)?;
        }
        Ok(())
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn now_ms() -> u64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0) as u64
}

fn with_app<T>(f: impl FnOnce(&mut App) -> Result<T, JsValue>) -> Result<T, JsValue> {
    APP.with(|cell| match cell.borrow_mut().as_mut() {
        Some(app) => f(app),
        None => Err(JsValue::from_str("game not mounted")),
    })
}

/// Bind the page, register listeners and start the frame loop.
pub fn mount(config: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let surface = DomSurface::bind(doc.clone())?;
    let mut game = Game::new(
        config,
        Box::new(LocalStorage::open()),
        Box::new(WordBank::from_entropy()),
    );
    game.advance_to(now_ms());
    let mut app = App { game, surface };
    app.flush()?;
    APP.with(|cell| *cell.borrow_mut() = Some(app));

    on_click(&doc, "start-btn", start)?;
    on_click(&doc, "restart-btn", restart)?;
    on_click(&doc, "submit-btn", submit)?;

    // Enter in the answer box submits.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key() == "Enter" {
                report(submit());
            }
        }) as Box<dyn FnMut(_)>);
        by_id(&doc, "word-input")?
            .add_event_listener_with_callback("keypress", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    console_log!("falling words mounted");
    Ok(())
}

fn on_click(doc: &Document, id: &str, action: fn() -> Result<(), JsValue>) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        report(action());
    }) as Box<dyn FnMut(_)>);
    by_id(doc, id)?.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn report(result: Result<(), JsValue>) {
    if let Err(err) = result {
        web_sys::console::error_1(&err);
    }
}

/// Start button.
pub fn start() -> Result<(), JsValue> {
    with_app(|app| {
        app.sync()?;
        // Already running is not an error for a double click.
        let _ = app.game.start();
        app.flush()
    })
}

/// Restart button: back to the start screen.
pub fn restart() -> Result<(), JsValue> {
    with_app(|app| {
        app.sync()?;
        app.game.reset();
        app.flush()
    })
}

/// Submit button / Enter key.
pub fn submit() -> Result<(), JsValue> {
    with_app(|app| {
        app.sync()?;
        let _ = app.game.submit_staged();
        app.flush()
    })
}

pub fn set_preferences(prefs: Preferences) -> Result<(), JsValue> {
    with_app(|app| {
        app.game.set_preferences(prefs);
        app.flush()
    })
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        report(with_app(App::sync));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_fades_out() {
        assert!(BANNER_STYLE.contains("animation: fadeOut 0.5s ease-out forwards"));
        assert!(BANNER_KEYFRAMES.starts_with("@keyframes fadeOut"));
        assert!(BANNER_KEYFRAMES.contains("opacity: 0"));
    }

    #[cfg(target_arch = "wasm32")]
    mod browser {
        use wasm_bindgen_test::*;

        use super::super::*;

        wasm_bindgen_test_configure!(run_in_browser);

        const MARKUP: &str = r#"
            <div id="start-screen"></div><div id="game-screen"></div><div id="result-screen"></div>
            <input id="word-input"><div id="input-section"></div><button id="submit-btn"></button>
            <div id="game-area"></div><span id="timer"></span><span id="game-score"></span>
            <h2 id="result-title"></h2><p id="result-message"></p>
            <span id="correct-answer"></span><span id="user-answer"></span>"#;

        #[wasm_bindgen_test]
        fn success_banner_installs_fade_keyframes_once() {
            let doc = window().unwrap().document().unwrap();
            doc.body().unwrap().set_inner_html(MARKUP);
            let mut surface = DomSurface::bind(doc.clone()).unwrap();

            surface.apply(SurfaceCommand::ShowSuccessBanner).unwrap();
            surface.apply(SurfaceCommand::HideSuccessBanner).unwrap();
            surface.apply(SurfaceCommand::ShowSuccessBanner).unwrap();

            let styles = doc
                .query_selector_all(&format!("#{}", BANNER_KEYFRAMES_ID))
                .unwrap();
            assert_eq!(styles.length(), 1);
            let banner = surface.banner.as_ref().unwrap();
            let inline = banner.get_attribute("style").unwrap();
            assert!(inline.contains("fadeOut 0.5s"));
        }
    }
}
