//! Browser wiring for the page effects.
//!
//! Every installer looks its elements up in the rendered document and
//! silently skips itself when they are missing. The returned
//! [`InstalledEffects`] owns all listeners, watchers and frame loops; dropping
//! it tears the effects down.

use crate::logging::{log_event, LogLevel};
use crate::motion::{skill_bar_width, CounterAnimation, CounterSpec, Typewriter};
use crate::palette::Palette;
use crate::pointer::{
    parallax_position, scroll_progress_width, Bounds, CursorState, Detach, RippleGeometry,
    RippleSlot, TiltAngles, RIPPLE_LIFETIME_MS,
};
use crate::spy::{
    active_links, reveal, spy_target, VisibilityEntry, ACTIVE_CLASS, HIDDEN_CLASS,
    REVEAL_THRESHOLD, SHOW_CLASS, SPY_THRESHOLD, STATS_SECTION_ID, STATS_THRESHOLD,
};
use crate::theme::{PreferenceStore, Theme, DARK_CLASS};
use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use js_sys::{Array, Function, Reflect};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Element, Event, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, NodeList, Storage,
};

fn document() -> Option<Document> {
    window()?.document()
}

fn node_list_elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(node_list_elements)
        .unwrap_or_default()
}

fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        let _ = element.style().set_property(property, value);
    }
}

fn clear_style(element: &Element, property: &str) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        let _ = element.style().remove_property(property);
    }
}

fn bounds_of(element: &Element) -> Bounds {
    let rect = element.get_bounding_client_rect();
    Bounds {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

impl Detach for Element {
    fn detach(&self) {
        self.remove();
    }
}

fn describe(error: &JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

/// `localStorage`-backed preferences. Unavailable storage reads as empty.
pub struct LocalStorageStore;

impl PreferenceStore for LocalStorageStore {
    fn read(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) {
        let stored = local_storage().map(|storage| storage.set_item(key, value));
        if !matches!(stored, Some(Ok(()))) {
            log_event(
                LogLevel::Debug,
                "preference_not_persisted",
                json!({ "key": key }),
            );
        }
    }
}

pub fn apply_theme(theme: Theme) {
    if let Some(body) = document().and_then(|document| document.body()) {
        let _ = body.class_list().toggle_with_force(DARK_CLASS, theme.is_dark());
    }
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// Runs the class change inside `document.startViewTransition` when the
/// browser has it and motion is allowed.
pub fn apply_theme_with_transition(theme: Theme) {
    if prefers_reduced_motion() {
        apply_theme(theme);
        return;
    }

    let Some(document) = document() else {
        return;
    };

    let document_js: JsValue = document.into();
    let start_view_transition =
        Reflect::get(&document_js, &JsValue::from_str("startViewTransition")).ok();

    let Some(start_view_transition) = start_view_transition
        .as_ref()
        .and_then(|value| value.dyn_ref::<Function>())
    else {
        apply_theme(theme);
        return;
    };

    let callback = Closure::once_into_js(move || apply_theme(theme));
    if start_view_transition.call1(&document_js, &callback).is_err() {
        apply_theme(theme);
    }
}

pub fn apply_palette(palette: &Palette) {
    let Some(document) = document() else {
        return;
    };

    let root = document.document_element();
    let body = document.body().map(Element::from);
    for target in root.iter().chain(body.iter()) {
        for (property, value) in palette.custom_properties() {
            set_style(target, property, value);
        }
    }

    if let Ok(Some(hero)) = document.query_selector(".hero") {
        set_style(&hero, "background-image", &palette.hero_background());
    }

    log_event(
        LogLevel::Info,
        "palette_applied",
        json!({ "palette": palette.name }),
    );
}

pub fn animate_skill_bars(document: &Document) {
    for bar in select_all(document, ".progress-value") {
        if let Some(width) = skill_bar_width(bar.get_attribute("data-percent").as_deref()) {
            set_style(&bar, "width", &width);
        }
    }
}

/// Threshold-crossing notifications for a set of elements. Disconnects on
/// drop.
pub struct VisibilityWatcher {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl VisibilityWatcher {
    pub fn new<F>(threshold: f64, mut on_change: F) -> Result<Self, JsValue>
    where
        F: FnMut(&[IntersectionObserverEntry], &IntersectionObserver) + 'static,
    {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                let entries: Vec<IntersectionObserverEntry> = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into().ok())
                    .collect();
                on_change(&entries, &observer);
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, target: &Element) {
        self.observer.observe(target);
    }
}

impl Drop for VisibilityWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// One counter's frame loop. Keeps itself alive through its pending frame
/// until the animation finishes or is cancelled.
struct CounterRun {
    element: Element,
    animation: CounterAnimation,
    started_at: Cell<Option<f64>>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl CounterRun {
    fn start(element: Element) -> Rc<Self> {
        let spec = CounterSpec::from_attributes(
            element.get_attribute("data-target").as_deref(),
            element.get_attribute("data-multiplier").as_deref(),
            element.get_attribute("data-suffix").as_deref(),
        );
        let run = Rc::new(Self {
            element,
            animation: CounterAnimation::new(spec),
            started_at: Cell::new(None),
            frame: RefCell::new(None),
        });
        run.schedule();
        run
    }

    fn schedule(self: &Rc<Self>) {
        let run = Rc::clone(self);
        let handle = request_animation_frame(move |timestamp| run.on_frame(timestamp));
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>, timestamp: f64) {
        self.frame.borrow_mut().take();

        let started_at = match self.started_at.get() {
            Some(started_at) => started_at,
            None => {
                self.started_at.set(Some(timestamp));
                timestamp
            }
        };

        let frame = self.animation.frame(timestamp - started_at);
        self.element.set_text_content(Some(&frame.text));

        if !frame.finished {
            self.schedule();
        }
    }

    fn cancel(&self) {
        self.frame.borrow_mut().take();
    }
}

struct TypewriterRun {
    typewriter: RefCell<Typewriter>,
    on_text: Box<dyn Fn(String)>,
    timer: RefCell<Option<Timeout>>,
    cancelled: Cell<bool>,
}

impl TypewriterRun {
    fn tick(self: &Rc<Self>) {
        if self.cancelled.get() {
            return;
        }

        self.timer.borrow_mut().take();
        let step = self.typewriter.borrow_mut().tick();
        (self.on_text)(step.text);

        let run = Rc::clone(self);
        let timer = Timeout::new(step.delay_ms, move || run.tick());
        *self.timer.borrow_mut() = Some(timer);
    }
}

/// Cancel handle for a running typewriter. Dropping it stops the chain.
pub struct TypewriterHandle {
    run: Rc<TypewriterRun>,
}

impl TypewriterHandle {
    pub fn cancel(&self) {
        self.run.cancelled.set(true);
        self.run.timer.borrow_mut().take();
    }
}

impl Drop for TypewriterHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Types the first character immediately, then reschedules itself for the
/// lifetime of the returned handle.
pub fn start_typewriter<F>(words: &[String], on_text: F) -> Option<TypewriterHandle>
where
    F: Fn(String) + 'static,
{
    let typewriter = Typewriter::new(words)?;
    let run = Rc::new(TypewriterRun {
        typewriter: RefCell::new(typewriter),
        on_text: Box::new(on_text),
        timer: RefCell::new(None),
        cancelled: Cell::new(false),
    });
    run.tick();
    Some(TypewriterHandle { run })
}

#[derive(Default)]
pub struct InstalledEffects {
    listeners: Vec<EventListener>,
    watchers: Vec<VisibilityWatcher>,
    counters: Rc<RefCell<Vec<Rc<CounterRun>>>>,
    follower: Option<Element>,
}

impl Drop for InstalledEffects {
    fn drop(&mut self) {
        for run in self.counters.borrow().iter() {
            run.cancel();
        }
        if let Some(follower) = self.follower.take() {
            follower.remove();
        }
    }
}

impl InstalledEffects {
    fn report(step: &str, result: Result<(), JsValue>) {
        if let Err(error) = result {
            log_event(
                LogLevel::Warn,
                "effect_install_failed",
                json!({ "effect": step, "error": describe(&error) }),
            );
        }
    }

    fn install_reveal(&mut self, document: &Document) -> Result<(), JsValue> {
        let targets = select_all(document, &format!(".{HIDDEN_CLASS}"));
        if targets.is_empty() {
            return Ok(());
        }

        let skills_document = document.clone();
        let watcher = VisibilityWatcher::new(REVEAL_THRESHOLD, move |entries, _| {
            for entry in entries {
                let target = entry.target();
                let id = target.id();
                let Some(outcome) = reveal(VisibilityEntry {
                    id: &id,
                    intersecting: entry.is_intersecting(),
                }) else {
                    continue;
                };

                let classes = target.class_list();
                let _ = classes.add_1(SHOW_CLASS);
                let _ = classes.remove_1(HIDDEN_CLASS);

                if outcome.animate_skills {
                    animate_skill_bars(&skills_document);
                }
            }
        })?;

        for target in &targets {
            watcher.observe(target);
        }
        self.watchers.push(watcher);
        Ok(())
    }

    fn install_scroll_spy(&mut self, document: &Document) -> Result<(), JsValue> {
        let sections = select_all(document, &format!("main section, #{STATS_SECTION_ID}"));
        let anchors = select_all(document, ".nav-links a");
        if sections.is_empty() || anchors.is_empty() {
            return Ok(());
        }

        let watcher = VisibilityWatcher::new(SPY_THRESHOLD, move |entries, _| {
            let seen: Vec<(String, bool)> = entries
                .iter()
                .map(|entry| (entry.target().id(), entry.is_intersecting()))
                .collect();

            let Some(target) = spy_target(seen.iter().map(|(id, intersecting)| VisibilityEntry {
                id,
                intersecting: *intersecting,
            })) else {
                return;
            };

            let hrefs: Vec<String> = anchors
                .iter()
                .map(|anchor| anchor.get_attribute("href").unwrap_or_default())
                .collect();
            let flags = active_links(hrefs.iter().map(String::as_str), target);
            for (anchor, active) in anchors.iter().zip(flags) {
                let _ = anchor.class_list().toggle_with_force(ACTIVE_CLASS, active);
            }
        })?;

        for section in &sections {
            watcher.observe(section);
        }
        self.watchers.push(watcher);
        Ok(())
    }

    fn install_counters(&mut self, document: &Document) -> Result<(), JsValue> {
        let Some(stats) = document.get_element_by_id(STATS_SECTION_ID) else {
            return Ok(());
        };
        let numbers = stats
            .query_selector_all(".stat-number")
            .map(node_list_elements)?;

        let counters = Rc::clone(&self.counters);
        let started = Cell::new(false);
        let watcher = VisibilityWatcher::new(STATS_THRESHOLD, move |entries, observer| {
            for entry in entries {
                if !entry.is_intersecting() || started.replace(true) {
                    continue;
                }

                let mut counters = counters.borrow_mut();
                for number in &numbers {
                    counters.push(CounterRun::start(number.clone()));
                }
                observer.unobserve(&entry.target());
            }
        })?;

        watcher.observe(&stats);
        self.watchers.push(watcher);
        Ok(())
    }

    fn install_ripples(&mut self, document: &Document) {
        for button in select_all(document, ".btn") {
            let slot: Rc<RefCell<RippleSlot<Element>>> = Rc::default();
            let host = button.clone();
            let document = document.clone();

            let listener = EventListener::new(&button, "click", move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let Ok(circle) = document.create_element("span") else {
                    return;
                };

                let geometry = RippleGeometry::compute(
                    bounds_of(&host),
                    f64::from(host.client_width()),
                    f64::from(host.client_height()),
                    f64::from(event.client_x()),
                    f64::from(event.client_y()),
                );
                let _ = circle.class_list().add_1("ripple");
                for (property, value) in geometry.style_pairs() {
                    set_style(&circle, property, &value);
                }

                let id = slot.borrow_mut().install(circle.clone());
                if host.append_child(&circle).is_err() {
                    slot.borrow_mut().retire(id);
                    return;
                }

                let slot = Rc::clone(&slot);
                Timeout::new(RIPPLE_LIFETIME_MS, move || {
                    slot.borrow_mut().retire(id);
                })
                .forget();
            });
            self.listeners.push(listener);
        }
    }

    fn install_scroll_effects(&mut self, document: &Document) {
        let Some(win) = window() else {
            return;
        };

        if let Some(progress_bar) = document.get_element_by_id("progress-bar") {
            let document = document.clone();
            let scroll_window = win.clone();
            let listener = EventListener::new(&win, "scroll", move |_event| {
                let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
                let viewport_height = scroll_window
                    .inner_height()
                    .ok()
                    .and_then(|value| value.as_f64())
                    .unwrap_or(0.0);
                let scroll_height = document
                    .document_element()
                    .map(|root| f64::from(root.scroll_height()))
                    .unwrap_or(0.0);

                set_style(
                    &progress_bar,
                    "width",
                    &scroll_progress_width(scroll_y, scroll_height, viewport_height),
                );
            });
            self.listeners.push(listener);
        }

        if let Ok(Some(hero)) = document.query_selector(".hero") {
            let scroll_window = win.clone();
            let listener = EventListener::new(&win, "scroll", move |_event| {
                let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
                set_style(&hero, "background-position-y", &parallax_position(scroll_y));
            });
            self.listeners.push(listener);
        }
    }

    fn install_tilt(&mut self, document: &Document) {
        let (Ok(Some(hero)), Ok(Some(content)), Ok(Some(image))) = (
            document.query_selector(".hero"),
            document.query_selector(".hero-content"),
            document.query_selector(".hero-image"),
        ) else {
            return;
        };

        let bounds_host = hero.clone();
        let (tilt_content, tilt_image) = (content.clone(), image.clone());
        let listener = EventListener::new(&hero, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let Some(angles) = TiltAngles::from_pointer(
                bounds_of(&bounds_host),
                f64::from(event.client_x()),
                f64::from(event.client_y()),
            ) else {
                return;
            };

            set_style(&tilt_content, "transform", &angles.content_transform());
            set_style(&tilt_image, "transform", &angles.image_transform());
        });
        self.listeners.push(listener);

        let listener = EventListener::new(&hero, "mouseleave", move |_event| {
            clear_style(&content, "transform");
            clear_style(&image, "transform");
        });
        self.listeners.push(listener);
    }

    fn install_cursor_follower(&mut self, document: &Document) -> Result<(), JsValue> {
        let (Some(win), Some(body)) = (window(), document.body()) else {
            return Ok(());
        };

        let follower = document.create_element("div")?;
        follower.class_list().add_1("cursor-follower")?;
        body.append_child(&follower)?;

        let cursor = Cell::new(CursorState::default());
        let target = follower.clone();
        let listener = EventListener::new(&win, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let mut state = cursor.get();
            let transform = state.update(f64::from(event.client_x()), f64::from(event.client_y()));
            cursor.set(state);
            set_style(&target, "transform", &transform);
        });

        self.listeners.push(listener);
        self.follower = Some(follower);
        Ok(())
    }
}

/// Installs every effect whose elements exist in the current document.
pub fn install_effects() -> Option<InstalledEffects> {
    let document = document()?;
    let mut effects = InstalledEffects::default();

    InstalledEffects::report("reveal", effects.install_reveal(&document));
    InstalledEffects::report("scroll_spy", effects.install_scroll_spy(&document));
    InstalledEffects::report("counters", effects.install_counters(&document));
    effects.install_ripples(&document);
    effects.install_scroll_effects(&document);
    effects.install_tilt(&document);
    InstalledEffects::report("cursor_follower", effects.install_cursor_follower(&document));

    log_event(
        LogLevel::Info,
        "effects_installed",
        json!({
            "listeners": effects.listeners.len(),
            "watchers": effects.watchers.len(),
        }),
    );

    Some(effects)
}
