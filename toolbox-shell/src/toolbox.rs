//! Drives the two toolbox rows from [`ToolboxPanel`] effects.
//!
//! Every paint stamps the buttons with a generation number. Host scripts that
//! rewrite the popup drop or replace those buttons; a mutation observer spots
//! the missing stamp and paints again so listeners are never lost.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use rand::rngs::StdRng;
use rand::SeedableRng;
use toolbox_core::{render_rows, rows_are_stale, PanelEffect, PanelState, PanelTimer, PointerEvent, ToolAction, ToolButton, ToolboxPanel};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, MutationObserver, MutationObserverInit};

use crate::app::App;
use crate::dom::{self, Listener};
use crate::menus;

const ACTION_ATTR: &str = "data-toolbox-action";
const BOUND_ATTR: &str = "data-toolbox-bound";

pub(crate) struct Toolbox {
    app: Rc<App>,
    rows: [HtmlElement; 2],
    panel: ToolboxPanel,
    reveal: Option<Timeout>,
    collapse: Option<Timeout>,
    rendered: Vec<Listener>,
    generation: u32,
    expected: [usize; 2],
}

pub(crate) type ToolboxHandle = Rc<RefCell<Toolbox>>;

impl Toolbox {
    fn set_timer(&mut self, timer: PanelTimer, timeout: Option<Timeout>) {
        match timer {
            PanelTimer::Reveal => self.reveal = timeout,
            PanelTimer::Collapse => self.collapse = timeout,
        }
    }

    /// True when the rows no longer hold exactly the buttons of the last paint.
    fn is_stale(&self) -> bool {
        let mut stamps = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let Ok(buttons) = row.query_selector_all(&format!("[{ACTION_ATTR}]")) else {
                return true;
            };
            let seen: Vec<Option<String>> = (0..buttons.length())
                .map(|i| {
                    buttons
                        .item(i)
                        .and_then(|n| n.dyn_into::<Element>().ok())
                        .and_then(|el| el.get_attribute(BOUND_ATTR))
                })
                .collect();
            stamps.push(seen);
        }
        rows_are_stale(&self.expected, &stamps, self.generation)
    }
}

/// Build both rows inside `area` and wire the area's hover tracking.
pub(crate) fn mount(app: Rc<App>, doc: &Document, area: &HtmlElement) -> Result<ToolboxHandle, JsValue> {
    let rows = [grid_row(doc)?, grid_row(doc)?];
    for row in &rows {
        area.append_child(row)?;
    }
    let panel = ToolboxPanel::new(&app.config.timings);
    let handle = Rc::new(RefCell::new(Toolbox {
        app,
        rows,
        panel,
        reveal: None,
        collapse: None,
        rendered: Vec::new(),
        generation: 0,
        expected: [0, 0],
    }));
    paint(&handle)?;

    for (event, pointer) in [
        ("mouseenter", PointerEvent::EnterToolbox),
        ("mouseleave", PointerEvent::LeaveToolbox),
    ] {
        let weak = Rc::downgrade(&handle);
        Listener::new(area, event, move |_| {
            if let Some(handle) = weak.upgrade() {
                on_pointer(&handle, pointer);
            }
        })?
        .forget();
    }
    Ok(handle)
}

/// Repaint whenever the popup subtree changes and our buttons went missing.
pub(crate) fn watch(handle: &ToolboxHandle, popup: &HtmlElement) -> Result<(), JsValue> {
    let weak = Rc::downgrade(handle);
    let callback = Closure::<dyn FnMut(js_sys::Array)>::wrap(Box::new(move |_records: js_sys::Array| {
        let Some(handle) = weak.upgrade() else { return };
        let stale = match handle.try_borrow() {
            Ok(toolbox) => toolbox.is_stale(),
            Err(_) => return,
        };
        if stale {
            tracing::debug!("toolbox buttons rewritten externally, repainting");
            if let Err(err) = paint(&handle) {
                tracing::warn!(error = %dom::describe(&err), "toolbox repaint failed");
            }
        }
    }));
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(popup, &init)?;
    callback.forget();
    Ok(())
}

fn on_pointer(handle: &ToolboxHandle, event: PointerEvent) {
    let effects = match handle.try_borrow_mut() {
        Ok(mut toolbox) => toolbox.panel.pointer(event),
        Err(_) => return,
    };
    apply(handle, effects);
}

fn on_timer(handle: &ToolboxHandle, timer: PanelTimer) {
    let effects = match handle.try_borrow_mut() {
        Ok(mut toolbox) => toolbox.panel.timer_fired(timer),
        Err(_) => return,
    };
    apply(handle, effects);
}

fn apply(handle: &ToolboxHandle, effects: Vec<PanelEffect>) {
    for effect in effects {
        match effect {
            PanelEffect::Arm { timer, delay_ms } => {
                let weak = Rc::downgrade(handle);
                let timeout = Timeout::new(delay_ms, move || {
                    if let Some(handle) = weak.upgrade() {
                        on_timer(&handle, timer);
                    }
                });
                handle.borrow_mut().set_timer(timer, Some(timeout));
            }
            PanelEffect::Disarm(timer) => handle.borrow_mut().set_timer(timer, None),
            PanelEffect::Render(state) => swap(handle, state),
        }
    }
}

/// Fade out, rebuild for `state`, fade back in.
fn swap(handle: &ToolboxHandle, state: PanelState) {
    let (rows, timings) = {
        let toolbox = handle.borrow();
        (toolbox.rows.clone(), toolbox.app.config.timings)
    };
    let transition = format!(
        "opacity {ms}ms ease, transform {ms}ms ease",
        ms = timings.swap_fade_ms
    );
    for row in &rows {
        let _ = dom::set_styles(
            row,
            &[
                ("transition", transition.as_str()),
                ("opacity", "0"),
                ("transform", "scale(0.97)"),
            ],
        );
    }
    if let Err(err) = paint(handle) {
        tracing::warn!(?state, error = %dom::describe(&err), "toolbox render failed");
    }
    spawn_local(async move {
        TimeoutFuture::new(timings.fade_in_delay_ms).await;
        for row in &rows {
            let _ = dom::set_styles(row, &[("opacity", "1"), ("transform", "scale(1)")]);
        }
    });
}

/// Replace both rows' buttons with the current state's set. Old listeners
/// are dropped first, so nothing stays bound to detached buttons.
fn paint(handle: &ToolboxHandle) -> Result<(), JsValue> {
    let doc = dom::document()?;
    let mut toolbox = handle.borrow_mut();
    toolbox.rendered.clear();
    toolbox.generation = toolbox.generation.wrapping_add(1);
    let generation = toolbox.generation.to_string();
    let sets = render_rows(toolbox.panel.state(), &toolbox.app.links, toolbox.app.blocks.is_shown());

    let mut listeners = Vec::new();
    for (row, buttons) in toolbox.rows.iter().zip(sets.iter()) {
        row.set_inner_html("");
        for tool in buttons {
            let button = build_button(&doc, tool, &generation)?;
            listeners.extend(bind(handle, &toolbox.app, &button, tool)?);
            row.append_child(&button)?;
        }
    }
    toolbox.expected = [sets[0].len(), sets[1].len()];
    toolbox.rendered = listeners;
    tracing::trace!(state = ?toolbox.panel.state(), generation = toolbox.generation, "toolbox painted");
    Ok(())
}

fn build_button(doc: &Document, tool: &ToolButton, generation: &str) -> Result<HtmlElement, JsValue> {
    let button = dom::create_text(doc, "button", tool.label)?;
    button.set_id(tool.key);
    button.set_class_name("toolbox-btn");
    button.set_attribute(ACTION_ATTR, action_name(&tool.action))?;
    button.set_attribute(BOUND_ATTR, generation)?;
    if tool.action == ToolAction::RevealCustom {
        let caret = dom::create_text(doc, "span", "▾")?;
        caret.set_class_name("toolbox-caret");
        button.append_child(&caret)?;
    }
    if !tool.enabled() {
        button.class_list().add_1("toolbox-btn-disabled")?;
        if let Some(button) = button.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(true);
        }
    }
    Ok(button)
}

fn action_name(action: &ToolAction) -> &'static str {
    match action {
        ToolAction::RevealCustom => "reveal",
        ToolAction::Refresh => "refresh",
        ToolAction::ToggleBlocks => "blocks",
        ToolAction::DevicePicker => "devices",
        ToolAction::StylePalette => "styles",
        ToolAction::OverridePicker => "overrides",
        ToolAction::OpenTab(_) => "open",
        ToolAction::Placeholder => "placeholder",
    }
}

/// Listeners for one freshly built button, derived from its action.
fn bind(handle: &ToolboxHandle, app: &Rc<App>, button: &HtmlElement, tool: &ToolButton) -> Result<Vec<Listener>, JsValue> {
    let listener = match &tool.action {
        ToolAction::RevealCustom => {
            return Ok(vec![
                hover(handle, button, "mouseenter", PointerEvent::EnterCms)?,
                hover(handle, button, "mouseleave", PointerEvent::LeaveCms)?,
            ]);
        }
        ToolAction::Placeholder => return Ok(Vec::new()),
        ToolAction::Refresh => {
            let store = app.overrides.clone();
            Listener::new(button, "click", move |_| {
                let mut rng = StdRng::seed_from_u64(entropy());
                if let Err(err) = store.refresh(&mut rng) {
                    tracing::warn!(%err, "refresh failed");
                }
            })?
        }
        ToolAction::ToggleBlocks => {
            let blocks = app.blocks.clone();
            Listener::new(button, "click", move |event| {
                event.stop_propagation();
                blocks.toggle();
            })?
        }
        ToolAction::DevicePicker => menu_listener(app, button, menus::toggle_device_menu)?,
        ToolAction::StylePalette => menu_listener(app, button, menus::toggle_palette)?,
        ToolAction::OverridePicker => menu_listener(app, button, menus::toggle_override_menu)?,
        ToolAction::OpenTab(url) => {
            let url = url.clone();
            Listener::new(button, "click", move |_| dom::open_tab(&url))?
        }
    };
    Ok(vec![listener])
}

fn hover(handle: &ToolboxHandle, button: &HtmlElement, event: &'static str, pointer: PointerEvent) -> Result<Listener, JsValue> {
    let weak = Rc::downgrade(handle);
    Listener::new(button, event, move |_| {
        if let Some(handle) = weak.upgrade() {
            on_pointer(&handle, pointer);
        }
    })
}

fn menu_listener(app: &Rc<App>, button: &HtmlElement, open: fn(&App, &HtmlElement)) -> Result<Listener, JsValue> {
    let app = Rc::clone(app);
    let anchor = button.clone();
    Listener::new(button, "click", move |event| {
        event.stop_propagation();
        open(&app, &anchor);
    })
}

fn grid_row(doc: &Document) -> Result<HtmlElement, JsValue> {
    let row = dom::create(doc, "div")?;
    row.set_class_name("toolbox-grid");
    Ok(row)
}

fn entropy() -> u64 {
    let random = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (random << 32) ^ js_sys::Date::now() as u64
}
