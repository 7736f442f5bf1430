use std::fmt::Display;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use toolbox_core::clipboard::{CopyRoute, SELECTION_AREA_STYLES};
use web_sys::{Document, Event, EventTarget, HtmlDocument, HtmlElement, HtmlTextAreaElement, Node, Window};

pub(crate) fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub(crate) fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub(crate) fn js_err(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Readable form of a thrown JS value for log lines.
pub(crate) fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

pub(crate) fn create(doc: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    doc.create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("created element is not an HtmlElement"))
}

pub(crate) fn create_text(doc: &Document, tag: &str, text: &str) -> Result<HtmlElement, JsValue> {
    let el = create(doc, tag)?;
    el.set_text_content(Some(text));
    Ok(el)
}

pub(crate) fn set_styles(el: &HtmlElement, props: &[(&str, &str)]) -> Result<(), JsValue> {
    let style = el.style();
    for (name, value) in props {
        style.set_property(name, value)?;
    }
    Ok(())
}

pub(crate) fn append_to_body(doc: &Document, el: &HtmlElement) -> Result<(), JsValue> {
    doc.body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(el)?;
    Ok(())
}

pub(crate) fn detach(node: &Node) {
    if let Some(parent) = node.parent_node() {
        let _ = parent.remove_child(node);
    }
}

/// Node the event was dispatched to, if it is one.
pub(crate) fn event_node(event: &Event) -> Option<Node> {
    event.target().and_then(|t| t.dyn_into::<Node>().ok())
}

pub(crate) fn open_tab(url: &str) {
    let opened = window().and_then(|w| w.open_with_url_and_target(url, "_blank"));
    if let Err(err) = opened {
        tracing::warn!(url, error = %describe(&err), "could not open tab");
    }
}

/// Outcome of starting a copy.
pub(crate) enum Copied {
    /// `writeText` promise still settling.
    Pending(js_sys::Promise),
    /// The selection fallback ran; `false` when the browser refused.
    Done(bool),
}

/// Copy `text`, through `navigator.clipboard.writeText` when the page exposes
/// it (looked up dynamically; insecure origins do not) and a hidden textarea
/// otherwise.
pub(crate) fn copy_text(text: &str) -> Result<Copied, JsValue> {
    let navigator = window()?.navigator();
    let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    let present = !(clipboard.is_undefined() || clipboard.is_null());
    let write = if present {
        js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))?
    } else {
        JsValue::UNDEFINED
    };
    match CopyRoute::choose(present, write.is_function()) {
        CopyRoute::AsyncApi => {
            let write: js_sys::Function = write.unchecked_into();
            let promise = write
                .call1(&clipboard, &JsValue::from_str(text))?
                .dyn_into::<js_sys::Promise>()?;
            Ok(Copied::Pending(promise))
        }
        CopyRoute::Selection => copy_by_selection(text).map(Copied::Done),
    }
}

fn copy_by_selection(text: &str) -> Result<bool, JsValue> {
    let doc = document()?;
    let area = doc
        .create_element("textarea")?
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| JsValue::from_str("created element is not a textarea"))?;
    area.set_value(text);
    set_styles(&area, &SELECTION_AREA_STYLES)?;
    append_to_body(&doc, &area)?;
    area.focus()?;
    area.select();
    let copied = match doc.dyn_ref::<HtmlDocument>() {
        Some(html) => html.exec_command("copy"),
        None => Err(JsValue::from_str("document does not support execCommand")),
    };
    detach(&area);
    copied
}

/// Event listener that unregisters itself when dropped, so listener sets live
/// exactly as long as the render output that owns them.
pub(crate) struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Keep the listener for the rest of the page's life.
    pub(crate) fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
