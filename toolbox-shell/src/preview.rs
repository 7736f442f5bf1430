use toolbox_core::preview::{indicator_label, width_rule, window_features, PREVIEW_WINDOW_NAME, VIEWPORT_DIRECTIVE};
use toolbox_core::DevicePreset;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::dom;

/// Reopen the current page in a window sized like `preset`.
pub(crate) fn open_preview(preset: DevicePreset, chrome_px: u32) {
    if let Err(err) = try_open(preset, chrome_px) {
        tracing::warn!(device = preset.name, error = %dom::describe(&err), "device preview failed to open");
    }
}

fn try_open(preset: DevicePreset, chrome_px: u32) -> Result<(), JsValue> {
    let window = dom::window()?;
    let href = window.location().href()?;
    let features = window_features(&preset, chrome_px);
    let Some(preview) = window.open_with_url_and_target_and_features(&href, PREVIEW_WINDOW_NAME, &features)? else {
        tracing::warn!(device = preset.name, "preview window was blocked");
        return Ok(());
    };

    let target = preview.clone();
    let on_load = Closure::once_into_js(move || {
        if let Err(err) = decorate(&target, &preset) {
            tracing::error!(device = preset.name, error = %dom::describe(&err), "could not set up device preview");
        }
    });
    preview.add_event_listener_with_callback("load", on_load.unchecked_ref())?;
    tracing::info!(device = preset.name, "device preview opened");
    Ok(())
}

/// Force the mobile viewport and label the window. Reading `document` throws
/// when the preview navigated cross-origin, so it goes through `Reflect`.
///
/// The preview is another realm: its nodes fail `instanceof` against this
/// window's constructors, so casts here are unchecked.
fn decorate(preview: &Window, preset: &DevicePreset) -> Result<(), JsValue> {
    let doc = js_sys::Reflect::get(preview, &JsValue::from_str("document"))?;
    if doc.is_undefined() || doc.is_null() {
        return Err(JsValue::from_str("preview has no document"));
    }
    let doc: Document = doc.unchecked_into();
    let head = doc.head().ok_or_else(|| JsValue::from_str("preview has no head"))?;

    let meta = doc.create_element("meta")?;
    meta.set_attribute("name", "viewport")?;
    meta.set_attribute("content", VIEWPORT_DIRECTIVE)?;
    head.append_child(&meta)?;

    let style = doc.create_element("style")?;
    style.set_text_content(Some(&width_rule(preset)));
    head.append_child(&style)?;

    let indicator: HtmlElement = doc.create_element("div")?.unchecked_into();
    indicator.set_text_content(Some(&indicator_label(preset)));
    dom::set_styles(
        &indicator,
        &[
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("background", "rgba(0, 0, 0, 0.8)"),
            ("color", "#fff"),
            ("padding", "5px 10px"),
            ("font", "12px sans-serif"),
            ("z-index", "999999"),
        ],
    )?;
    dom::append_to_body(&doc, &indicator)
}
