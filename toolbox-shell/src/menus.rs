//! Device dropdown, override dropdown and style palette.

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use toolbox_core::{place_below, AnchorRect, StyleSwatch, SwatchGroup, DEVICE_PRESETS, STYLE_SWATCHES};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, HtmlElement};

use crate::app::App;
use crate::dom::{self, Copied, Listener};
use crate::preview;

const PALETTE_WIDTH_PX: f64 = 560.0;
const PALETTE_TOP_PX: f64 = 60.0;

pub(crate) fn toggle_device_menu(app: &App, anchor: &HtmlElement) {
    let layout = app.config.layout;
    app.devices.toggle(anchor, |overlay| {
        let doc = dom::document()?;
        let root = dropdown_root(&doc, anchor, layout.device_dropdown_width_px, layout.dropdown_gap_px, layout.dropdown_margin_px)?;
        root.append_child(&heading(&doc, "📱 Select Device")?)?;

        let mut listeners = Vec::with_capacity(DEVICE_PRESETS.len());
        for preset in DEVICE_PRESETS.iter().copied() {
            let option = dom::create(&doc, "div")?;
            option.set_class_name("toolbox-option");
            option.append_child(&dom::create_text(&doc, "span", preset.name)?)?;
            let dims = dom::create_text(&doc, "span", &preset.dimensions())?;
            dims.set_class_name("toolbox-muted");
            option.append_child(&dims)?;

            let overlay = Rc::downgrade(overlay);
            let chrome_px = layout.preview_chrome_px;
            listeners.push(Listener::new(&option, "click", move |event| {
                event.stop_propagation();
                preview::open_preview(preset, chrome_px);
                if let Some(overlay) = overlay.upgrade() {
                    overlay.hide();
                }
            })?);
            root.append_child(&option)?;
        }
        Ok((root, listeners))
    });
}

pub(crate) fn toggle_override_menu(app: &App, anchor: &HtmlElement) {
    let layout = app.config.layout;
    let store = app.overrides.clone();
    app.override_menu.toggle(anchor, |_| {
        let doc = dom::document()?;
        let root = dropdown_root(&doc, anchor, layout.overrides_dropdown_width_px, layout.dropdown_gap_px, layout.dropdown_margin_px)?;
        let mut listeners = Vec::new();

        let clear = dom::create_text(&doc, "div", "🔄 Clear All Overrides")?;
        clear.set_class_name("toolbox-option toolbox-clear");
        let clear_store = store.clone();
        listeners.push(Listener::new(&clear, "click", move |event| {
            event.stop_propagation();
            if let Err(err) = clear_store.clear_all() {
                tracing::warn!(%err, "could not clear overrides");
            }
        })?);
        root.append_child(&clear)?;
        root.append_child(&heading(&doc, "⚙️ Feature Overrides")?)?;

        for (feature, active) in store.statuses() {
            let row = dom::create(&doc, "div")?;
            row.set_class_name(if active { "toolbox-option toolbox-override toolbox-active" } else { "toolbox-option toolbox-override" });

            let name = dom::create_text(&doc, "span", &format!("Turn OFF {}", feature.name))?;
            let info = dom::create_text(&doc, "span", "?")?;
            info.set_class_name("toolbox-info");
            info.set_title(feature.description);
            name.append_child(&info)?;
            row.append_child(&name)?;

            let badge = dom::create_text(&doc, "span", if active { "OFF" } else { "ON" })?;
            badge.set_class_name(if active { "toolbox-badge toolbox-badge-off" } else { "toolbox-badge toolbox-badge-on" });
            row.append_child(&badge)?;

            let store = store.clone();
            let param = feature.url_param;
            listeners.push(Listener::new(&row, "click", move |event| {
                event.stop_propagation();
                if let Err(err) = store.toggle(param) {
                    tracing::warn!(param, %err, "could not toggle override");
                }
            })?);
            root.append_child(&row)?;
        }
        Ok((root, listeners))
    });
}

/// Palette of host utility classes rendered with the host's own stylesheet.
/// Clicking a swatch copies its class name.
pub(crate) fn toggle_palette(app: &App, anchor: &HtmlElement) {
    let layout = app.config.layout;
    let feedback_ms = app.config.timings.copy_feedback_ms;
    app.palette.toggle(anchor, |overlay| {
        let doc = dom::document()?;
        let viewport = dom::window()?.inner_width()?.as_f64().unwrap_or(PALETTE_WIDTH_PX);
        let centered = AnchorRect {
            left: (viewport - PALETTE_WIDTH_PX) / 2.0,
            bottom: PALETTE_TOP_PX,
        };
        let at = place_below(centered, PALETTE_WIDTH_PX, viewport, 0.0, layout.dropdown_margin_px);

        let root = dom::create(&doc, "div")?;
        root.set_class_name("toolbox-palette");
        let (top, left, width) = (format!("{}px", at.top), format!("{}px", at.left), format!("{PALETTE_WIDTH_PX}px"));
        dom::set_styles(&root, &[("top", top.as_str()), ("left", left.as_str()), ("width", width.as_str())])?;
        let mut listeners = Vec::new();

        let header = dom::create(&doc, "div")?;
        header.set_class_name("toolbox-palette-header");
        header.append_child(&dom::create_text(&doc, "span", "Dealer Buttons & Backgrounds")?)?;
        let close = dom::create_text(&doc, "span", "✕")?;
        close.set_class_name("toolbox-close");
        let weak = Rc::downgrade(overlay);
        listeners.push(Listener::new(&close, "click", move |event| {
            event.stop_propagation();
            if let Some(overlay) = weak.upgrade() {
                overlay.hide();
            }
        })?);
        header.append_child(&close)?;
        root.append_child(&header)?;

        for group in SwatchGroup::ALL {
            root.append_child(&heading(&doc, group.heading())?)?;
            let section = dom::create(&doc, "div")?;
            section.set_class_name("toolbox-swatches");
            for swatch in STYLE_SWATCHES.iter().filter(|s| s.group == group) {
                let (cell, listener) = swatch_cell(&doc, swatch, feedback_ms)?;
                listeners.push(listener);
                section.append_child(&cell)?;
            }
            root.append_child(&section)?;
        }
        Ok((root, listeners))
    });
}

fn swatch_cell(doc: &Document, swatch: &StyleSwatch, feedback_ms: u32) -> Result<(HtmlElement, Listener), JsValue> {
    let button = dom::create_text(doc, "button", swatch.class)?;
    button.set_class_name(&swatch.button_classes());
    let class = swatch.class;
    let target = button.clone();
    let listener = Listener::new(&button, "click", move |event| {
        event.stop_propagation();
        copy_with_feedback(target.clone(), class.to_string(), feedback_ms);
    })?;

    let cell = match swatch.row_class() {
        Some(row_class) => {
            let row = dom::create(doc, "div")?;
            row.set_class_name(&format!("toolbox-swatch-row {row_class}"));
            row.append_child(&button)?;
            row
        }
        None => button,
    };
    Ok((cell, listener))
}

/// Copy `text` and flash a check mark on `button`.
pub(crate) fn copy_with_feedback(button: HtmlElement, text: String, feedback_ms: u32) {
    match dom::copy_text(&text) {
        Ok(Copied::Pending(promise)) => spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => flash_copied(button, &text, feedback_ms),
                Err(err) => tracing::warn!(error = %dom::describe(&err), "clipboard write rejected"),
            }
        }),
        Ok(Copied::Done(true)) => flash_copied(button, &text, feedback_ms),
        Ok(Copied::Done(false)) => tracing::warn!("browser refused the copy command"),
        Err(err) => tracing::warn!(error = %dom::describe(&err), "copy failed"),
    }
}

fn flash_copied(button: HtmlElement, text: &str, feedback_ms: u32) {
    tracing::debug!(text, "copied to clipboard");
    let original = button.text_content();
    button.set_text_content(Some("✓"));
    let _ = button.class_list().add_1("toolbox-copied");
    spawn_local(async move {
        TimeoutFuture::new(feedback_ms).await;
        button.set_text_content(original.as_deref());
        let _ = button.class_list().remove_1("toolbox-copied");
    });
}

fn dropdown_root(doc: &Document, anchor: &HtmlElement, width: f64, gap: f64, margin: f64) -> Result<HtmlElement, JsValue> {
    let rect = anchor.get_bounding_client_rect();
    let viewport = dom::window()?.inner_width()?.as_f64().unwrap_or(rect.right() + margin);
    let at = place_below(
        AnchorRect {
            left: rect.left(),
            bottom: rect.bottom(),
        },
        width,
        viewport,
        gap,
        margin,
    );
    let root = dom::create(doc, "div")?;
    root.set_class_name("toolbox-dropdown");
    let (top, left, width) = (format!("{}px", at.top), format!("{}px", at.left), format!("{width}px"));
    dom::set_styles(&root, &[("top", top.as_str()), ("left", left.as_str()), ("width", width.as_str())])?;
    Ok(root)
}

fn heading(doc: &Document, text: &str) -> Result<HtmlElement, JsValue> {
    let el = dom::create_text(doc, "div", text)?;
    el.set_class_name("toolbox-heading");
    Ok(el)
}
