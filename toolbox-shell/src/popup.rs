use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use toolbox_core::PopupShell;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement};

use crate::app::App;
use crate::dom::{self, Listener};
use crate::menus;

/// The popup element and the empty region the toolbox rows go into.
pub(crate) struct PopupParts {
    pub(crate) root: HtmlElement,
    pub(crate) toolbox_area: HtmlElement,
}

/// Build the anchored panel. Its listeners live as long as the page.
pub(crate) fn build(doc: &Document, app: &App) -> Result<PopupParts, JsValue> {
    let root = dom::create(doc, "div")?;
    root.set_id(&app.config.popup_id);
    root.set_class_name("toolbox-popup");
    let shell = Rc::new(RefCell::new(PopupShell::new(app.config.layout.popup_collapse_offset_px)));

    root.append_child(&close_control(doc, &root, &shell, app.config.timings.popup_close_ms)?)?;
    root.append_child(&collapse_handle(doc, &root, &shell)?)?;
    root.append_child(&dealer_row(doc, app)?)?;

    if let Some(url) = app.links.page_content.clone() {
        let page = dom::create_text(doc, "button", "Open Page Content →")?;
        page.set_class_name("toolbox-btn toolbox-wide");
        Listener::new(&page, "click", move |_| dom::open_tab(&url))?.forget();
        root.append_child(&page)?;
    }

    let toolbox_area = dom::create(doc, "div")?;
    toolbox_area.set_class_name("toolbox-area");
    root.append_child(&toolbox_area)?;

    Ok(PopupParts { root, toolbox_area })
}

fn close_control(doc: &Document, popup: &HtmlElement, shell: &Rc<RefCell<PopupShell>>, close_ms: u32) -> Result<HtmlElement, JsValue> {
    let close = dom::create_text(doc, "span", "✕")?;
    close.set_class_name("toolbox-close");
    let popup = popup.clone();
    let shell = Rc::clone(shell);
    Listener::new(&close, "click", move |_| {
        if !shell.borrow_mut().close() {
            return;
        }
        let _ = popup
            .style()
            .set_property("animation", &format!("toolboxSlideIn {close_ms}ms ease reverse forwards"));
        let popup = popup.clone();
        spawn_local(async move {
            TimeoutFuture::new(close_ms).await;
            let _ = popup.style().set_property("display", "none");
        });
        tracing::debug!("toolbox popup closed");
    })?
    .forget();
    Ok(close)
}

fn collapse_handle(doc: &Document, popup: &HtmlElement, shell: &Rc<RefCell<PopupShell>>) -> Result<HtmlElement, JsValue> {
    let handle = dom::create_text(doc, "div", shell.borrow().handle_glyph())?;
    handle.set_class_name("toolbox-handle");
    let popup = popup.clone();
    let shell = Rc::clone(shell);
    let glyph = handle.clone();
    Listener::new(&handle, "click", move |_| {
        let mut shell = shell.borrow_mut();
        shell.toggle_collapse();
        let _ = popup.style().set_property("transform", &shell.transform());
        glyph.set_text_content(Some(shell.handle_glyph()));
    })?
    .forget();
    Ok(handle)
}

/// "ID: 1234" with Copy and Custom Code shortcuts.
fn dealer_row(doc: &Document, app: &App) -> Result<HtmlElement, JsValue> {
    let row = dom::create(doc, "div")?;
    row.set_class_name("toolbox-grid toolbox-dealer");

    let id = dom::create_text(doc, "span", &format!("ID: {}", app.dealer.dealer_id))?;
    id.set_class_name("toolbox-dealer-id");
    row.append_child(&id)?;

    let copy = dom::create_text(doc, "button", "Copy")?;
    copy.set_class_name("toolbox-btn");
    let dealer_id = app.dealer.dealer_id.clone();
    let feedback_ms = app.config.timings.copy_feedback_ms;
    let target = copy.clone();
    Listener::new(&copy, "click", move |_| {
        menus::copy_with_feedback(target.clone(), dealer_id.clone(), feedback_ms);
    })?
    .forget();
    row.append_child(&copy)?;

    let cc = dom::create_text(doc, "button", "CC")?;
    cc.set_class_name("toolbox-btn");
    let custom_code = app.links.custom_code.clone();
    Listener::new(&cc, "click", move |_| dom::open_tab(&custom_code))?.forget();
    row.append_child(&cc)?;

    Ok(row)
}
