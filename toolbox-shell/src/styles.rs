use wasm_bindgen::JsValue;
use web_sys::Document;

const STYLE_ID: &str = "toolbox-styles";

const CSS: &str = r#"
@keyframes toolboxMorphIn {
  from { opacity: 0; transform: scale(0.92) translateY(-6px); }
  to { opacity: 1; transform: scale(1) translateY(0); }
}
@keyframes toolboxSlideIn {
  from { opacity: 0; transform: translateX(40px); }
  to { opacity: 1; transform: translateX(0); }
}
.toolbox-popup {
  position: fixed; top: 120px; right: 0; z-index: 99999;
  width: 290px; padding: 14px 12px 12px;
  background: rgba(24, 26, 32, 0.92); color: #f1f1f1;
  border-radius: 12px 0 0 12px; box-shadow: 0 8px 32px rgba(0, 0, 0, 0.35);
  font: 13px/1.4 -apple-system, "Segoe UI", Roboto, sans-serif;
  transition: transform 0.3s ease;
  animation: toolboxSlideIn 0.3s ease;
}
.toolbox-handle {
  position: absolute; left: -20px; top: 50%; transform: translateY(-50%);
  width: 20px; height: 50px; display: flex; align-items: center; justify-content: center;
  cursor: pointer; background: #19325d; color: #fff; font-size: 12px; border-radius: 6px 0 0 6px;
}
.toolbox-close { position: absolute; top: 6px; right: 10px; cursor: pointer; opacity: 0.7; }
.toolbox-close:hover { opacity: 1; }
.toolbox-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 6px; margin-top: 8px; }
.toolbox-dealer { grid-template-columns: 2fr 1fr 1fr; align-items: center; }
.toolbox-dealer-id { font-weight: 700; padding: 5px 8px; }
.toolbox-btn {
  border: 1px solid rgba(255, 255, 255, 0.15); border-radius: 6px;
  background: rgba(255, 255, 255, 0.08); color: inherit;
  padding: 6px 4px; cursor: pointer; font: inherit;
}
.toolbox-btn:hover { background: rgba(255, 255, 255, 0.18); }
.toolbox-btn-disabled { opacity: 0.4; cursor: default; }
.toolbox-copied { background: #2e7d32; }
.toolbox-caret { margin-left: 4px; font-size: 10px; }
.toolbox-wide { width: 100%; margin-top: 8px; }
.toolbox-dropdown, .toolbox-palette {
  position: fixed; z-index: 100000; max-height: 70vh; overflow-y: auto;
  background: #20232b; color: #f1f1f1; border-radius: 10px; padding: 6px 0;
  box-shadow: 0 10px 30px rgba(0, 0, 0, 0.4);
  font: 13px/1.4 -apple-system, "Segoe UI", Roboto, sans-serif;
  animation: toolboxMorphIn 0.2s ease;
}
.toolbox-palette { padding: 12px; background: #fff; color: #222; }
.toolbox-palette-header { display: flex; justify-content: space-between; font-weight: 600; margin-bottom: 6px; }
.toolbox-palette .toolbox-close { position: static; }
.toolbox-swatches { display: flex; flex-wrap: wrap; gap: 6px; margin-bottom: 8px; }
.toolbox-swatch-row { padding: 6px 10px; border-radius: 4px; }
.toolbox-heading { padding: 6px 12px; font-weight: 600; opacity: 0.8; }
.toolbox-option { display: flex; justify-content: space-between; align-items: center; padding: 6px 12px; cursor: pointer; }
.toolbox-option:hover { background: rgba(255, 255, 255, 0.08); }
.toolbox-muted { opacity: 0.6; font-size: 11px; }
.toolbox-clear { border-bottom: 1px solid rgba(255, 255, 255, 0.12); }
.toolbox-override { border-left: 3px solid transparent; }
.toolbox-active { border-left-color: #e53935; background: rgba(229, 57, 53, 0.12); }
.toolbox-info { margin-left: 6px; padding: 0 5px; border-radius: 50%; background: rgba(255, 255, 255, 0.2); font-size: 10px; cursor: help; }
.toolbox-badge { font-size: 10px; font-weight: 700; padding: 1px 6px; border-radius: 8px; }
.toolbox-badge-on { background: #2e7d32; }
.toolbox-badge-off { background: #c62828; }
.toolbox-block-highlight {
  position: absolute; inset: 0; z-index: 9998; pointer-events: none;
  border: 2px dashed #ff9800; background: rgba(255, 152, 0, 0.12);
}
.toolbox-block-label {
  position: absolute; top: 0; left: 0; padding: 2px 6px;
  background: #ff9800; color: #000; font: 11px/1.4 monospace;
}
.toolbox-close-all {
  position: fixed; top: 12px; left: 50%; transform: translateX(-50%); z-index: 100001;
  padding: 6px 14px; border-radius: 16px; cursor: pointer;
  background: #ff9800; color: #000; font: 600 13px sans-serif;
}
"#;

/// Add the toolbox stylesheet to `<head>` unless it is already there.
pub(crate) fn inject(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }
    let style = doc.create_element("style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(CSS));
    doc.head()
        .ok_or_else(|| JsValue::from_str("document has no head"))?
        .append_child(&style)?;
    Ok(())
}
