//! Browser side of the dealer site toolbox.
//!
//! Built for `wasm32-unknown-unknown` and injected into dealer pages. On a
//! native target the crate is empty so the workspace still builds and tests.
//!
//! JS calls `start()` (defaults) or `start_with_config(json)`. Mounting waits
//! for `DOMContentLoaded` when the document is still loading.

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod blocks;
#[cfg(target_arch = "wasm32")]
mod context;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod location;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod menus;
#[cfg(target_arch = "wasm32")]
mod overlays;
#[cfg(target_arch = "wasm32")]
mod popup;
#[cfg(target_arch = "wasm32")]
mod preview;
#[cfg(target_arch = "wasm32")]
mod styles;
#[cfg(target_arch = "wasm32")]
mod toolbox;

#[cfg(target_arch = "wasm32")]
mod entry {
    use toolbox_core::ToolboxConfig;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::DocumentReadyState;

    use crate::{app, dom, logging};

    #[wasm_bindgen(start)]
    pub fn wasm_init() {
        console_error_panic_hook::set_once();
    }

    /// Mount with the built-in configuration.
    #[wasm_bindgen]
    pub fn start() {
        boot(ToolboxConfig::default());
    }

    /// Mount with a JSON configuration; omitted keys keep their defaults and
    /// unknown keys are rejected.
    #[wasm_bindgen]
    pub fn start_with_config(config_json: &str) -> Result<(), JsValue> {
        let config = ToolboxConfig::from_json(config_json).map_err(dom::js_err)?;
        boot(config);
        Ok(())
    }

    fn boot(config: ToolboxConfig) {
        logging::init(config.log_level_filter());
        let doc = match dom::document() {
            Ok(doc) => doc,
            Err(err) => {
                tracing::error!(error = %dom::describe(&err), "no document to mount into");
                return;
            }
        };
        if doc.ready_state() != DocumentReadyState::Loading {
            launch(config);
            return;
        }
        let on_ready = Closure::once_into_js(move || launch(config));
        if let Err(err) = doc.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
            tracing::error!(error = %dom::describe(&err), "could not wait for DOMContentLoaded");
        }
    }

    fn launch(config: ToolboxConfig) {
        if let Err(err) = app::mount(config) {
            tracing::error!(error = %dom::describe(&err), "toolbox failed to mount");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use entry::{start, start_with_config, wasm_init};
