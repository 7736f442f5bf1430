use std::cell::RefCell;
use std::rc::Rc;

use toolbox_core::{DealerContext, DealerLinks, InjectDecision, OverrideStore, ToolboxConfig};
use wasm_bindgen::JsValue;

use crate::blocks::Blocks;
use crate::context;
use crate::dom;
use crate::location::BrowserLocation;
use crate::overlays::TransientOverlay;
use crate::popup;
use crate::styles;
use crate::toolbox::{self, ToolboxHandle};

/// Everything the toolbox buttons act on, resolved once per page.
pub(crate) struct App {
    pub(crate) config: ToolboxConfig,
    pub(crate) dealer: DealerContext,
    pub(crate) links: DealerLinks,
    pub(crate) overrides: Rc<OverrideStore<BrowserLocation>>,
    pub(crate) blocks: Rc<Blocks>,
    pub(crate) devices: Rc<TransientOverlay>,
    pub(crate) override_menu: Rc<TransientOverlay>,
    pub(crate) palette: Rc<TransientOverlay>,
}

struct Mounted {
    _app: Rc<App>,
    _toolbox: ToolboxHandle,
}

thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
}

/// Inject the popup once the document is parsed. Returns `Ok` without doing
/// anything when a popup is already present or the page has no dealer id.
pub(crate) fn mount(config: ToolboxConfig) -> Result<(), JsValue> {
    let window = dom::window()?;
    let doc = dom::document()?;

    let exists = doc.get_element_by_id(&config.popup_id).is_some();
    let dealer = if exists { None } else { context::read_dealer(&doc, &config) };
    let dealer = match InjectDecision::decide(exists, dealer) {
        InjectDecision::Inject(dealer) => dealer,
        InjectDecision::AlreadyPresent => {
            tracing::debug!(popup_id = %config.popup_id, "toolbox already injected");
            return Ok(());
        }
        InjectDecision::NoDealer => {
            tracing::warn!("no dealer id on this page, toolbox not shown");
            return Ok(());
        }
    };

    let canonical = context::canonical_url(&doc, &window, &config);
    let links = DealerLinks::build(&dealer, &canonical, &config);
    styles::inject(&doc)?;

    let timings = config.timings;
    let app = Rc::new(App {
        overrides: Rc::new(OverrideStore::new(BrowserLocation::new(window.location()))),
        blocks: Blocks::new(&config.popup_id),
        devices: TransientOverlay::new("devices", timings),
        override_menu: TransientOverlay::new("overrides", timings),
        palette: TransientOverlay::new("styles", timings),
        config,
        dealer,
        links,
    });

    let parts = popup::build(&doc, &app)?;
    let toolbox = toolbox::mount(Rc::clone(&app), &doc, &parts.toolbox_area)?;
    dom::append_to_body(&doc, &parts.root)?;
    toolbox::watch(&toolbox, &parts.root)?;

    tracing::info!(
        dealer_id = %app.dealer.dealer_id,
        page_id = ?app.dealer.page_id,
        staff = app.links.staff_context,
        "toolbox ready"
    );
    MOUNTED.with(|mounted| {
        *mounted.borrow_mut() = Some(Mounted {
            _app: app,
            _toolbox: toolbox,
        })
    });
    Ok(())
}
