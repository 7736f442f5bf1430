use crate::dealer::DealerContext;

/// Whether the bootstrapper should build the popup at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectDecision {
    Inject(DealerContext),
    /// A popup with our id is already in the page.
    AlreadyPresent,
    NoDealer,
}

impl InjectDecision {
    pub fn decide(popup_exists: bool, dealer: Option<DealerContext>) -> Self {
        if popup_exists {
            return InjectDecision::AlreadyPresent;
        }
        match dealer {
            Some(ctx) => InjectDecision::Inject(ctx),
            None => InjectDecision::NoDealer,
        }
    }
}

/// Visibility of the anchored panel. Collapsing slides it off-screen but
/// keeps the grab handle in view; closing is final for the page's lifetime.
#[derive(Debug, Clone)]
pub struct PopupShell {
    open: bool,
    collapsed: bool,
    collapse_offset_px: f64,
}

impl PopupShell {
    pub fn new(collapse_offset_px: f64) -> Self {
        Self {
            open: true,
            collapsed: false,
            collapse_offset_px,
        }
    }

    /// Returns false when already closed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn toggle_collapse(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    /// CSS transform for the panel in its current state.
    pub fn transform(&self) -> String {
        if self.collapsed {
            format!("translateX({}px)", self.collapse_offset_px)
        } else {
            "translateX(0)".to_string()
        }
    }

    /// Grab handle glyph for the current state.
    pub fn handle_glyph(&self) -> &'static str {
        if self.collapsed {
            "▶"
        } else {
            "◀"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injection_guard() {
        let ctx = DealerContext {
            dealer_id: "1".into(),
            page_id: None,
        };
        assert_eq!(InjectDecision::decide(true, Some(ctx.clone())), InjectDecision::AlreadyPresent);
        assert_eq!(InjectDecision::decide(false, None), InjectDecision::NoDealer);
        assert_eq!(InjectDecision::decide(false, Some(ctx.clone())), InjectDecision::Inject(ctx));
    }

    #[test]
    fn collapse_round_trip() {
        let mut shell = PopupShell::new(270.0);
        assert_eq!(shell.handle_glyph(), "◀");
        assert!(shell.toggle_collapse());
        assert_eq!(shell.transform(), "translateX(270px)");
        assert_eq!(shell.handle_glyph(), "▶");
        assert!(!shell.toggle_collapse());
        assert_eq!(shell.transform(), "translateX(0)");
    }

    #[test]
    fn close_once() {
        let mut shell = PopupShell::new(270.0);
        assert!(shell.close());
        assert!(!shell.close());
    }
}
