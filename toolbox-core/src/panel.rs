//! Toolbox panel: which button set fills the two grid rows.
//!
//! The machine never touches timers itself. Pointer events and timer expiries
//! go in, [`PanelEffect`]s come out; the shell arms/disarms real timeouts and
//! re-renders rows from [`render_rows`] when told to.

use serde::Serialize;

use crate::config::Timings;
use crate::dealer::DealerLinks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PanelState {
    #[default]
    Original,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelTimer {
    /// Hover-intent on the CMS control.
    Reveal,
    /// Pointer left the toolbox region.
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    EnterToolbox,
    LeaveToolbox,
    EnterCms,
    LeaveCms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEffect {
    /// Start (or restart) a timer; a running one of the same kind is replaced.
    Arm { timer: PanelTimer, delay_ms: u32 },
    Disarm(PanelTimer),
    /// Fade both rows, rebuild them for this state, fade back in.
    Render(PanelState),
}

#[derive(Debug, Clone)]
pub struct ToolboxPanel {
    state: PanelState,
    hovering: bool,
    reveal_armed: bool,
    collapse_armed: bool,
    reveal_delay_ms: u32,
    collapse_delay_ms: u32,
}

impl ToolboxPanel {
    pub fn new(timings: &Timings) -> Self {
        Self {
            state: PanelState::Original,
            hovering: false,
            reveal_armed: false,
            collapse_armed: false,
            reveal_delay_ms: timings.hover_intent_ms,
            collapse_delay_ms: timings.collapse_ms,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_armed(&self, timer: PanelTimer) -> bool {
        match timer {
            PanelTimer::Reveal => self.reveal_armed,
            PanelTimer::Collapse => self.collapse_armed,
        }
    }

    pub fn pointer(&mut self, event: PointerEvent) -> Vec<PanelEffect> {
        let mut effects = Vec::new();
        match event {
            PointerEvent::EnterToolbox => {
                self.hovering = true;
                self.disarm(PanelTimer::Collapse, &mut effects);
            }
            PointerEvent::LeaveToolbox => {
                self.hovering = false;
                self.disarm(PanelTimer::Reveal, &mut effects);
                if self.state == PanelState::Custom {
                    self.arm(PanelTimer::Collapse, &mut effects);
                }
            }
            PointerEvent::EnterCms => {
                if self.state == PanelState::Original {
                    self.arm(PanelTimer::Reveal, &mut effects);
                }
            }
            PointerEvent::LeaveCms => {
                self.disarm(PanelTimer::Reveal, &mut effects);
            }
        }
        effects
    }

    /// Expiry of a timer the shell armed. Stale expiries are ignored.
    pub fn timer_fired(&mut self, timer: PanelTimer) -> Vec<PanelEffect> {
        if !self.is_armed(timer) {
            return Vec::new();
        }
        self.set_armed(timer, false);
        match timer {
            PanelTimer::Reveal => {
                self.hovering = true;
                self.transition(PanelState::Custom).into_iter().collect()
            }
            PanelTimer::Collapse if !self.hovering => {
                self.transition(PanelState::Original).into_iter().collect()
            }
            PanelTimer::Collapse => Vec::new(),
        }
    }

    /// Moving to the current state does nothing, so rows are never rebuilt
    /// or faded redundantly.
    pub fn transition(&mut self, target: PanelState) -> Option<PanelEffect> {
        if self.state == target {
            return None;
        }
        tracing::debug!(from = ?self.state, to = ?target, "toolbox panel transition");
        self.state = target;
        Some(PanelEffect::Render(target))
    }

    fn arm(&mut self, timer: PanelTimer, effects: &mut Vec<PanelEffect>) {
        self.set_armed(timer, true);
        let delay_ms = match timer {
            PanelTimer::Reveal => self.reveal_delay_ms,
            PanelTimer::Collapse => self.collapse_delay_ms,
        };
        effects.push(PanelEffect::Arm { timer, delay_ms });
    }

    fn disarm(&mut self, timer: PanelTimer, effects: &mut Vec<PanelEffect>) {
        if self.is_armed(timer) {
            self.set_armed(timer, false);
            effects.push(PanelEffect::Disarm(timer));
        }
    }

    fn set_armed(&mut self, timer: PanelTimer, armed: bool) {
        match timer {
            PanelTimer::Reveal => self.reveal_armed = armed,
            PanelTimer::Collapse => self.collapse_armed = armed,
        }
    }
}

// ---------- Row rendering ---------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAction {
    /// Hover target that reveals the custom set; no click behaviour.
    RevealCustom,
    Refresh,
    ToggleBlocks,
    DevicePicker,
    StylePalette,
    OverridePicker,
    OpenTab(String),
    /// Reserved slot, rendered disabled.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolButton {
    /// Stable DOM id so listeners can be re-derived after external rewrites.
    pub key: &'static str,
    pub label: &'static str,
    pub action: ToolAction,
}

impl ToolButton {
    fn new(key: &'static str, label: &'static str, action: ToolAction) -> Self {
        Self { key, label, action }
    }

    pub fn enabled(&self) -> bool {
        self.action != ToolAction::Placeholder
    }
}

pub const CMS_BUTTON_ID: &str = "cmsButton";
/// Kept clear of the block highlighter's id and class prefixes so the
/// toolbox never outlines its own control.
pub const HIGHLIGHT_BUTTON_ID: &str = "highlightButton";
pub const MOBILE_BUTTON_ID: &str = "mobileButton";
pub const OVERRIDES_BUTTON_ID: &str = "overridesButton";

pub fn blocks_label(shown: bool) -> &'static str {
    if shown {
        "Hide"
    } else {
        "Blocks"
    }
}

/// Both grid rows for `state`. Pure: the shell builds elements and listeners
/// from this on every transition.
pub fn render_rows(state: PanelState, links: &DealerLinks, blocks_shown: bool) -> [Vec<ToolButton>; 2] {
    match state {
        PanelState::Original => [
            vec![
                ToolButton::new(CMS_BUTTON_ID, "CMS", ToolAction::RevealCustom),
                ToolButton::new("refreshButton", "Refresh", ToolAction::Refresh),
                ToolButton::new(HIGHLIGHT_BUTTON_ID, blocks_label(blocks_shown), ToolAction::ToggleBlocks),
            ],
            vec![
                ToolButton::new(MOBILE_BUTTON_ID, "Mobile", ToolAction::DevicePicker),
                ToolButton::new("stylesButton", "Styles", ToolAction::StylePalette),
                ToolButton::new(OVERRIDES_BUTTON_ID, "Overrides", ToolAction::OverridePicker),
            ],
        ],
        PanelState::Custom => [
            vec![
                ToolButton::new("dashButton", "Dash", ToolAction::OpenTab(links.cms.clone())),
                ToolButton::new(
                    "introWidgetButton",
                    "IntroWidget",
                    ToolAction::OpenTab(links.header_widget.clone()),
                ),
                ToolButton::new("tbdButton1", "TBD", ToolAction::Placeholder),
            ],
            vec![
                ToolButton::new("tbdButton2", "TBD", ToolAction::Placeholder),
                ToolButton::new("tbdButton3", "TBD", ToolAction::Placeholder),
                ToolButton::new("tbdButton4", "TBD", ToolAction::Placeholder),
            ],
        ],
    }
}

/// True when painted rows no longer match the last paint: a row holds a
/// different number of buttons, or a button lacks the `generation` stamp.
/// `stamps[i]` lists the stamp attribute of each button found in row `i`.
pub fn rows_are_stale<S: AsRef<str>>(expected: &[usize], stamps: &[Vec<Option<S>>], generation: u32) -> bool {
    if expected.len() != stamps.len() {
        return true;
    }
    let current = generation.to_string();
    expected.iter().zip(stamps).any(|(&count, row)| {
        row.len() != count
            || row
                .iter()
                .any(|stamp| stamp.as_ref().map(AsRef::as_ref) != Some(current.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolboxConfig;
    use crate::catalog::BLOCK_TARGETS;
    use crate::dealer::DealerContext;
    use std::collections::HashMap;

    /// Drives the panel against a virtual millisecond clock.
    struct Sim {
        panel: ToolboxPanel,
        now: u64,
        deadlines: HashMap<PanelTimer, u64>,
        renders: Vec<PanelState>,
    }

    impl Sim {
        fn new() -> Self {
            Self {
                panel: ToolboxPanel::new(&Timings::default()),
                now: 0,
                deadlines: HashMap::new(),
                renders: Vec::new(),
            }
        }

        fn apply(&mut self, effects: Vec<PanelEffect>) {
            for effect in effects {
                match effect {
                    PanelEffect::Arm { timer, delay_ms } => {
                        self.deadlines.insert(timer, self.now + delay_ms as u64);
                    }
                    PanelEffect::Disarm(timer) => {
                        self.deadlines.remove(&timer);
                    }
                    PanelEffect::Render(state) => self.renders.push(state),
                }
            }
        }

        fn pointer(&mut self, event: PointerEvent) {
            let effects = self.panel.pointer(event);
            self.apply(effects);
        }

        fn advance(&mut self, ms: u64) {
            let until = self.now + ms;
            loop {
                let next = self
                    .deadlines
                    .iter()
                    .filter(|(_, at)| **at <= until)
                    .min_by_key(|(_, at)| **at)
                    .map(|(timer, at)| (*timer, *at));
                let Some((timer, at)) = next else { break };
                self.deadlines.remove(&timer);
                self.now = at;
                let effects = self.panel.timer_fired(timer);
                self.apply(effects);
            }
            self.now = until;
        }

        fn reveal(&mut self) {
            self.pointer(PointerEvent::EnterToolbox);
            self.pointer(PointerEvent::EnterCms);
            self.advance(30);
            assert_eq!(self.panel.state(), PanelState::Custom);
        }
    }

    #[test]
    fn hover_intent_reveals_custom() {
        let mut sim = Sim::new();
        sim.pointer(PointerEvent::EnterToolbox);
        sim.pointer(PointerEvent::EnterCms);
        sim.advance(29);
        assert_eq!(sim.panel.state(), PanelState::Original);
        sim.advance(1);
        assert_eq!(sim.panel.state(), PanelState::Custom);
        assert_eq!(sim.renders, vec![PanelState::Custom]);
    }

    #[test]
    fn short_hover_does_not_reveal() {
        let mut sim = Sim::new();
        sim.pointer(PointerEvent::EnterToolbox);
        sim.pointer(PointerEvent::EnterCms);
        sim.advance(20);
        sim.pointer(PointerEvent::LeaveCms);
        sim.advance(100);
        assert_eq!(sim.panel.state(), PanelState::Original);

        sim.pointer(PointerEvent::EnterCms);
        sim.advance(10);
        sim.pointer(PointerEvent::LeaveToolbox);
        sim.advance(100);
        assert_eq!(sim.panel.state(), PanelState::Original);
        assert!(sim.renders.is_empty());
    }

    #[test]
    fn leaving_for_collapse_delay_restores_original() {
        let mut sim = Sim::new();
        sim.reveal();
        sim.pointer(PointerEvent::LeaveToolbox);
        sim.advance(79);
        assert_eq!(sim.panel.state(), PanelState::Custom);
        sim.advance(1);
        assert_eq!(sim.panel.state(), PanelState::Original);
        assert_eq!(sim.renders, vec![PanelState::Custom, PanelState::Original]);
    }

    #[test]
    fn reentry_cancels_collapse() {
        let mut sim = Sim::new();
        sim.reveal();
        sim.pointer(PointerEvent::LeaveToolbox);
        sim.advance(50);
        sim.pointer(PointerEvent::EnterToolbox);
        sim.advance(500);
        assert_eq!(sim.panel.state(), PanelState::Custom);
        assert!(!sim.panel.is_armed(PanelTimer::Collapse));
    }

    #[test]
    fn reveal_works_after_every_cycle() {
        let mut sim = Sim::new();
        for _ in 0..3 {
            sim.reveal();
            sim.pointer(PointerEvent::LeaveToolbox);
            sim.advance(80);
            assert_eq!(sim.panel.state(), PanelState::Original);
        }
        assert_eq!(sim.renders.len(), 6);
    }

    #[test]
    fn same_state_transition_is_noop() {
        let mut panel = ToolboxPanel::new(&Timings::default());
        assert_eq!(panel.transition(PanelState::Original), None);
        assert_eq!(panel.transition(PanelState::Custom), Some(PanelEffect::Render(PanelState::Custom)));
        assert_eq!(panel.transition(PanelState::Custom), None);
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut panel = ToolboxPanel::new(&Timings::default());
        assert!(panel.timer_fired(PanelTimer::Reveal).is_empty());
        assert!(panel.timer_fired(PanelTimer::Collapse).is_empty());
        assert_eq!(panel.state(), PanelState::Original);
    }

    #[test]
    fn rows_follow_state() {
        let ctx = DealerContext {
            dealer_id: "123".into(),
            page_id: None,
        };
        let links = DealerLinks::build(&ctx, "https://d.test/", &ToolboxConfig::default());

        let [top, bottom] = render_rows(PanelState::Original, &links, false);
        assert_eq!(top[0].action, ToolAction::RevealCustom);
        assert_eq!(top[2].label, "Blocks");
        assert_eq!(bottom.iter().map(|b| b.key).collect::<Vec<_>>(), [
            MOBILE_BUTTON_ID,
            "stylesButton",
            OVERRIDES_BUTTON_ID
        ]);
        assert_eq!(render_rows(PanelState::Original, &links, true)[0][2].label, "Hide");

        let [top, bottom] = render_rows(PanelState::Custom, &links, false);
        assert_eq!(top[0].action, ToolAction::OpenTab(links.cms.clone()));
        assert_eq!(top[1].action, ToolAction::OpenTab(links.header_widget.clone()));
        assert!(!top[2].enabled());
        assert!(bottom.iter().all(|b| !b.enabled()));
    }

    fn stamped(row: &[&str]) -> Vec<Option<String>> {
        row.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn fresh_paint_is_not_stale() {
        let stamps = [stamped(&["4", "4", "4"]), stamped(&["4", "4", "4"])];
        assert!(!rows_are_stale(&[3, 3], &stamps, 4));
    }

    #[test]
    fn rewritten_rows_are_stale() {
        let fresh = || [stamped(&["4", "4", "4"]), stamped(&["4", "4", "4"])];

        let mut missing_stamp = fresh();
        missing_stamp[1][0] = None;
        assert!(rows_are_stale(&[3, 3], &missing_stamp, 4));

        assert!(rows_are_stale(&[3, 3], &fresh(), 5));

        let mut extra = fresh();
        extra[0].push(Some("4".into()));
        assert!(rows_are_stale(&[3, 3], &extra, 4));

        let mut missing = fresh();
        missing[1].pop();
        assert!(rows_are_stale(&[3, 3], &missing, 4));

        assert!(rows_are_stale(&[3, 3], &fresh()[..1], 4));
    }

    #[test]
    fn toolbox_keys_stay_clear_of_block_patterns() {
        let ctx = DealerContext {
            dealer_id: "123".into(),
            page_id: None,
        };
        let links = DealerLinks::build(&ctx, "https://d.test/", &ToolboxConfig::default());
        for state in [PanelState::Original, PanelState::Custom] {
            for shown in [false, true] {
                for tool in render_rows(state, &links, shown).iter().flatten() {
                    for target in BLOCK_TARGETS.iter() {
                        assert!(!target.claims(tool.key, "toolbox-btn"), "{} matches {:?}", tool.key, target);
                    }
                }
            }
        }
        assert!(!BLOCK_TARGETS[0].claims(HIGHLIGHT_BUTTON_ID, ""));
    }
}
