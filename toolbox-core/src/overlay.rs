//! Bookkeeping for transient overlays: dropdowns, the style palette and block
//! highlights. Handles are generic so the shell stores DOM elements (plus the
//! listeners bound to them) and tests store plain values.

/// Single-instance holder for one overlay kind.
///
/// The live handle doubles as the "visible" flag. Hiding is two-phase: the
/// shell starts a reverse animation on [`begin_hide`](Self::begin_hide) and
/// detaches whatever [`finish_hide`](Self::finish_hide) returns once the
/// animation delay has elapsed.
#[derive(Debug)]
pub struct OverlaySlot<H> {
    live: Option<H>,
    closing: bool,
}

impl<H> Default for OverlaySlot<H> {
    fn default() -> Self {
        Self {
            live: None,
            closing: false,
        }
    }
}

/// What a click on an overlay's anchor control should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIntent {
    Open,
    Close,
    /// A close animation is still running; wait for it.
    Ignore,
}

impl<H> OverlaySlot<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.live.is_some()
    }

    pub fn get(&self) -> Option<&H> {
        self.live.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut H> {
        self.live.as_mut()
    }

    pub fn toggle_intent(&self) -> ToggleIntent {
        match (&self.live, self.closing) {
            (None, _) => ToggleIntent::Open,
            (Some(_), false) => ToggleIntent::Close,
            (Some(_), true) => ToggleIntent::Ignore,
        }
    }

    /// Hands the handle back if an instance is already live.
    pub fn show(&mut self, handle: H) -> Result<(), H> {
        if self.live.is_some() {
            return Err(handle);
        }
        self.live = Some(handle);
        self.closing = false;
        Ok(())
    }

    /// Marks the live instance as closing and returns it for animation.
    /// `None` when nothing is shown or a hide is already underway.
    pub fn begin_hide(&mut self) -> Option<&mut H> {
        if self.closing {
            return None;
        }
        let live = self.live.as_mut()?;
        self.closing = true;
        Some(live)
    }

    /// Releases the instance after the hide delay; the slot is empty afterwards.
    pub fn finish_hide(&mut self) -> Option<H> {
        if !self.closing {
            return None;
        }
        self.closing = false;
        self.live.take()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRect {
    pub left: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub top: f64,
    pub left: f64,
}

/// Below the anchor, clamped so the overlay keeps `margin` from both viewport edges.
pub fn place_below(anchor: AnchorRect, width: f64, viewport_width: f64, gap: f64, margin: f64) -> Placement {
    let mut left = anchor.left;
    if left + width > viewport_width - margin {
        left = viewport_width - width - margin;
    }
    if left < margin {
        left = margin;
    }
    Placement {
        top: anchor.bottom + gap,
        left,
    }
}

/// Document clicks close an overlay unless they land inside it or on its anchor.
pub fn dismisses_on_click(inside_overlay: bool, on_anchor: bool) -> bool {
    !inside_overlay && !on_anchor
}

/// Drops later entries that refer to an element already seen, so a region
/// matched by more than one selector is outlined once.
pub fn unique_targets<T, L, F>(found: Vec<(T, L)>, same: F) -> Vec<(T, L)>
where
    F: Fn(&T, &T) -> bool,
{
    let mut out: Vec<(T, L)> = Vec::with_capacity(found.len());
    for (target, label) in found {
        if !out.iter().any(|(seen, _)| same(seen, &target)) {
            out.push((target, label));
        }
    }
    out
}

/// Overlays attached while a highlight set is being built. Dropping it
/// without [`commit`](Self::commit) hands each one back to `detach`, so a
/// build that fails part way leaves nothing behind in the page.
pub struct Rollback<O, D: FnMut(&O)> {
    items: Vec<O>,
    detach: D,
}

impl<O, D: FnMut(&O)> Rollback<O, D> {
    pub fn new(detach: D) -> Self {
        Self {
            items: Vec::new(),
            detach,
        }
    }

    pub fn push(&mut self, item: O) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keep everything attached.
    pub fn commit(mut self) -> Vec<O> {
        std::mem::take(&mut self.items)
    }
}

impl<O, D: FnMut(&O)> Drop for Rollback<O, D> {
    fn drop(&mut self) {
        for item in &self.items {
            (self.detach)(item);
        }
    }
}

/// Live block highlights: one "Close All" control plus one overlay per block.
#[derive(Debug)]
pub struct BlockHighlighter<C, O> {
    close_all: Option<C>,
    overlays: Vec<O>,
}

impl<C, O> Default for BlockHighlighter<C, O> {
    fn default() -> Self {
        Self {
            close_all: None,
            overlays: Vec::new(),
        }
    }
}

impl<C, O> BlockHighlighter<C, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self) -> bool {
        self.close_all.is_some()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Builds highlights only when none are shown. `Ok(false)` means the call
    /// was suppressed.
    pub fn show_with<E, F>(&mut self, build: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<(C, Vec<O>), E>,
    {
        if self.is_shown() {
            return Ok(false);
        }
        let (close_all, overlays) = build()?;
        self.close_all = Some(close_all);
        self.overlays = overlays;
        Ok(true)
    }

    /// Everything to detach, or `None` when nothing is shown.
    pub fn hide(&mut self) -> Option<(C, Vec<O>)> {
        let close_all = self.close_all.take()?;
        Some((close_all, std::mem::take(&mut self.overlays)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_single_instance() {
        let mut slot = OverlaySlot::new();
        assert_eq!(slot.toggle_intent(), ToggleIntent::Open);
        assert_eq!(slot.show(1), Ok(()));
        assert_eq!(slot.show(2), Err(2));
        assert_eq!(slot.get(), Some(&1));
        assert_eq!(slot.toggle_intent(), ToggleIntent::Close);
    }

    #[test]
    fn hide_is_two_phase_and_idempotent() {
        let mut slot: OverlaySlot<&str> = OverlaySlot::new();
        assert!(slot.begin_hide().is_none());
        assert!(slot.finish_hide().is_none());

        slot.show("menu").unwrap();
        assert_eq!(slot.begin_hide().copied(), Some("menu"));
        assert!(slot.begin_hide().is_none());
        assert!(slot.is_visible());
        assert_eq!(slot.toggle_intent(), ToggleIntent::Ignore);

        assert_eq!(slot.finish_hide(), Some("menu"));
        assert!(!slot.is_visible());
        assert!(slot.finish_hide().is_none());
        assert_eq!(slot.toggle_intent(), ToggleIntent::Open);
    }

    #[test]
    fn repeated_cycles_do_not_leak() {
        let mut slot = OverlaySlot::new();
        for i in 0..5 {
            slot.show(i).unwrap();
            slot.begin_hide();
            assert_eq!(slot.finish_hide(), Some(i));
        }
        assert!(slot.get().is_none());
    }

    #[test]
    fn placement_clamps_to_viewport() {
        let anchor = AnchorRect { left: 900.0, bottom: 40.0 };
        let p = place_below(anchor, 200.0, 1000.0, 8.0, 10.0);
        assert_eq!(p, Placement { top: 48.0, left: 790.0 });

        let p = place_below(AnchorRect { left: 2.0, bottom: 0.0 }, 200.0, 1000.0, 8.0, 10.0);
        assert_eq!(p.left, 10.0);

        // Narrower than the overlay: left margin wins.
        let p = place_below(AnchorRect { left: 50.0, bottom: 0.0 }, 280.0, 250.0, 8.0, 10.0);
        assert_eq!(p.left, 10.0);

        let p = place_below(AnchorRect { left: 300.0, bottom: 10.0 }, 200.0, 1000.0, 8.0, 10.0);
        assert_eq!(p.left, 300.0);
    }

    #[test]
    fn outside_click_rule() {
        assert!(dismisses_on_click(false, false));
        assert!(!dismisses_on_click(true, false));
        assert!(!dismisses_on_click(false, true));
    }

    #[test]
    fn duplicate_targets_are_outlined_once() {
        let found = vec![(1, "block1"), (2, "contentSection"), (1, "Block 1")];
        let unique = unique_targets(found, |a, b| a == b);
        assert_eq!(unique, vec![(1, "block1"), (2, "contentSection")]);
    }

    #[test]
    fn show_blocks_twice_builds_once() {
        let mut blocks: BlockHighlighter<&str, u32> = BlockHighlighter::new();
        let mut builds = 0;
        let mut results = Vec::new();
        for _ in 0..2 {
            let shown = blocks.show_with(|| {
                builds += 1;
                Ok::<_, ()>(("close-all", vec![1, 2, 3]))
            });
            results.push(shown);
        }
        assert_eq!(results, vec![Ok(true), Ok(false)]);
        assert_eq!(builds, 1);
        assert_eq!(blocks.overlay_count(), 3);

        assert_eq!(blocks.hide(), Some(("close-all", vec![1, 2, 3])));
        assert!(blocks.hide().is_none());
        assert_eq!(blocks.overlay_count(), 0);
    }

    #[test]
    fn failed_build_leaves_nothing_shown() {
        let mut blocks: BlockHighlighter<(), ()> = BlockHighlighter::new();
        assert_eq!(blocks.show_with(|| Err("no body")), Err("no body"));
        assert!(!blocks.is_shown());
    }

    #[test]
    fn abandoned_build_detaches_what_it_attached() {
        use std::cell::RefCell;

        let detached = RefCell::new(Vec::new());
        let mut blocks: BlockHighlighter<(), u32> = BlockHighlighter::new();
        let result: Result<bool, &str> = blocks.show_with(|| {
            let mut overlays = Rollback::new(|o: &u32| detached.borrow_mut().push(*o));
            for block in [1, 2, 3] {
                if block == 3 {
                    return Err("close control failed");
                }
                overlays.push(block);
            }
            Ok(((), overlays.commit()))
        });
        assert_eq!(result, Err("close control failed"));
        assert!(!blocks.is_shown());
        assert_eq!(*detached.borrow(), [1, 2]);
    }

    #[test]
    fn committed_build_keeps_overlays() {
        let mut detached = 0;
        let mut overlays = Rollback::new(|_: &&str| detached += 1);
        overlays.push("block1");
        overlays.push("contentSection");
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays.commit(), ["block1", "contentSection"]);
        assert_eq!(detached, 0);
    }
}
